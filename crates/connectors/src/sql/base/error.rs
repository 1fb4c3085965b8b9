use thiserror::Error;

/// Failures while running a query or converting what it returned.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Postgres query failed: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("MySQL query failed: {0}")]
    MySql(#[from] mysql_async::Error),

    /// A bound value does not fit the parameter type of the statement.
    #[error("Cannot bind parameter: {0}")]
    Param(String),

    /// A row is missing a column the entity needs, or has it with the wrong type.
    #[error("Cannot decode row: {0}")]
    Decode(String),
}

/// Failures while opening a connection.
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Malformed connection URL: {0}")]
    InvalidUrl(String),

    #[error("Postgres connection failed: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("MySQL connection failed: {0}")]
    MySql(#[from] mysql_async::Error),

    #[error("TLS connector setup failed: {0}")]
    Tls(#[from] native_tls::Error),
}
