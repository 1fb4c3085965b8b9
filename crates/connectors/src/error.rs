use crate::sql::base::error::ConnectorError;
use thiserror::Error;

/// Failure to pick or open a SQL adapter.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("No SQL driver named `{0}`")]
    UnsupportedDriver(String),

    #[error(transparent)]
    Connector(#[from] ConnectorError),
}
