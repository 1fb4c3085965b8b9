use crate::{
    error::AdapterError,
    sql::{
        base::adapter::SqlAdapter, mysql::adapter::MySqlAdapter, postgres::adapter::PgAdapter,
    },
};
use std::str::FromStr;

/// Database engines a `SqlQuery` can run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    MySql,
    Postgres,
}

impl FromStr for Driver {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Driver::MySql),
            "pg" | "postgres" | "postgresql" => Ok(Driver::Postgres),
            other => Err(AdapterError::UnsupportedDriver(other.to_string())),
        }
    }
}

#[derive(Clone)]
pub enum Adapter {
    MySql(MySqlAdapter),
    Postgres(PgAdapter),
}

impl Adapter {
    pub async fn connect(driver: Driver, url: &str) -> Result<Self, AdapterError> {
        match driver {
            Driver::MySql => Ok(Adapter::MySql(MySqlAdapter::connect(url).await?)),
            Driver::Postgres => Ok(Adapter::Postgres(PgAdapter::connect(url).await?)),
        }
    }

    /// Picks the driver from the URL scheme (`postgres://`, `mysql://`, ...).
    pub async fn from_url(url: &str) -> Result<Self, AdapterError> {
        let scheme = url
            .split_once("://")
            .map(|(scheme, _)| scheme)
            .ok_or_else(|| AdapterError::UnsupportedDriver(url.to_string()))?;
        Self::connect(scheme.parse()?, url).await
    }

    pub fn get_sql(&self) -> &(dyn SqlAdapter + Send + Sync) {
        match self {
            Adapter::MySql(adapter) => adapter,
            Adapter::Postgres(adapter) => adapter,
        }
    }
}

impl From<PgAdapter> for Adapter {
    fn from(adapter: PgAdapter) -> Self {
        Adapter::Postgres(adapter)
    }
}

impl From<MySqlAdapter> for Adapter {
    fn from(adapter: MySqlAdapter) -> Self {
        Adapter::MySql(adapter)
    }
}
