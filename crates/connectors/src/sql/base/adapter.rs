use crate::sql::base::error::{ConnectorError, DbError};
use async_trait::async_trait;
use model::{core::value::Value, records::row::RowData};
use planner::query::dialect::Dialect;

/// Read-side access to a SQL database: run one rendered statement with its
/// bound parameters.
#[async_trait]
pub trait SqlAdapter {
    async fn connect(url: &str) -> Result<Self, ConnectorError>
    where
        Self: Sized;

    /// Runs a SELECT and converts every row. `entity` is recorded on each
    /// resulting `RowData`.
    async fn query_rows(
        &self,
        sql: &str,
        params: Vec<Value>,
        entity: &str,
    ) -> Result<Vec<RowData>, DbError>;

    /// Runs a statement returning a single integer cell, e.g. `COUNT(*)`.
    async fn query_count(&self, sql: &str, params: Vec<Value>) -> Result<u64, DbError>;

    fn dialect(&self) -> &dyn Dialect;
}
