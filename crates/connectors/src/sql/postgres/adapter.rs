use crate::sql::{
    base::{
        adapter::SqlAdapter,
        error::{ConnectorError, DbError},
        row::DbRow,
    },
    postgres::{params::PgParamStore, utils::connect_client},
};
use async_trait::async_trait;
use model::{core::value::Value, records::row::RowData};
use planner::query::dialect::{self, Dialect};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_postgres::Client;
use tracing::debug;

#[derive(Clone)]
pub struct PgAdapter {
    client: Arc<RwLock<Client>>,
    dialect: dialect::Postgres,
}

impl PgAdapter {
    /// Wraps an already connected client.
    pub fn from_client(client: Client) -> Self {
        PgAdapter {
            client: Arc::new(RwLock::new(client)),
            dialect: dialect::Postgres,
        }
    }

    /// Runs a batch of statements without parameters, e.g. fixture setup.
    pub async fn exec(&self, sql: &str) -> Result<(), DbError> {
        let client = self.client.read().await;
        client.batch_execute(sql).await?;
        Ok(())
    }
}

#[async_trait]
impl SqlAdapter for PgAdapter {
    async fn connect(url: &str) -> Result<Self, ConnectorError> {
        let client = connect_client(url).await?;
        Ok(PgAdapter::from_client(client))
    }

    async fn query_rows(
        &self,
        sql: &str,
        params: Vec<Value>,
        entity: &str,
    ) -> Result<Vec<RowData>, DbError> {
        debug!(sql, params = params.len(), "Postgres query");

        let client = self.client.read().await;
        let statement = client.prepare(sql).await?;
        let bindings = PgParamStore::for_statement(params, statement.params())?;
        let rows = client.query(&statement, &bindings.as_refs()).await?;

        Ok(rows
            .iter()
            .map(|row| DbRow::PostgresRow(row).to_row_data(entity))
            .collect())
    }

    async fn query_count(&self, sql: &str, params: Vec<Value>) -> Result<u64, DbError> {
        debug!(sql, params = params.len(), "Postgres count");

        let client = self.client.read().await;
        let statement = client.prepare(sql).await?;
        let bindings = PgParamStore::for_statement(params, statement.params())?;
        let row = client.query_one(&statement, &bindings.as_refs()).await?;
        let count: i64 = row.try_get(0)?;

        u64::try_from(count).map_err(|_| DbError::Decode(format!("negative row count {count}")))
    }

    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }
}
