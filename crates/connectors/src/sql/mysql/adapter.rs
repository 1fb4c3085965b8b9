use crate::sql::{
    base::{
        adapter::SqlAdapter,
        error::{ConnectorError, DbError},
        row::DbRow,
    },
    mysql::params::bind,
};
use async_trait::async_trait;
use model::{core::value::Value, records::row::RowData};
use mysql_async::{Opts, Pool, Row, prelude::Queryable};
use planner::query::dialect::{self, Dialect};
use tracing::debug;

#[derive(Clone)]
pub struct MySqlAdapter {
    pool: Pool,
    dialect: dialect::MySql,
}

impl MySqlAdapter {
    /// Runs statements without parameters, e.g. fixture setup.
    pub async fn exec(&self, sql: &str) -> Result<(), DbError> {
        let mut conn = self.pool.get_conn().await?;
        conn.query_drop(sql).await?;
        Ok(())
    }
}

#[async_trait]
impl SqlAdapter for MySqlAdapter {
    async fn connect(url: &str) -> Result<Self, ConnectorError> {
        let opts = Opts::from_url(url).map_err(|e| ConnectorError::InvalidUrl(e.to_string()))?;
        let pool = Pool::new(opts);

        // Fail on unreachable servers here rather than on the first query.
        drop(pool.get_conn().await?);

        Ok(MySqlAdapter {
            pool,
            dialect: dialect::MySql,
        })
    }

    async fn query_rows(
        &self,
        sql: &str,
        params: Vec<Value>,
        entity: &str,
    ) -> Result<Vec<RowData>, DbError> {
        debug!(sql, params = params.len(), "MySQL query");

        let mut conn = self.pool.get_conn().await?;
        let rows: Vec<Row> = conn.exec(sql, bind(params)).await?;

        Ok(rows
            .iter()
            .map(|row| DbRow::MySqlRow(row).to_row_data(entity))
            .collect())
    }

    async fn query_count(&self, sql: &str, params: Vec<Value>) -> Result<u64, DbError> {
        debug!(sql, params = params.len(), "MySQL count");

        let mut conn = self.pool.get_conn().await?;
        let count: Option<i64> = conn.exec_first(sql, bind(params)).await?;

        let count = count.ok_or_else(|| DbError::Decode("count query returned no row".into()))?;
        u64::try_from(count).map_err(|_| DbError::Decode(format!("negative row count {count}")))
    }

    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }
}
