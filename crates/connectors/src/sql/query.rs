use crate::{
    adapter::Adapter,
    query::{FromRow, QueryExecutor},
    sql::base::error::DbError,
};
use async_trait::async_trait;
use model::core::value::Value;
use planner::query::{
    ast::{
        common::{OrderDir, TableRef},
        expr::Expr,
        select::Select,
    },
    builder::select::SelectBuilder,
    dialect::Dialect,
    qcol,
    renderer::render,
};
use std::marker::PhantomData;
use tracing::debug;

/// A `SELECT` over one table, executed through a SQL adapter.
pub struct SqlQuery<E> {
    adapter: Adapter,
    select: Select,
    alias: String,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for SqlQuery<E> {
    fn clone(&self) -> Self {
        SqlQuery {
            adapter: self.adapter.clone(),
            select: self.select.clone(),
            alias: self.alias.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> SqlQuery<E> {
    /// `SELECT <alias>.* FROM <table> AS <alias>`.
    pub fn new(adapter: Adapter, table: TableRef, alias: &str) -> Self {
        let all = format!("{}.*", adapter.get_sql().dialect().quote(alias));
        let select = SelectBuilder::new()
            .select(vec![Expr::Raw(all)])
            .from(table, Some(alias))
            .build();

        SqlQuery {
            adapter,
            select,
            alias: alias.to_string(),
            _entity: PhantomData,
        }
    }

    /// Adds a caller-side condition that every page inherits.
    pub fn filter(mut self, predicate: Expr) -> Self {
        self.select.and_where(predicate);
        self
    }

    pub fn render_fetch(&self) -> (String, Vec<Value>) {
        render(&self.select, self.dialect())
    }

    pub fn render_count(&self) -> (String, Vec<Value>) {
        render(&self.select.counting(), self.dialect())
    }

    fn dialect(&self) -> &dyn Dialect {
        self.adapter.get_sql().dialect()
    }

    fn entity(&self) -> &str {
        self.select
            .from
            .as_ref()
            .map(|from| from.table.name.as_str())
            .unwrap_or_default()
    }
}

#[async_trait]
impl<E> QueryExecutor for SqlQuery<E>
where
    E: FromRow + Send + 'static,
{
    type Entity = E;

    fn column(&self, field: &str) -> Expr {
        qcol(&self.alias, field)
    }

    fn add_ordering(&mut self, column: Expr, dir: OrderDir) {
        self.select.push_order(column, dir);
    }

    fn add_predicate(&mut self, predicate: Expr) {
        self.select.and_where(predicate);
    }

    fn limit(&mut self, n: usize) {
        self.select.set_limit(n as u64);
    }

    fn offset(&mut self, n: usize) {
        self.select.set_offset(n as u64);
    }

    async fn fetch(&self) -> Result<Vec<E>, DbError> {
        let (sql, params) = self.render_fetch();
        debug!(dialect = self.dialect().name(), "Fetch SQL: {}", sql);

        let rows = self
            .adapter
            .get_sql()
            .query_rows(&sql, params, self.entity())
            .await?;
        rows.into_iter().map(E::from_row).collect()
    }

    async fn count(&self) -> Result<u64, DbError> {
        let (sql, params) = self.render_count();
        debug!(dialect = self.dialect().name(), "Count SQL: {}", sql);

        self.adapter.get_sql().query_count(&sql, params).await
    }
}
