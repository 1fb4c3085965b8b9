//! The query handle paginators drive.
//!
//! A paginator never talks to a database directly. It clones a handle, narrows
//! it with ordering, predicates and limits, then asks it for rows or a count.

use crate::sql::base::error::DbError;
use async_trait::async_trait;
use model::records::row::RowData;
use planner::query::ast::{common::OrderDir, expr::Expr};

#[async_trait]
pub trait QueryExecutor: Clone + Send + Sync + 'static {
    type Entity: Send + 'static;

    /// Default column expression for a field name.
    fn column(&self, field: &str) -> Expr;

    /// Appends an ordering term; terms are applied major-to-minor.
    fn add_ordering(&mut self, column: Expr, dir: OrderDir);

    /// ANDs a predicate onto the query. Values inside it are bound, never
    /// spliced into the statement text.
    fn add_predicate(&mut self, predicate: Expr);

    fn limit(&mut self, n: usize);

    fn offset(&mut self, n: usize);

    async fn fetch(&self) -> Result<Vec<Self::Entity>, DbError>;

    /// Number of rows matching the predicates, ignoring ordering and limits.
    async fn count(&self) -> Result<u64, DbError>;
}

/// Conversion from a fetched row to the caller's record type.
pub trait FromRow: Sized {
    fn from_row(row: RowData) -> Result<Self, DbError>;
}

impl FromRow for RowData {
    fn from_row(row: RowData) -> Result<Self, DbError> {
        Ok(row)
    }
}
