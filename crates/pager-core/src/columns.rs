use connectors::query::QueryExecutor;
use model::{pagination::cursor::QualCol, records::entity::Field};
use planner::query::{ast::expr::Expr, qual_col};
use std::collections::HashMap;

/// Per-field column overrides. Fields without an override use the query's
/// default column for their name.
#[derive(Debug, Clone)]
pub struct ColumnMap<F>(HashMap<F, QualCol>);

impl<F: Field> ColumnMap<F> {
    pub fn new() -> Self {
        ColumnMap(HashMap::new())
    }

    pub fn with(mut self, field: F, column: QualCol) -> Self {
        self.0.insert(field, column);
        self
    }

    pub fn resolve<Q: QueryExecutor>(&self, field: F, query: &Q) -> Expr {
        match self.0.get(&field) {
            Some(column) => qual_col(column),
            None => query.column(field.name()),
        }
    }
}

impl<F: Field> Default for ColumnMap<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Field> FromIterator<(F, QualCol)> for ColumnMap<F> {
    fn from_iter<I: IntoIterator<Item = (F, QualCol)>>(iter: I) -> Self {
        ColumnMap(iter.into_iter().collect())
    }
}
