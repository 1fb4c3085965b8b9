//! Typestate builder for [`Select`]. The projection comes first and the
//! source second; filters, ordering and paging may follow in any order.

use crate::query::ast::{
    common::{OrderDir, TableRef},
    expr::Expr,
    select::{FromClause, Select},
};

#[derive(Debug, Default, Clone, Copy)]
pub struct NoProjection;

#[derive(Debug, Default, Clone, Copy)]
pub struct Projected;

#[derive(Debug, Default, Clone, Copy)]
pub struct Sourced;

#[derive(Debug, Clone)]
pub struct SelectBuilder<S> {
    ast: Select,
    state: S,
}

impl<S> SelectBuilder<S> {
    fn advance<T>(self, state: T) -> SelectBuilder<T> {
        SelectBuilder {
            ast: self.ast,
            state,
        }
    }
}

impl Default for SelectBuilder<NoProjection> {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectBuilder<NoProjection> {
    pub fn new() -> Self {
        SelectBuilder {
            ast: Select::default(),
            state: NoProjection,
        }
    }

    pub fn select(mut self, projection: Vec<Expr>) -> SelectBuilder<Projected> {
        self.ast.projection = projection;
        self.advance(Projected)
    }
}

impl SelectBuilder<Projected> {
    pub fn from(mut self, table: TableRef, alias: Option<&str>) -> SelectBuilder<Sourced> {
        self.ast.from = Some(FromClause {
            table,
            alias: alias.map(String::from),
        });
        self.advance(Sourced)
    }
}

impl SelectBuilder<Sourced> {
    /// Conjoined with any filter already present.
    pub fn filter(mut self, condition: Expr) -> Self {
        self.ast.and_where(condition);
        self
    }

    pub fn order_by(mut self, expr: Expr, dir: OrderDir) -> Self {
        self.ast.push_order(expr, dir);
        self
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.ast.set_limit(n);
        self
    }

    pub fn offset(mut self, n: u64) -> Self {
        self.ast.set_offset(n);
        self
    }

    pub fn build(self) -> Select {
        self.ast
    }
}
