//! The single statement shape paginated queries need.

use crate::query::{
    ast::{
        common::{OrderDir, TableRef},
        expr::Expr,
    },
    param,
};
use model::core::value::Value;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Select {
    pub projection: Vec<Expr>,
    pub from: Option<FromClause>,
    pub filter: Option<Expr>,
    /// Major to minor.
    pub order_by: Vec<OrderByExpr>,
    pub limit: Option<Expr>,
    pub offset: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FromClause {
    pub table: TableRef,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByExpr {
    pub expr: Expr,
    pub dir: OrderDir,
}

impl Select {
    /// ANDs `condition` onto the current filter.
    pub fn and_where(&mut self, condition: Expr) {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and(condition),
            None => condition,
        });
    }

    pub fn push_order(&mut self, expr: Expr, dir: OrderDir) {
        self.order_by.push(OrderByExpr { expr, dir });
    }

    pub fn set_limit(&mut self, n: u64) {
        self.limit = Some(param(Value::Uint(n)));
    }

    pub fn set_offset(&mut self, n: u64) {
        self.offset = Some(param(Value::Uint(n)));
    }

    /// `SELECT COUNT(*)` over the same source and filter. Ordering and paging
    /// do not change a count and are dropped.
    pub fn counting(&self) -> Select {
        Select {
            projection: vec![Expr::count_all()],
            from: self.from.clone(),
            filter: self.filter.clone(),
            ..Select::default()
        }
    }
}
