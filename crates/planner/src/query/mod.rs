use crate::query::ast::expr::{Expr, Ident};
use model::{core::value::Value, pagination::cursor::QualCol};

pub mod ast;
pub mod builder;
pub mod dialect;
pub mod renderer;
pub mod seek;

/// Unqualified column.
pub fn col(name: &str) -> Expr {
    Expr::Column(Ident {
        qualifier: None,
        name: name.to_string(),
    })
}

/// `qualifier.name`
pub fn qcol(qualifier: &str, name: &str) -> Expr {
    Expr::Column(Ident {
        qualifier: Some(qualifier.to_string()),
        name: name.to_string(),
    })
}

pub fn qual_col(q: &QualCol) -> Expr {
    Expr::Column(Ident {
        qualifier: q.table.clone(),
        name: q.column.clone(),
    })
}

pub fn param(val: Value) -> Expr {
    Expr::Param(val)
}

/// A predicate no row satisfies: a bound `false`.
pub fn never() -> Expr {
    param(Value::Boolean(false))
}
