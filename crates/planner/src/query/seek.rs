//! Keyset ("seek") predicates over a composite ordering key.
//!
//! For columns `c1..cN` with cursor values `v1..vN` the predicate is
//!
//! ```text
//! (c1 op1 v1)
//! OR (c1 = v1 AND c2 op2 v2)
//! OR ...
//! OR (c1 = v1 AND ... AND c(N-1) = v(N-1) AND cN opN vN)
//! ```
//!
//! where `opI` is `>` when the column's direction matches the scan direction
//! and `<` otherwise. Rows satisfying it lie strictly after the cursor row in
//! scan order.

use crate::query::{
    ast::expr::{BinaryOperator, Expr},
    param,
};
use model::core::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct SeekTerm {
    pub column: Expr,
    pub ascending: bool,
    pub value: Value,
}

/// Builds the strict successor (`forward`) or predecessor predicate for the
/// cursor values carried by `terms`. Returns `None` for an empty key.
pub fn seek_predicate(terms: &[SeekTerm], forward: bool) -> Option<Expr> {
    let mut tied: Option<Expr> = None;
    let mut disjuncts: Vec<Expr> = Vec::with_capacity(terms.len());

    for term in terms {
        let past = Expr::binary(
            term.column.clone(),
            BinaryOperator::beyond(term.ascending, forward),
            param(term.value.clone()),
        );
        disjuncts.push(match &tied {
            Some(prefix) => prefix.clone().and(past),
            None => past,
        });

        let equal = term.column.clone().eq(param(term.value.clone()));
        tied = Some(match tied {
            Some(prefix) => prefix.and(equal),
            None => equal,
        });
    }

    disjuncts.into_iter().reduce(Expr::or)
}
