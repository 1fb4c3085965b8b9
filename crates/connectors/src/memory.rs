//! An in-memory `QueryExecutor`.
//!
//! Rows live in a shared `Vec<RowData>`. Predicates are evaluated straight off
//! the planner AST with SQL truth rules: a comparison involving NULL is
//! unknown, and only rows whose predicate is true are kept. Ordering places
//! NULLs after every other value in ascending order, as Postgres does.

use crate::{
    query::{FromRow, QueryExecutor},
    sql::base::error::DbError,
};
use async_trait::async_trait;
use model::{core::value::Value, records::row::RowData};
use planner::query::{
    ast::{
        common::OrderDir,
        expr::{BinaryOp, BinaryOperator, Expr},
    },
    qcol,
};
use std::{
    cmp::Ordering,
    marker::PhantomData,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering as AtomicOrdering},
    },
};
use tracing::{trace, warn};

/// How many times each kind of query hit the table.
#[derive(Debug, Default)]
pub struct QueryStats {
    fetches: AtomicUsize,
    counts: AtomicUsize,
}

impl QueryStats {
    pub fn fetches(&self) -> usize {
        self.fetches.load(AtomicOrdering::SeqCst)
    }

    pub fn counts(&self) -> usize {
        self.counts.load(AtomicOrdering::SeqCst)
    }
}

pub struct MemoryQuery<E> {
    rows: Arc<Vec<RowData>>,
    alias: String,
    predicate: Option<Expr>,
    ordering: Vec<(Expr, OrderDir)>,
    limit: Option<usize>,
    offset: Option<usize>,
    stats: Arc<QueryStats>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for MemoryQuery<E> {
    fn clone(&self) -> Self {
        MemoryQuery {
            rows: Arc::clone(&self.rows),
            alias: self.alias.clone(),
            predicate: self.predicate.clone(),
            ordering: self.ordering.clone(),
            limit: self.limit,
            offset: self.offset,
            stats: Arc::clone(&self.stats),
            _entity: PhantomData,
        }
    }
}

impl<E> MemoryQuery<E> {
    pub fn new(alias: &str, rows: Vec<RowData>) -> Self {
        MemoryQuery {
            rows: Arc::new(rows),
            alias: alias.to_string(),
            predicate: None,
            ordering: Vec::new(),
            limit: None,
            offset: None,
            stats: Arc::new(QueryStats::default()),
            _entity: PhantomData,
        }
    }

    /// Counters shared by this handle and every clone of it.
    pub fn stats(&self) -> Arc<QueryStats> {
        Arc::clone(&self.stats)
    }

    fn matching(&self) -> Vec<&RowData> {
        self.rows
            .iter()
            .filter(|row| match &self.predicate {
                Some(predicate) => truth(predicate, row) == Some(true),
                None => true,
            })
            .collect()
    }

    fn compare_rows(&self, a: &RowData, b: &RowData) -> Ordering {
        for (column, dir) in &self.ordering {
            let ord = nulls_last(&eval(column, a), &eval(column, b));
            let ord = match dir {
                OrderDir::Asc => ord,
                OrderDir::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

#[async_trait]
impl<E> QueryExecutor for MemoryQuery<E>
where
    E: FromRow + Send + 'static,
{
    type Entity = E;

    fn column(&self, field: &str) -> Expr {
        qcol(&self.alias, field)
    }

    fn add_ordering(&mut self, column: Expr, dir: OrderDir) {
        self.ordering.push((column, dir));
    }

    fn add_predicate(&mut self, predicate: Expr) {
        self.predicate = Some(match self.predicate.take() {
            Some(existing) => existing.and(predicate),
            None => predicate,
        });
    }

    fn limit(&mut self, n: usize) {
        self.limit = Some(n);
    }

    fn offset(&mut self, n: usize) {
        self.offset = Some(n);
    }

    async fn fetch(&self) -> Result<Vec<E>, DbError> {
        self.stats.fetches.fetch_add(1, AtomicOrdering::SeqCst);

        let mut rows = self.matching();
        rows.sort_by(|a, b| self.compare_rows(a, b));
        trace!(matched = rows.len(), "In-memory fetch");

        rows.into_iter()
            .skip(self.offset.unwrap_or(0))
            .take(self.limit.unwrap_or(usize::MAX))
            .map(|row| E::from_row(row.clone()))
            .collect()
    }

    async fn count(&self) -> Result<u64, DbError> {
        self.stats.counts.fetch_add(1, AtomicOrdering::SeqCst);
        Ok(self.matching().len() as u64)
    }
}

fn eval(expr: &Expr, row: &RowData) -> Value {
    match expr {
        Expr::Column(ident) => row.get_value(&ident.name),
        Expr::Param(value) => value.clone(),
        Expr::Binary(op) => binary(op, row).map_or(Value::Null, Value::Boolean),
        other => {
            warn!("Cannot evaluate {:?} in memory", other);
            Value::Null
        }
    }
}

/// Three-valued truth of a predicate; `None` is SQL's UNKNOWN.
fn truth(expr: &Expr, row: &RowData) -> Option<bool> {
    match expr {
        Expr::Binary(op) => binary(op, row),
        other => eval(other, row).as_bool(),
    }
}

fn binary(op: &BinaryOp, row: &RowData) -> Option<bool> {
    let ordering = || eval(&op.left, row).compare(&eval(&op.right, row));

    match op.op {
        BinaryOperator::And => match (truth(&op.left, row), truth(&op.right, row)) {
            (Some(false), _) | (_, Some(false)) => Some(false),
            (Some(true), Some(true)) => Some(true),
            _ => None,
        },
        BinaryOperator::Or => match (truth(&op.left, row), truth(&op.right, row)) {
            (Some(true), _) | (_, Some(true)) => Some(true),
            (Some(false), Some(false)) => Some(false),
            _ => None,
        },
        BinaryOperator::Eq => ordering().map(|o| o == Ordering::Equal),
        BinaryOperator::NotEq => ordering().map(|o| o != Ordering::Equal),
        BinaryOperator::Lt => ordering().map(|o| o == Ordering::Less),
        BinaryOperator::LtEq => ordering().map(|o| o != Ordering::Greater),
        BinaryOperator::Gt => ordering().map(|o| o == Ordering::Greater),
        BinaryOperator::GtEq => ordering().map(|o| o != Ordering::Less),
    }
}

fn nulls_last(a: &Value, b: &Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.compare(b).unwrap_or(Ordering::Equal),
    }
}
