//! Expression nodes: columns, bound parameters, comparisons, boolean
//! connectives and function calls. `Raw` text is emitted verbatim and is
//! only meant for fixed SQL such as `*`.

use model::core::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Column(Ident),
    /// Rendered as a placeholder; the value travels as a bound parameter.
    Param(Value),
    Raw(String),
    Binary(Box<BinaryOp>),
    Call(FunctionCall),
}

/// A column name with an optional table or alias qualifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub qualifier: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOp {
    pub left: Expr,
    pub op: BinaryOperator,
    pub right: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

impl BinaryOperator {
    pub fn sql(self) -> &'static str {
        match self {
            BinaryOperator::Eq => "=",
            BinaryOperator::NotEq => "<>",
            BinaryOperator::Lt => "<",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::GtEq => ">=",
            BinaryOperator::And => "AND",
            BinaryOperator::Or => "OR",
        }
    }

    /// Strict comparison selecting the values that come after a key when a
    /// column sorted `ascending` is scanned `forward` (or backward).
    pub fn beyond(ascending: bool, forward: bool) -> Self {
        if ascending == forward {
            BinaryOperator::Gt
        } else {
            BinaryOperator::Lt
        }
    }
}

impl Expr {
    pub fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Self {
        Expr::Binary(Box::new(BinaryOp { left, op, right }))
    }

    pub fn eq(self, right: Expr) -> Self {
        Expr::binary(self, BinaryOperator::Eq, right)
    }

    pub fn and(self, right: Expr) -> Self {
        Expr::binary(self, BinaryOperator::And, right)
    }

    pub fn or(self, right: Expr) -> Self {
        Expr::binary(self, BinaryOperator::Or, right)
    }

    /// `COUNT(*)`
    pub fn count_all() -> Self {
        Expr::Call(FunctionCall {
            name: "COUNT".to_string(),
            args: vec![Expr::Raw("*".to_string())],
        })
    }
}
