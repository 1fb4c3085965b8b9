use crate::query::{
    ast::expr::{BinaryOp, Expr, FunctionCall, Ident},
    renderer::{Render, Renderer},
};

impl Render for Expr {
    fn render(&self, r: &mut Renderer) {
        match self {
            Expr::Column(ident) => ident.render(r),
            Expr::Param(value) => r.param(value.clone()),
            Expr::Raw(text) => r.push(text),
            Expr::Binary(op) => op.render(r),
            Expr::Call(call) => call.render(r),
        }
    }
}

impl Render for Ident {
    fn render(&self, r: &mut Renderer) {
        if let Some(qualifier) = &self.qualifier {
            r.quoted(qualifier);
            r.push(".");
        }
        r.quoted(&self.name);
    }
}

/// Always parenthesized, so nested connectives keep their grouping.
impl Render for BinaryOp {
    fn render(&self, r: &mut Renderer) {
        r.push("(");
        self.left.render(r);
        r.push(" ");
        r.push(self.op.sql());
        r.push(" ");
        self.right.render(r);
        r.push(")");
    }
}

impl Render for FunctionCall {
    fn render(&self, r: &mut Renderer) {
        r.push(&self.name);
        r.push("(");
        r.list(&self.args);
        r.push(")");
    }
}
