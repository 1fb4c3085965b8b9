//! AST to SQL text plus the ordered list of bound parameters.

use crate::query::dialect::Dialect;
use model::core::value::Value;

pub mod expr;
pub mod select;

pub trait Render {
    fn render(&self, r: &mut Renderer);
}

pub struct Renderer<'a> {
    sql: String,
    params: Vec<Value>,
    dialect: &'a dyn Dialect,
}

impl<'a> Renderer<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Renderer {
            sql: String::new(),
            params: Vec::new(),
            dialect,
        }
    }

    pub fn push(&mut self, text: &str) {
        self.sql.push_str(text);
    }

    pub fn quoted(&mut self, ident: &str) {
        let quoted = self.dialect.quote(ident);
        self.sql.push_str(&quoted);
    }

    /// Appends a placeholder and records `value` as its parameter.
    pub fn param(&mut self, value: Value) {
        self.params.push(value);
        let placeholder = self.dialect.placeholder(self.params.len());
        self.sql.push_str(&placeholder);
    }

    /// Renders `items` separated by `, `.
    pub fn list<T: Render>(&mut self, items: &[T]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            item.render(self);
        }
    }

    pub fn finish(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }
}

pub fn render<T: Render>(node: &T, dialect: &dyn Dialect) -> (String, Vec<Value>) {
    let mut renderer = Renderer::new(dialect);
    node.render(&mut renderer);
    renderer.finish()
}
