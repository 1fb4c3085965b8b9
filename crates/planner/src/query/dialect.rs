//! Identifier quoting and placeholder syntax per database.

pub trait Dialect: Send + Sync {
    fn name(&self) -> &'static str;

    fn quote(&self, ident: &str) -> String;

    /// Placeholder for the `position`-th bound parameter, counted from 1.
    fn placeholder(&self, position: usize) -> String;
}

fn wrap(ident: &str, quote: char) -> String {
    let escaped = ident.replace(quote, &format!("{quote}{quote}"));
    format!("{quote}{escaped}{quote}")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl Dialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote(&self, ident: &str) -> String {
        wrap(ident, '"')
    }

    fn placeholder(&self, position: usize) -> String {
        format!("${position}")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MySql;

impl Dialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote(&self, ident: &str) -> String {
        wrap(ident, '`')
    }

    fn placeholder(&self, _position: usize) -> String {
        "?".to_string()
    }
}
