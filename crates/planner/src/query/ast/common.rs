use std::{convert::Infallible, str::FromStr};

/// A possibly schema-qualified table name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRef {
    pub schema: Option<String>,
    pub name: String,
}

impl TableRef {
    pub fn new(name: &str) -> Self {
        TableRef {
            schema: None,
            name: name.to_string(),
        }
    }

    pub fn in_schema(schema: &str, name: &str) -> Self {
        TableRef {
            schema: Some(schema.to_string()),
            name: name.to_string(),
        }
    }
}

/// `"public.users"` or `"users"`.
impl FromStr for TableRef {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.split_once('.') {
            Some((schema, name)) => TableRef::in_schema(schema, name),
            None => TableRef::new(s),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDir {
    Asc,
    Desc,
}

impl OrderDir {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending { OrderDir::Asc } else { OrderDir::Desc }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            OrderDir::Asc => "ASC",
            OrderDir::Desc => "DESC",
        }
    }
}
