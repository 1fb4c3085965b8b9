use crate::core::value::Value;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, convert::Infallible, str::FromStr};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QualCol {
    pub table: Option<String>, // table or alias as used in FROM/JOINs
    pub column: String,
}

impl QualCol {
    pub fn new(table: Option<&str>, column: &str) -> Self {
        QualCol {
            table: table.map(String::from),
            column: column.to_string(),
        }
    }
}

impl FromStr for QualCol {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((table, column)) => Ok(QualCol::new(Some(table), column)),
            None => Ok(QualCol::new(None, s)),
        }
    }
}

/// Boundary values of one row, keyed by ordering field name.
///
/// A cursor holds exactly one value per field of the ordering that produced
/// it. Keys are kept sorted so the serialized form is stable.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Cursor(BTreeMap<String, Value>);

impl Cursor {
    pub fn new() -> Self {
        Cursor(BTreeMap::new())
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Cursor {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Cursor(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
