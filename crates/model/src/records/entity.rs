//! Typed access to the fields a paginator orders by.
//!
//! Field names form a closed enumeration per entity. Each variant maps to a
//! plain accessor function, which paginators resolve once when they are built
//! instead of looking fields up by name on every row.

use crate::core::value::Value;
use std::{fmt::Debug, hash::Hash};

pub trait Field: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Every variant of the enumeration.
    const ALL: &'static [Self];

    /// Symbolic name of the field, also used as its default column name.
    fn name(self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }
}

pub type Accessor<E> = fn(&E) -> Value;

pub trait Entity: Send + Sync + 'static {
    type Field: Field;

    fn accessor(field: Self::Field) -> Accessor<Self>;
}
