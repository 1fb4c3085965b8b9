use crate::records::entity::Field;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("Ordering must name at least one field")]
    Empty,

    #[error("Field `{0}` appears more than once in the ordering")]
    DuplicateField(&'static str),
}

/// One ordering declaration as a caller writes it.
///
/// A declaration may carry several fields; their declared order is their
/// precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy<F>(Vec<(F, bool)>);

impl<F: Field> OrderBy<F> {
    pub fn new(field: F, ascending: bool) -> Self {
        OrderBy(vec![(field, ascending)])
    }

    pub fn asc(field: F) -> Self {
        Self::new(field, true)
    }

    pub fn desc(field: F) -> Self {
        Self::new(field, false)
    }

    pub fn then(mut self, field: F, ascending: bool) -> Self {
        self.0.push((field, ascending));
        self
    }

    pub fn then_asc(self, field: F) -> Self {
        self.then(field, true)
    }

    pub fn then_desc(self, field: F) -> Self {
        self.then(field, false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderKey<F> {
    pub field: F,
    pub ascending: bool,
}

/// Canonical major-to-minor ordering: non-empty, no repeated field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSpec<F> {
    keys: Vec<OrderKey<F>>,
}

impl<F: Field> OrderSpec<F> {
    /// Flattens one or more declarations into a single ordering.
    pub fn normalize<I>(declarations: I) -> Result<Self, OrderError>
    where
        I: IntoIterator<Item = OrderBy<F>>,
    {
        let mut keys: Vec<OrderKey<F>> = Vec::new();
        for OrderBy(entries) in declarations {
            for (field, ascending) in entries {
                if keys.iter().any(|k| k.field == field) {
                    return Err(OrderError::DuplicateField(field.name()));
                }
                keys.push(OrderKey { field, ascending });
            }
        }

        if keys.is_empty() {
            return Err(OrderError::Empty);
        }
        Ok(OrderSpec { keys })
    }

    pub fn keys(&self) -> &[OrderKey<F>] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Same fields, every direction flipped.
    pub fn reversed(&self) -> Self {
        OrderSpec {
            keys: self
                .keys
                .iter()
                .map(|k| OrderKey {
                    field: k.field,
                    ascending: !k.ascending,
                })
                .collect(),
        }
    }
}

impl<F: Field> TryFrom<OrderBy<F>> for OrderSpec<F> {
    type Error = OrderError;

    fn try_from(value: OrderBy<F>) -> Result<Self, Self::Error> {
        Self::normalize([value])
    }
}

impl<F: Field> TryFrom<Vec<OrderBy<F>>> for OrderSpec<F> {
    type Error = OrderError;

    fn try_from(value: Vec<OrderBy<F>>) -> Result<Self, Self::Error> {
        Self::normalize(value)
    }
}
