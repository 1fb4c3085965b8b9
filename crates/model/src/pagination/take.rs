use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TAKE: usize = 20;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TakeError {
    #[error("Minimum take {min} exceeds default take {default}")]
    MinAboveDefault { min: usize, default: usize },

    #[error("Minimum take {min} exceeds maximum take {max}")]
    MinAboveMax { min: usize, max: usize },
}

/// Page size limits. `max = None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TakeBounds {
    pub default: usize,
    pub min: usize,
    pub max: Option<usize>,
}

impl Default for TakeBounds {
    fn default() -> Self {
        TakeBounds {
            default: DEFAULT_TAKE,
            min: 0,
            max: None,
        }
    }
}

impl TakeBounds {
    pub fn new(default: usize, min: usize, max: Option<usize>) -> Result<Self, TakeError> {
        TakeBounds { default, min, max }.validate()
    }

    /// A default page size with no lower or upper limit.
    pub fn fixed(default: usize) -> Self {
        TakeBounds {
            default,
            min: 0,
            max: None,
        }
    }

    pub fn validate(self) -> Result<Self, TakeError> {
        if self.min > self.default {
            return Err(TakeError::MinAboveDefault {
                min: self.min,
                default: self.default,
            });
        }
        if let Some(max) = self.max
            && self.min > max
        {
            return Err(TakeError::MinAboveMax { min: self.min, max });
        }
        Ok(self)
    }

    /// Resolves a requested page size. A missing or zero request falls back to
    /// `default`; anything else is clamped into `[min, max]`.
    pub fn resolve(&self, requested: Option<usize>) -> usize {
        let take = match requested {
            Some(n) if n > 0 => n,
            _ => self.default,
        };
        let take = self.max.map_or(take, |max| take.min(max));
        take.max(self.min)
    }
}
