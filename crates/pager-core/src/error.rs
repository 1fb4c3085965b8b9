use crate::codec::CodecError;
use connectors::sql::base::error::DbError;
use model::pagination::{order::OrderError, take::TakeError};
use std::sync::Arc;
use thiserror::Error;

/// Invalid paginator configuration, reported at construction.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid ordering: {0}")]
    Order(#[from] OrderError),

    #[error("Invalid take bounds: {0}")]
    Take(#[from] TakeError),
}

#[derive(Debug, Error)]
pub enum PagerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Both `prev_cursor` and `next_cursor` were supplied to one call.
    #[error("Only one of prev_cursor and next_cursor may be given")]
    ConflictingCursors,

    /// A cursor could not be minted from a fetched row.
    #[error("Cursor encoding failed: {0}")]
    Codec(#[from] CodecError),

    #[error("Query failed: {0}")]
    Query(#[from] DbError),
}

impl From<OrderError> for PagerError {
    fn from(err: OrderError) -> Self {
        PagerError::Config(err.into())
    }
}

impl From<TakeError> for PagerError {
    fn from(err: TakeError) -> Self {
        PagerError::Config(err.into())
    }
}

/// Error type of the lazy results, whose outcome is shared by every accessor.
pub type SharedPagerError = Arc<PagerError>;
