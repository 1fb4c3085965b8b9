//! Paginator configuration read from JSON.
//!
//! ```json
//! {
//!   "order_by": [{ "field": "name" }, { "field": "id", "ascending": false }],
//!   "columns": { "name": "u.user_name" },
//!   "take": { "default": 20, "min": 1, "max": 100 },
//!   "codec": "base64"
//! }
//! ```
//!
//! Field names are resolved against the entity's `Field` enumeration when a
//! paginator is built, not when the file is parsed.

use crate::{
    codec::CodecKind,
    columns::ColumnMap,
    cursor::{CursorOptions, CursorPaginator},
    error::PagerError,
    page::{PageOptions, PagePaginator},
};
use model::{
    pagination::{
        cursor::QualCol,
        order::{OrderBy, OrderSpec},
        take::TakeBounds,
    },
    records::entity::{Entity, Field},
};
use serde::Deserialize;
use std::{collections::HashMap, fs, path::Path};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown field `{0}`")]
    UnknownField(String),

    #[error(transparent)]
    Pager(#[from] PagerError),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderSetting {
    pub field: String,
    #[serde(default = "ascending_by_default")]
    pub ascending: bool,
}

fn ascending_by_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaginatorSettings {
    pub order_by: Vec<OrderSetting>,
    #[serde(default)]
    pub columns: HashMap<String, String>,
    #[serde(default)]
    pub take: TakeBounds,
    #[serde(default)]
    pub codec: CodecKind,
}

impl PaginatorSettings {
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;

        debug!("Loaded paginator settings from {}", path.display());
        Self::from_json_str(&content)
    }

    pub fn into_cursor_paginator<E: Entity>(self) -> Result<CursorPaginator<E>, SettingsError> {
        let order = self.order_spec::<E::Field>()?;
        let options = CursorOptions::default()
            .columns(self.column_map()?)
            .take(self.take);
        let options = CursorOptions {
            codec: self.codec.codec(),
            ..options
        };

        Ok(CursorPaginator::with_options(order, options)?)
    }

    pub fn into_page_paginator<E: Entity>(self) -> Result<PagePaginator<E>, SettingsError> {
        let order = self.order_spec::<E::Field>()?;
        let options = PageOptions::default()
            .columns(self.column_map()?)
            .take(self.take);

        Ok(PagePaginator::with_options(order, options)?)
    }

    fn order_spec<F: Field>(&self) -> Result<OrderSpec<F>, SettingsError> {
        let declarations = self
            .order_by
            .iter()
            .map(|setting| Ok(OrderBy::new(field(&setting.field)?, setting.ascending)))
            .collect::<Result<Vec<_>, SettingsError>>()?;

        OrderSpec::normalize(declarations).map_err(|err| PagerError::from(err).into())
    }

    fn column_map<F: Field>(&self) -> Result<ColumnMap<F>, SettingsError> {
        self.columns
            .iter()
            .map(|(name, column)| {
                let Ok(column) = column.parse::<QualCol>();
                Ok((field(name)?, column))
            })
            .collect()
    }
}

fn field<F: Field>(name: &str) -> Result<F, SettingsError> {
    F::from_name(name).ok_or_else(|| SettingsError::UnknownField(name.to_string()))
}
