//! Opaque cursor tokens.
//!
//! A token is the JSON form of a [`Cursor`]. Values keep their variant tag, so
//! decoding a token yields exactly the cursor that was encoded.

use base64::{
    Engine as _, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use model::pagination::cursor::Cursor;
use serde::Deserialize;
use std::{fmt::Debug, string::FromUtf8Error, sync::Arc};
use thiserror::Error;

/// Standard alphabet, no `=` padding on output, padding optional on input.
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Invalid base64 in cursor token: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Cursor token is not UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),

    #[error("Malformed cursor JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cursor has no value for field `{0}`")]
    MissingField(&'static str),
}

pub trait CursorCodec: Debug + Send + Sync {
    fn encode(&self, cursor: &Cursor) -> Result<String, CodecError>;

    fn decode(&self, token: &str) -> Result<Cursor, CodecError>;
}

/// Readable tokens: the cursor's JSON text as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl CursorCodec for JsonCodec {
    fn encode(&self, cursor: &Cursor) -> Result<String, CodecError> {
        Ok(serde_json::to_string(cursor)?)
    }

    fn decode(&self, token: &str) -> Result<Cursor, CodecError> {
        Ok(serde_json::from_str(token)?)
    }
}

/// URL-unfriendly characters hidden behind base64. The default codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Codec;

impl CursorCodec for Base64Codec {
    fn encode(&self, cursor: &Cursor) -> Result<String, CodecError> {
        let json = serde_json::to_string(cursor)?;
        Ok(TOKEN_ENGINE.encode(json))
    }

    fn decode(&self, token: &str) -> Result<Cursor, CodecError> {
        let bytes = TOKEN_ENGINE.decode(token.trim())?;
        let json = String::from_utf8(bytes)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Codec selection as written in settings files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
    Json,
    #[default]
    Base64,
}

impl CodecKind {
    pub fn codec(self) -> Arc<dyn CursorCodec> {
        match self {
            CodecKind::Json => Arc::new(JsonCodec),
            CodecKind::Base64 => Arc::new(Base64Codec),
        }
    }
}
