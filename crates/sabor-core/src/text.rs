//! Text-safe transport encoding of compressed images.
//!
//! Payloads are standard-alphabet base64 with padding and no line wrapping,
//! so they survive verbatim inside a single JSON string. An optional scheme
//! prefix (`data:image/jpeg;base64,`) may precede the base64 body.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::decode::DecodeError;

/// Scheme written in front of payloads unless configured otherwise.
pub const JPEG_DATA_SCHEME: &str = "data:image/jpeg;base64";

/// Text-safe form of an encoded image, ready for a JSON string field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransportPayload(String);

impl TransportPayload {
    /// Wrap a string received from elsewhere. Nothing is validated until
    /// [`TransportPayload::decode`].
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The scheme before the first comma, if any.
    pub fn scheme(&self) -> Option<&str> {
        self.0.split_once(',').map(|(scheme, _)| scheme)
    }

    /// Recover the exact bytes this payload was produced from.
    pub fn decode(&self) -> Result<Vec<u8>, DecodeError> {
        decode(&self.0)
    }
}

impl fmt::Display for TransportPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TransportPayload {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Encode bytes as a single-line, whitespace-free base64 payload.
pub fn encode(bytes: &[u8]) -> TransportPayload {
    TransportPayload(STANDARD.encode(bytes))
}

/// Encode bytes as `<scheme>,<base64>`.
pub fn encode_with_scheme(bytes: &[u8], scheme: &str) -> TransportPayload {
    let body = STANDARD.encode(bytes);
    let mut text = String::with_capacity(scheme.len() + 1 + body.len());
    text.push_str(scheme);
    text.push(',');
    text.push_str(&body);
    TransportPayload(text)
}

/// Decode a payload back into bytes.
///
/// Everything up to and including the first comma is discarded when a comma
/// is present. The remainder must be strict padded base64: whitespace,
/// line breaks, and URL-safe characters are all rejected.
pub fn decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    let body = match text.split_once(',') {
        Some((_, body)) => body,
        None => text,
    };

    STANDARD
        .decode(body)
        .map_err(|e| DecodeError::InvalidText(e.to_string()))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
