//! The recipe image field.
//!
//! The remote API stores either a genuine URL or an inline payload in one
//! string field. [`ImageRef`] keeps the two apart in memory; the legacy
//! string is only produced or parsed at the wire boundary.
//!
//! Legacy classification is approximate: a string is inline when it starts
//! with `data:` or is longer than the threshold, otherwise it is a URL. A
//! long opaque URL will be misread as inline.

use serde::{Deserialize, Serialize};

use crate::text::TransportPayload;

/// Legacy length above which a string counts as inline data.
pub const DEFAULT_INLINE_THRESHOLD: usize = 500;

const INLINE_SCHEME: &str = "data:";

/// Where a recipe image comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ImageRef {
    /// Fetched by a generic image loader.
    Url { url: String },
    /// Carried inside the document as a transport payload.
    Inline { data: TransportPayload },
}

impl ImageRef {
    pub fn url(url: impl Into<String>) -> Self {
        ImageRef::Url { url: url.into() }
    }

    pub fn inline(data: TransportPayload) -> Self {
        ImageRef::Inline { data }
    }

    /// Classify a legacy image string.
    pub fn classify(value: &str, inline_threshold: usize) -> Self {
        if value.starts_with(INLINE_SCHEME) || value.len() > inline_threshold {
            ImageRef::Inline {
                data: TransportPayload::new(value),
            }
        } else {
            ImageRef::Url {
                url: value.to_string(),
            }
        }
    }

    /// The overloaded string the legacy field carries.
    pub fn as_legacy_str(&self) -> &str {
        match self {
            ImageRef::Url { url } => url,
            ImageRef::Inline { data } => data.as_str(),
        }
    }

    pub fn into_legacy(self) -> String {
        match self {
            ImageRef::Url { url } => url,
            ImageRef::Inline { data } => data.into_string(),
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, ImageRef::Inline { .. })
    }
}

impl From<TransportPayload> for ImageRef {
    fn from(data: TransportPayload) -> Self {
        ImageRef::Inline { data }
    }
}

/// Serde adapter for `Option<ImageRef>` fields that travel as the legacy
/// nullable string.
///
/// ```ignore
/// #[serde(with = "sabor_core::field::legacy_field")]
/// image_url: Option<ImageRef>,
/// ```
///
/// Deserialization always uses [`DEFAULT_INLINE_THRESHOLD`].
pub mod legacy_field {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{ImageRef, DEFAULT_INLINE_THRESHOLD};

    pub fn serialize<S>(value: &Option<ImageRef>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(image) => serializer.serialize_some(image.as_legacy_str()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<ImageRef>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .filter(|s| !s.is_empty())
            .map(|s| ImageRef::classify(&s, DEFAULT_INLINE_THRESHOLD)))
    }
}
