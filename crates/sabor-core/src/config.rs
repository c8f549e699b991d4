//! Pipeline configuration.
//!
//! All fields have defaults, so an empty TOML document is a valid config.
//!
//! ```toml
//! quality = 70
//! scheme_prefix = "data:image/jpeg;base64"
//! inline_threshold = 500
//!
//! [placeholder]
//! width = 64
//! height = 64
//! color = [224, 224, 224]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encode::DEFAULT_QUALITY;
use crate::field::DEFAULT_INLINE_THRESHOLD;
use crate::text::JPEG_DATA_SCHEME;

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings for both pipeline directions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// JPEG quality for attachments, snapped to a quality step at
    /// compression time.
    pub quality: u8,
    /// Scheme written before the base64 body. `None` emits bare base64.
    pub scheme_prefix: Option<String>,
    /// Length above which an unprefixed image field is treated as inline.
    pub inline_threshold: usize,
    /// Image shown when rendering fails.
    pub placeholder: PlaceholderConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            scheme_prefix: Some(JPEG_DATA_SCHEME.to_string()),
            inline_threshold: DEFAULT_INLINE_THRESHOLD,
            placeholder: PlaceholderConfig::default(),
        }
    }
}

/// Solid-color stand-in for images that cannot be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderConfig {
    pub width: u32,
    pub height: u32,
    pub color: [u8; 3],
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            color: [224, 224, 224],
        }
    }
}

impl PipelineConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a file.
    /// Returns the default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}
