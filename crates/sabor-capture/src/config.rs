//! Capture configuration.
//!
//! ```toml
//! hardware_timeout_ms = 30000
//! require_storage_permission = false
//!
//! [pipeline]
//! quality = 70
//! ```

use std::path::Path;
use std::time::Duration;

use sabor_core::{ConfigError, PipelineConfig};
use serde::{Deserialize, Serialize};

use crate::devices::{LensFacing, Permission};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub pipeline: PipelineConfig,
    /// Upper bound on the wait for a camera callback. `None` waits forever.
    pub hardware_timeout_ms: Option<u64>,
    /// Also request storage write access before previewing.
    pub require_storage_permission: bool,
    /// Lens bound when the preview first opens.
    pub initial_lens: LensFacing,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            hardware_timeout_ms: Some(30_000),
            require_storage_permission: false,
            initial_lens: LensFacing::Back,
        }
    }
}

impl CaptureConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a file, or defaults if it doesn't exist.
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

    pub fn hardware_timeout(&self) -> Option<Duration> {
        self.hardware_timeout_ms.map(Duration::from_millis)
    }

    pub fn required_permissions(&self) -> Vec<Permission> {
        let mut permissions = vec![Permission::Camera];
        if self.require_storage_permission {
            permissions.push(Permission::WriteStorage);
        }
        permissions
    }
}
