//! Capture-direction pipeline: raw asset to transport payload.
//!
//! Stages run in order on one in-flight asset:
//! 1. Resolve the embedded orientation tag
//! 2. Decode to an RGB raster
//! 3. Rotate the raster upright
//! 4. Compress (the output carries no orientation tag)
//! 5. Encode as transport text
//!
//! Because the corrected raster is always re-encoded without a tag, a
//! payload produced here never needs correction again. All stages are
//! synchronous and CPU-bound; callers on an interactive thread should run
//! [`ImagePipeline::normalize`] on a worker.

use std::time::Instant;

use thiserror::Error;

use crate::config::PipelineConfig;
use crate::decode::{decode_raster, resolve_orientation, DecodeError, RawImageAsset};
use crate::encode::{compress, EncodeError};
use crate::text::{encode, encode_with_scheme, TransportPayload};
use crate::transform::{rotate_by_tag, TransformError};

/// Failures of the capture-direction pipeline.
///
/// Any of these aborts only the image attachment; a recipe can still be
/// submitted without an image.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Encoding(#[from] EncodeError),
}

/// Turns captured or selected images into upright, compressed payloads.
#[derive(Debug, Clone, Default)]
pub struct ImagePipeline {
    config: PipelineConfig,
}

impl ImagePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage on `asset` and return the transport payload.
    pub fn normalize(&self, asset: &RawImageAsset) -> Result<TransportPayload, PipelineError> {
        let started = Instant::now();

        let tag = resolve_orientation(asset.bytes());
        let raster = decode_raster(asset.bytes())?;
        let upright = rotate_by_tag(&raster, tag)?;
        let encoded = compress(&upright, self.config.quality)?;

        let payload = match self.config.scheme_prefix.as_deref() {
            Some(scheme) => encode_with_scheme(&encoded.bytes, scheme),
            None => encode(&encoded.bytes),
        };

        log::debug!(
            "Normalized {:?} asset: {} bytes, {:?}, {}x{} -> {} bytes at q{} ({} chars) in {:?}",
            asset.source(),
            asset.len(),
            tag,
            upright.width,
            upright.height,
            encoded.len(),
            encoded.quality,
            payload.len(),
            started.elapsed()
        );

        Ok(payload)
    }
}
