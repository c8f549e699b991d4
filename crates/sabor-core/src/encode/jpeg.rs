//! JPEG compression with a quality parameter.
//!
//! This module provides JPEG encoding using the `image` crate's JPEG encoder.
//! Output is deterministic for a given (raster, quality) pair, and its size
//! never grows as quality decreases.
//!
//! A baseline encoder alone does not guarantee the size ordering: at some
//! adjacent qualities the lower one produces a few more bytes. Requested
//! qualities therefore snap down to [`QUALITY_STEPS`], every step from there
//! up to 100 is encoded, and the smallest result is emitted. Lowering the
//! quality only ever adds candidates, so the emitted size cannot increase.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;
use thiserror::Error;

use crate::decode::RasterBuffer;

/// Quality used for recipe attachments unless configured otherwise.
pub const DEFAULT_QUALITY: u8 = 70;

/// Qualities the encoder actually runs at, ascending.
pub const QUALITY_STEPS: [u8; 11] = [1, 10, 20, 30, 40, 50, 60, 70, 80, 90, 100];

/// Errors that can occur during compression.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// JPEG encoding failed
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Compressed image bytes and the quality step that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    /// Always one of [`QUALITY_STEPS`], at least the requested quality
    /// after snapping.
    pub quality: u8,
}

impl EncodedImage {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// The step a requested quality snaps down to. Out-of-range values are
/// clamped into 1-100 first.
pub fn quality_step(quality: u8) -> u8 {
    let quality = quality.clamp(1, 100);
    QUALITY_STEPS
        .iter()
        .rev()
        .copied()
        .find(|&step| step <= quality)
        .unwrap_or(QUALITY_STEPS[0])
}

/// Compress a raster to JPEG.
///
/// `quality` is clamped into 1-100 rather than rejected, then snapped down
/// to a quality step. The emitted bytes are the smallest encoding among
/// that step and every step above it, so they are never larger than the
/// snapped step's own encoding and never lower in quality.
///
/// # Quality Guidelines
///
/// * 90-100: High quality, large payloads
/// * 60-80: Medium quality, the range used for inline recipe images
/// * Below 60: Low quality, visible artifacts
///
/// # Errors
///
/// Zero-area rasters fail with `InvalidDimensions`, mismatched buffers with
/// `InvalidPixelData`.
pub fn compress(image: &RasterBuffer, quality: u8) -> Result<EncodedImage, EncodeError> {
    let (width, height) = (image.width, image.height);

    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    if !image.is_consistent() {
        return Err(EncodeError::InvalidPixelData {
            expected: image.expected_len(),
            actual: image.pixels.len(),
        });
    }

    let floor = quality_step(quality);
    let mut best: Option<EncodedImage> = None;

    for &step in QUALITY_STEPS.iter().filter(|&&step| step >= floor) {
        let bytes = encode_at(image, step)?;
        // Ties keep the lower step
        let smaller = match &best {
            Some(current) => bytes.len() < current.len(),
            None => true,
        };
        if smaller {
            best = Some(EncodedImage {
                bytes,
                quality: step,
            });
        }
    }

    best.ok_or_else(|| EncodeError::EncodingFailed("no quality step to encode at".to_string()))
}

fn encode_at(image: &RasterBuffer, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(
            &image.pixels,
            image.width,
            image.height,
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
    Ok(buffer.into_inner())
}


// ============================================================================
// Property-Based Tests
// ============================================================================
