//! Core types for image acquisition and decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for decoding operations on the display and capture paths.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The transport text contains characters outside the base64 alphabet
    /// or is not a valid base64 sequence.
    #[error("Invalid transport text: {0}")]
    InvalidText(String),

    /// The byte stream is not a recognized or supported image format.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image bytes are corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),
}

/// Where a raw asset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetSource {
    /// Taken with the device camera.
    Camera,
    /// Picked from the photo gallery.
    Gallery,
}

/// Encoded image bytes exactly as delivered by a capture or selection.
///
/// The bytes are never modified once captured; every pipeline stage
/// produces new values from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImageAsset {
    bytes: Vec<u8>,
    source: AssetSource,
}

impl RawImageAsset {
    pub fn new(bytes: Vec<u8>, source: AssetSource) -> Self {
        Self { bytes, source }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn source(&self) -> AssetSource {
        self.source
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Clockwise rotation needed to display an encoded image upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrientationTag {
    /// Already upright.
    #[default]
    Normal,
    /// Rotate 90 degrees clockwise.
    Rotate90,
    /// Rotate 180 degrees.
    Rotate180,
    /// Rotate 270 degrees clockwise (90 counter-clockwise).
    Rotate270,
}

impl OrientationTag {
    /// Correction angle in clockwise degrees.
    pub fn degrees(self) -> u32 {
        match self {
            OrientationTag::Normal => 0,
            OrientationTag::Rotate90 => 90,
            OrientationTag::Rotate180 => 180,
            OrientationTag::Rotate270 => 270,
        }
    }

    /// Map a clockwise angle back to a tag. Only the four quarter turns map.
    pub fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees {
            0 => Some(OrientationTag::Normal),
            90 => Some(OrientationTag::Rotate90),
            180 => Some(OrientationTag::Rotate180),
            270 => Some(OrientationTag::Rotate270),
            _ => None,
        }
    }

    /// Map an EXIF orientation value (1-8).
    ///
    /// Only the pure rotations are corrected. Mirrored orientations and
    /// unknown values degrade to `Normal`.
    /// See: https://exiftool.org/TagNames/EXIF.html
    pub fn from_exif(value: u32) -> Self {
        match value {
            3 => OrientationTag::Rotate180,
            6 => OrientationTag::Rotate90,
            8 => OrientationTag::Rotate270,
            _ => OrientationTag::Normal,
        }
    }

    /// The EXIF orientation value that encodes this tag.
    pub fn exif_value(self) -> u16 {
        match self {
            OrientationTag::Normal => 1,
            OrientationTag::Rotate90 => 6,
            OrientationTag::Rotate180 => 3,
            OrientationTag::Rotate270 => 8,
        }
    }

    /// Returns true if correcting this orientation swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, OrientationTag::Rotate90 | OrientationTag::Rotate270)
    }
}

/// A decoded image with RGB pixel data.
///
/// A raster carries no orientation of its own; orientation only exists as
/// metadata on encoded byte streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    /// Length should be width * height * 3.
    pub pixels: Vec<u8>,
}

impl RasterBuffer {
    /// Create a new RasterBuffer with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * 3,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a raster filled with a single color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * 3);
        for _ in 0..count {
            pixels.extend_from_slice(&rgb);
        }
        Self::new(width, height, pixels)
    }

    /// Create a RasterBuffer from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert to an image::RgbImage for further processing.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// RGB value at (x, y), or None when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        self.pixels
            .get(idx..idx + 3)
            .map(|p| [p[0], p[1], p[2]])
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Byte length `pixels` must have for the stated dimensions.
    pub fn expected_len(&self) -> usize {
        self.pixel_count() * 3
    }

    /// True when `pixels` holds exactly `width * height` RGB triples.
    ///
    /// Fields are public, so a buffer can be built that disagrees with its
    /// own dimensions. Operations that index pixels check this first.
    pub fn is_consistent(&self) -> bool {
        self.pixels.len() == self.expected_len()
    }

    /// Mean absolute per-channel difference to another raster of the same
    /// size, or `None` if the dimensions differ.
    pub fn mean_abs_diff(&self, other: &RasterBuffer) -> Option<f64> {
        if (self.width, self.height) != (other.width, other.height)
            || self.pixels.len() != other.pixels.len()
        {
            return None;
        }
        let total: u64 = self
            .pixels
            .iter()
            .zip(&other.pixels)
            .map(|(&a, &b)| u64::from(a.abs_diff(b)))
            .sum();
        Some(total as f64 / self.pixels.len().max(1) as f64)
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_from_exif() {
        assert_eq!(OrientationTag::from_exif(1), OrientationTag::Normal);
        assert_eq!(OrientationTag::from_exif(3), OrientationTag::Rotate180);
        assert_eq!(OrientationTag::from_exif(6), OrientationTag::Rotate90);
        assert_eq!(OrientationTag::from_exif(8), OrientationTag::Rotate270);
        // Mirrored variants are not corrected
        assert_eq!(OrientationTag::from_exif(2), OrientationTag::Normal);
        assert_eq!(OrientationTag::from_exif(5), OrientationTag::Normal);
        assert_eq!(OrientationTag::from_exif(99), OrientationTag::Normal);
    }

    #[test]
    fn test_orientation_exif_value_matches_from_exif() {
        for tag in [
            OrientationTag::Normal,
            OrientationTag::Rotate90,
            OrientationTag::Rotate180,
            OrientationTag::Rotate270,
        ] {
            assert_eq!(OrientationTag::from_exif(tag.exif_value() as u32), tag);
            assert_eq!(OrientationTag::from_degrees(tag.degrees()), Some(tag));
        }
        assert_eq!(OrientationTag::from_degrees(45), None);
    }

    #[test]
    fn test_orientation_swaps_dimensions() {
        assert!(!OrientationTag::Normal.swaps_dimensions());
        assert!(OrientationTag::Rotate90.swaps_dimensions());
        assert!(!OrientationTag::Rotate180.swaps_dimensions());
        assert!(OrientationTag::Rotate270.swaps_dimensions());
    }

    #[test]
    fn test_raster_creation() {
        let img = RasterBuffer::new(100, 50, vec![0u8; 100 * 50 * 3]);

        assert_eq!(img.width, 100);
        assert_eq!(img.height, 50);
        assert_eq!(img.pixel_count(), 5000);
        assert!(!img.is_empty());
    }

    #[test]
    fn test_raster_empty() {
        let img = RasterBuffer::new(0, 0, vec![]);
        assert!(img.is_empty());
    }

    #[test]
    fn test_raster_filled_and_pixel_access() {
        let img = RasterBuffer::filled(3, 2, [10, 20, 30]);
        assert_eq!(img.pixels.len(), 18);
        assert_eq!(img.pixel(2, 1), Some([10, 20, 30]));
        assert_eq!(img.pixel(3, 0), None);
        assert_eq!(img.pixel(0, 2), None);
    }

    #[test]
    fn test_raster_consistency() {
        assert!(RasterBuffer::filled(4, 3, [0, 0, 0]).is_consistent());
        let short = RasterBuffer {
            width: 4,
            height: 3,
            pixels: vec![0; 35],
        };
        assert_eq!(short.expected_len(), 36);
        assert!(!short.is_consistent());
    }

    #[test]
    fn test_raster_mean_abs_diff() {
        let dark = RasterBuffer::filled(2, 2, [10, 10, 10]);
        let light = RasterBuffer::filled(2, 2, [14, 6, 10]);
        assert_eq!(dark.mean_abs_diff(&dark), Some(0.0));
        // (4 + 4 + 0) per pixel over 3 channels
        let diff = dark.mean_abs_diff(&light).unwrap();
        assert!((diff - 8.0 / 3.0).abs() < 1e-9);
        assert_eq!(dark.mean_abs_diff(&RasterBuffer::filled(1, 4, [10, 10, 10])), None);
    }

    #[test]
    fn test_asset_keeps_source() {
        let asset = RawImageAsset::new(vec![1, 2, 3], AssetSource::Gallery);
        assert_eq!(asset.source(), AssetSource::Gallery);
        assert_eq!(asset.bytes(), &[1, 2, 3]);
        assert_eq!(asset.len(), 3);
    }

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::InvalidText("Invalid byte 33, offset 2.".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid transport text: Invalid byte 33, offset 2."
        );

        let err = DecodeError::InvalidFormat;
        assert_eq!(err.to_string(), "Invalid or unsupported image format");
    }
}
