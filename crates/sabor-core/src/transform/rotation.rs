//! Quarter-turn rotation by coordinate remapping.
//!
//! No interpolation is involved, so rotations are exact and form a cyclic
//! group: four 90° turns reproduce the input bit-for-bit.
//!
//! For a source of size `w x h`, destination pixel `(dx, dy)` reads from:
//! ```text
//!   0°: (dx,         dy)
//!  90°: (dy,         h - 1 - dx)
//! 180°: (w - 1 - dx, h - 1 - dy)
//! 270°: (w - 1 - dy, dx)
//! ```

use thiserror::Error;

use crate::decode::{OrientationTag, RasterBuffer};

/// Errors from raster transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransformError {
    /// Rotation angle outside {0, 90, 180, 270}.
    #[error("Invalid rotation: {0} degrees (expected 0, 90, 180 or 270)")]
    InvalidRotation(u32),

    /// Pixel data length doesn't match the raster's dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },
}

/// Rotate a raster clockwise by a quarter-turn multiple.
///
/// For 90 and 270 the output width and height are swapped relative to the
/// input. `rotate(&rotate(b, r1)?, r2)` equals `rotate(b, (r1 + r2) % 360)`.
///
/// # Errors
///
/// Returns `InvalidRotation` for any angle other than 0, 90, 180 or 270,
/// and `InvalidPixelData` for a buffer that disagrees with its dimensions.
pub fn rotate(image: &RasterBuffer, degrees: u32) -> Result<RasterBuffer, TransformError> {
    let tag =
        OrientationTag::from_degrees(degrees).ok_or(TransformError::InvalidRotation(degrees))?;
    rotate_by_tag(image, tag)
}

/// Rotate a raster by the correction an orientation tag calls for.
///
/// # Errors
///
/// Returns `InvalidPixelData` for a buffer that disagrees with its
/// dimensions.
pub fn rotate_by_tag(
    image: &RasterBuffer,
    tag: OrientationTag,
) -> Result<RasterBuffer, TransformError> {
    if !image.is_consistent() {
        return Err(TransformError::InvalidPixelData {
            expected: image.expected_len(),
            actual: image.pixels.len(),
        });
    }

    if tag == OrientationTag::Normal {
        return Ok(image.clone());
    }

    let (src_w, src_h) = (image.width as usize, image.height as usize);
    let (dst_w, dst_h) = if tag.swaps_dimensions() {
        (src_h, src_w)
    } else {
        (src_w, src_h)
    };

    let mut output = vec![0u8; dst_w * dst_h * 3];

    for dy in 0..dst_h {
        for dx in 0..dst_w {
            let (sx, sy) = match tag {
                OrientationTag::Rotate90 => (dy, src_h - 1 - dx),
                OrientationTag::Rotate180 => (src_w - 1 - dx, src_h - 1 - dy),
                OrientationTag::Rotate270 => (src_w - 1 - dy, dx),
                OrientationTag::Normal => (dx, dy),
            };
            let src_idx = (sy * src_w + sx) * 3;
            let dst_idx = (dy * dst_w + dx) * 3;
            output[dst_idx..dst_idx + 3].copy_from_slice(&image.pixels[src_idx..src_idx + 3]);
        }
    }

    Ok(RasterBuffer::new(dst_w as u32, dst_h as u32, output))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
