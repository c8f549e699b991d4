//! Decoding of encoded image bytes into RGB rasters.

use std::io::Cursor;

use image::ImageReader;

use super::{DecodeError, RasterBuffer};

/// Decode encoded image bytes (JPEG or PNG) into an RGB raster.
///
/// Orientation metadata is ignored here; callers resolve it separately with
/// [`super::resolve_orientation`] and rotate the raster themselves.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` for empty input or bytes whose
/// format cannot be recognized, `DecodeError::CorruptedFile` if decoding
/// fails part way.
pub fn decode_raster(bytes: &[u8]) -> Result<RasterBuffer, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::InvalidFormat);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    Ok(RasterBuffer::from_rgb_image(img.into_rgb8()))
}
