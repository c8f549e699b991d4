//! EXIF orientation reading and writing.
//!
//! Reading never fails: absent, unsupported, or corrupt metadata resolves to
//! [`OrientationTag::Normal`] so that a missing tag cannot block the pipeline.

use std::io::Cursor;

use exif::{In, Reader, Tag};

use super::{DecodeError, OrientationTag};

const SOI: [u8; 2] = [0xFF, 0xD8];
const APP1: [u8; 2] = [0xFF, 0xE1];
const EXIF_HEADER: &[u8; 6] = b"Exif\0\0";

/// Read the orientation tag embedded in encoded image bytes.
pub fn resolve_orientation(bytes: &[u8]) -> OrientationTag {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(OrientationTag::from_exif)
            .unwrap_or_default(),
        Err(e) => {
            log::debug!("No usable EXIF orientation ({}), assuming Normal", e);
            OrientationTag::Normal
        }
    }
}

/// Return a copy of `jpeg` carrying an EXIF orientation tag.
///
/// A minimal big-endian APP1 segment holding a single Orientation entry is
/// inserted directly after the SOI marker. Camera sensors report rotation
/// this way instead of rotating pixels.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes do not start with a
/// JPEG SOI marker.
pub fn tag_orientation(jpeg: &[u8], tag: OrientationTag) -> Result<Vec<u8>, DecodeError> {
    if jpeg.len() < 2 || jpeg[0..2] != SOI {
        return Err(DecodeError::InvalidFormat);
    }

    let value = tag.exif_value().to_be_bytes();
    let mut tiff = Vec::with_capacity(26);
    // Header: big-endian, magic 42, IFD0 at offset 8
    tiff.extend_from_slice(b"MM\x00\x2A\x00\x00\x00\x08");
    // IFD0 with one entry: 0x0112 SHORT x1
    tiff.extend_from_slice(&[0x00, 0x01]);
    tiff.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
    tiff.extend_from_slice(&[value[0], value[1], 0x00, 0x00]);
    // No next IFD
    tiff.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

    let segment_len = (2 + EXIF_HEADER.len() + tiff.len()) as u16;

    let mut out = Vec::with_capacity(jpeg.len() + segment_len as usize + 2);
    out.extend_from_slice(&SOI);
    out.extend_from_slice(&APP1);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(EXIF_HEADER);
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&jpeg[2..]);
    Ok(out)
}
