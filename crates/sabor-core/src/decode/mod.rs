//! Image acquisition types and decoding.
//!
//! This module provides:
//! - The raw asset, orientation, and raster types shared by every stage
//! - Orientation resolution from embedded EXIF metadata
//! - Decoding of JPEG/PNG bytes into RGB rasters
//!
//! Orientation lives only on encoded bytes. Decoding produces an untagged
//! raster, and correcting it is the caller's job via [`crate::transform`].

mod orientation;
mod raster;
mod types;

pub use orientation::{resolve_orientation, tag_orientation};
pub use raster::decode_raster;
pub use types::{AssetSource, DecodeError, OrientationTag, RasterBuffer, RawImageAsset};
