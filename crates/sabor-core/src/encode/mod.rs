//! Lossy compression of rasters for transport.
//!
//! The compressor writes baseline JPEG without any metadata segments, so a
//! compressed image never carries an orientation tag: whatever rotation was
//! needed has already been applied to the pixels.

mod jpeg;

pub use jpeg::{compress, quality_step, EncodeError, EncodedImage, DEFAULT_QUALITY, QUALITY_STEPS};
