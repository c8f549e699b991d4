//! Raster transforms.
//!
//! Only lossless quarter-turn rotation is supported. Every transform returns
//! a new buffer and leaves its input untouched, so transforms compose.
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = clockwise
//! - Origin is top-left corner

mod rotation;

pub use rotation::{rotate, rotate_by_tag, TransformError};
