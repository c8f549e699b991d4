//! Sabor Core - Image acquisition and normalization for recipe attachments
//!
//! This crate turns photos from a camera or gallery into upright, compressed,
//! text-safe payloads that fit inside a JSON string, and reverses that for
//! display.
//!
//! Capture direction, via [`ImagePipeline::normalize`]:
//! ```text
//! bytes -> orientation -> raster -> rotate upright -> JPEG -> base64
//! ```
//! Display direction, via [`Renderer::render`]:
//! ```text
//! base64 | URL -> bytes -> orientation -> raster -> rotate upright
//! ```

pub mod config;
pub mod decode;
pub mod encode;
pub mod field;
pub mod pipeline;
pub mod recipe;
pub mod render;
pub mod text;
pub mod transform;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use config::{ConfigError, PipelineConfig, PlaceholderConfig};
pub use decode::{
    decode_raster, resolve_orientation, tag_orientation, AssetSource, DecodeError, OrientationTag,
    RasterBuffer, RawImageAsset,
};
pub use encode::{compress, quality_step, EncodeError, EncodedImage, QUALITY_STEPS};
pub use field::ImageRef;
pub use pipeline::{ImagePipeline, PipelineError};
pub use render::{DisplayableImage, FetchError, ImageFetcher, RenderError, Renderer};
pub use text::TransportPayload;
pub use transform::{rotate, rotate_by_tag, TransformError};
