//! Display-direction pipeline: image field to an upright raster.
//!
//! Inline payloads are decoded from text, URLs go through an [`ImageFetcher`].
//! Either way the bytes' orientation tag is re-read and applied, so payloads
//! from clients that never corrected their images still display upright.
//! Rendering never fails: any stage error yields the configured placeholder.

use thiserror::Error;

use crate::config::PipelineConfig;
use crate::decode::{decode_raster, resolve_orientation, DecodeError, RasterBuffer};
use crate::field::ImageRef;
use crate::transform::{rotate_by_tag, TransformError};

/// Error reported by an [`ImageFetcher`].
#[derive(Debug, Error)]
#[error("Failed to fetch {url}: {reason}")]
pub struct FetchError {
    pub url: String,
    pub reason: String,
}

/// Loads the bytes behind a genuine remote URL.
pub trait ImageFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Why a render fell back to the placeholder.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("No image fetcher configured for {0}")]
    NoFetcher(String),
}

/// A raster in upright orientation, ready to paint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayableImage {
    raster: RasterBuffer,
    placeholder: bool,
}

impl DisplayableImage {
    pub fn raster(&self) -> &RasterBuffer {
        &self.raster
    }

    pub fn into_raster(self) -> RasterBuffer {
        self.raster
    }

    /// True when this is the fallback image rather than the requested one.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.raster.width, self.raster.height)
    }
}

/// Turns image fields into displayable images.
pub struct Renderer {
    config: PipelineConfig,
    fetcher: Option<Box<dyn ImageFetcher + Send + Sync>>,
}

impl Renderer {
    /// A renderer for inline payloads only. URLs render as the placeholder.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            fetcher: None,
        }
    }

    pub fn with_fetcher(mut self, fetcher: impl ImageFetcher + Send + Sync + 'static) -> Self {
        self.fetcher = Some(Box::new(fetcher));
        self
    }

    /// Render an image field, falling back to the placeholder on any error.
    pub fn render(&self, image: &ImageRef) -> DisplayableImage {
        match self.try_render(image) {
            Ok(displayable) => displayable,
            Err(e) => {
                log::warn!("Rendering placeholder: {}", e);
                self.placeholder()
            }
        }
    }

    /// Render the legacy overloaded string, classifying it first.
    pub fn render_legacy(&self, value: &str) -> DisplayableImage {
        self.render(&ImageRef::classify(value, self.config.inline_threshold))
    }

    /// Render an image field, reporting the first failing stage.
    pub fn try_render(&self, image: &ImageRef) -> Result<DisplayableImage, RenderError> {
        let bytes = match image {
            ImageRef::Inline { data } => data.decode()?,
            ImageRef::Url { url } => match &self.fetcher {
                Some(fetcher) => fetcher.fetch(url)?,
                None => return Err(RenderError::NoFetcher(url.clone())),
            },
        };

        let tag = resolve_orientation(&bytes);
        let raster = decode_raster(&bytes)?;

        Ok(DisplayableImage {
            raster: rotate_by_tag(&raster, tag)?,
            placeholder: false,
        })
    }

    /// The fallback image.
    pub fn placeholder(&self) -> DisplayableImage {
        let p = &self.config.placeholder;
        DisplayableImage {
            raster: RasterBuffer::filled(p.width, p.height, p.color),
            placeholder: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{tag_orientation, OrientationTag};
    use crate::test_helpers::jpeg_fixture;
    use crate::text::{encode, encode_with_scheme, JPEG_DATA_SCHEME};
    use std::collections::HashMap;

    struct MapFetcher(HashMap<String, Vec<u8>>);

    impl ImageFetcher for MapFetcher {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.0.get(url).cloned().ok_or_else(|| FetchError {
                url: url.to_string(),
                reason: "404".to_string(),
            })
        }
    }

    fn renderer() -> Renderer {
        Renderer::new(PipelineConfig::default())
    }

    #[test]
    fn test_render_inline_payload() {
        let payload = encode_with_scheme(&jpeg_fixture(20, 10), JPEG_DATA_SCHEME);
        let image = renderer().render(&ImageRef::inline(payload));
        assert!(!image.is_placeholder());
        assert_eq!(image.dimensions(), (20, 10));
    }

    #[test]
    fn test_render_applies_embedded_tag() {
        let tagged = tag_orientation(&jpeg_fixture(20, 10), OrientationTag::Rotate270).unwrap();
        let image = renderer().render(&ImageRef::inline(encode(&tagged)));
        assert_eq!(image.dimensions(), (10, 20));
    }

    #[test]
    fn test_render_malformed_text_falls_back() {
        let image = renderer().render_legacy("data:image/jpeg;base64,@@@@");
        assert!(image.is_placeholder());
        assert_eq!(image.dimensions(), (64, 64));
    }

    #[test]
    fn test_render_corrupt_bytes_falls_back() {
        let image = renderer().render(&ImageRef::inline(encode(b"definitely not a jpeg")));
        assert!(image.is_placeholder());
    }

    #[test]
    fn test_try_render_reports_stage() {
        let err = renderer()
            .try_render(&ImageRef::inline(encode(b"nope")))
            .unwrap_err();
        assert!(matches!(err, RenderError::Decode(_)));
    }

    #[test]
    fn test_render_url_without_fetcher_falls_back() {
        let image = renderer().render_legacy("https://example.com/a.png");
        assert!(image.is_placeholder());
    }

    #[test]
    fn test_render_url_through_fetcher() {
        let mut files = HashMap::new();
        files.insert("https://example.com/a.jpg".to_string(), jpeg_fixture(6, 4));
        let renderer = renderer().with_fetcher(MapFetcher(files));

        let found = renderer.render_legacy("https://example.com/a.jpg");
        assert!(!found.is_placeholder());
        assert_eq!(found.dimensions(), (6, 4));

        let missing = renderer.try_render(&ImageRef::url("https://example.com/b.jpg"));
        assert!(matches!(missing, Err(RenderError::Fetch(_))));
    }

    #[test]
    fn test_placeholder_uses_config() {
        let mut config = PipelineConfig::default();
        config.placeholder.width = 3;
        config.placeholder.height = 2;
        config.placeholder.color = [1, 2, 3];

        let image = Renderer::new(config).placeholder();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.raster().pixel(2, 1), Some([1, 2, 3]));
    }
}
