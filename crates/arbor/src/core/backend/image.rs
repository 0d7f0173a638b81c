//! Decoded images and the image decoding collaborator.

use std::{any::Any, fmt, sync::Arc};

use ::image::RgbaImage;

use crate::error::{Error, Result};

/// An opaque, cheaply cloned handle the draw backend knows how to blit.
pub type ImageHandle = Arc<dyn Any + Send + Sync>;

/// A decoded image.
#[derive(Clone)]
pub struct ImageInfo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Backend-specific pixel data.
    pub handle: ImageHandle,
}

impl ImageInfo {
    /// The decoded RGBA pixels, when the handle came from [`RasterDecoder`].
    pub fn rgba(&self) -> Option<&RgbaImage> {
        self.handle.downcast_ref::<RgbaImage>()
    }
}

impl fmt::Debug for ImageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageInfo")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Turns encoded bytes into a drawable image.
pub trait ImageDecoder {
    /// Decode `bytes`.
    fn decode(&self, bytes: &[u8]) -> Result<ImageInfo>;
}

/// Decodes any format the `image` crate recognises into RGBA pixels.
#[derive(Debug, Default, Clone, Copy)]
pub struct RasterDecoder;

impl ImageDecoder for RasterDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<ImageInfo> {
        let img = ::image::load_from_memory(bytes)
            .map_err(|e| Error::Invalid(format!("image decode: {e}")))?
            .to_rgba8();
        Ok(ImageInfo {
            width: img.width(),
            height: img.height(),
            handle: Arc::new(img),
        })
    }
}
