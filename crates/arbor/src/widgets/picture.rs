//! An image leaf.

use crate::{
    Context, Painter, ViewContext, Widget,
    backend::image::{ImageDecoder, ImageInfo},
    error::Result,
    geom::{Constraint, Rect, Size},
};

/// Shows a decoded image scaled to fit its bounds, keeping the aspect ratio
/// and centring it.
#[derive(Debug, Clone, Default)]
pub struct Picture {
    /// The image, if one is set.
    image: Option<ImageInfo>,
}

impl Picture {
    /// An empty picture.
    pub fn new() -> Self {
        Self::default()
    }

    /// A picture showing an already decoded image.
    pub fn with_image(image: ImageInfo) -> Self {
        Self { image: Some(image) }
    }

    /// Decode `bytes` with `decoder`.
    pub fn from_bytes(decoder: &dyn ImageDecoder, bytes: &[u8]) -> Result<Self> {
        Ok(Self::with_image(decoder.decode(bytes)?))
    }

    /// The current image.
    pub fn image(&self) -> Option<&ImageInfo> {
        self.image.as_ref()
    }

    /// Replace the image and re-run the parent's layout.
    pub fn set_image(&mut self, ctx: &mut dyn Context, image: Option<ImageInfo>) -> Result<()> {
        self.image = image;
        ctx.invalidate();
        if let Some(parent) = ctx.parent_of(ctx.node_id()) {
            ctx.layout_node(parent)?;
        }
        Ok(())
    }

    /// Natural pixel size of the image.
    pub fn natural_size(&self) -> Size {
        self.image
            .as_ref()
            .map(|i| Size::new(f64::from(i.width), f64::from(i.height)))
            .unwrap_or_default()
    }

    /// The largest rectangle with the image's aspect ratio that fits in
    /// `bounds`, centred.
    pub fn fit(&self, bounds: Rect) -> Option<Rect> {
        let natural = self.natural_size();
        if natural.is_empty() || bounds.is_empty() {
            return None;
        }
        let scale = (bounds.w / natural.w).min(bounds.h / natural.h);
        let (w, h) = (natural.w * scale, natural.h * scale);
        Some(Rect::new(
            bounds.tl.x + (bounds.w - w) / 2.0,
            bounds.tl.y + (bounds.h - h) / 2.0,
            w,
            h,
        ))
    }
}

impl Widget for Picture {
    fn draw(&mut self, p: &mut Painter, ctx: &dyn ViewContext) -> Result<()> {
        if let (Some(image), Some(dest)) = (self.image.as_ref(), self.fit(ctx.bounds())) {
            p.image(image, dest);
        }
        Ok(())
    }

    fn preferred_size(&self, wc: Constraint, hc: Constraint, _ctx: &dyn ViewContext) -> Size {
        let s = self.natural_size();
        Size::new(wc.clamp(s.w), hc.clamp(s.h))
    }
}

#[cfg(test)]
mod tests {
    use std::{io::Cursor, sync::Arc};

    use ::image::{ImageFormat, Rgba, RgbaImage};

    use super::*;
    use crate::{
        backend::image::RasterDecoder,
        error::Error,
        testing::{DrawOp, Harness},
    };

    fn info(width: u32, height: u32) -> ImageInfo {
        ImageInfo {
            width,
            height,
            handle: Arc::new(()),
        }
    }

    #[test]
    fn fit_keeps_aspect() {
        let p = Picture::with_image(info(40, 20));
        assert_eq!(
            p.fit(Rect::new(0.0, 0.0, 100.0, 100.0)),
            Some(Rect::new(0.0, 25.0, 100.0, 50.0))
        );
        assert_eq!(p.fit(Rect::zero()), None);
        assert_eq!(Picture::new().fit(Rect::new(0.0, 0.0, 10.0, 10.0)), None);
    }

    #[test]
    fn decoded_dimensions() -> Result<()> {
        let src = RgbaImage::from_pixel(6, 4, Rgba([0, 255, 0, 255]));
        let mut bytes = Cursor::new(Vec::new());
        src.write_to(&mut bytes, ImageFormat::Png)
            .map_err(|e| Error::Internal(e.to_string()))?;
        let p = Picture::from_bytes(&RasterDecoder, bytes.get_ref())?;
        assert_eq!(p.natural_size(), Size::new(6.0, 4.0));
        assert!(Picture::from_bytes(&RasterDecoder, b"nope").is_err());
        Ok(())
    }

    #[test]
    fn draws_centred() -> Result<()> {
        let mut h = Harness::builder().size(100.0, 60.0).build()?;
        h.add(Picture::with_image(info(10, 10)))?;
        h.redraw()?;
        let images: Vec<DrawOp> = h
            .draws
            .ops()
            .into_iter()
            .filter(|op| matches!(op, DrawOp::Image { .. }))
            .collect();
        assert_eq!(
            images,
            vec![DrawOp::Image {
                size: (10, 10),
                dest: Rect::new(20.0, 0.0, 60.0, 60.0),
            }]
        );
        Ok(())
    }
}
