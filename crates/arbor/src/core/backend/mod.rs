//! Contracts for the collaborators arbor draws and receives input through.
//!
//! Arbor never talks to a graphics API or windowing system directly. A
//! platform integration implements [`DrawBackend`] for its vector drawing
//! library, [`Surface`] and [`SurfaceFactory`] for its native windows, and
//! [`PlatformSource`] for its event pump.

pub mod image;
pub mod text;

use crate::{
    core::{error::WindowError, event::PlatformEvent, id::WindowId, style::Source},
    geom::{Point, Rect, Size},
};
use self::{image::ImageInfo, text::FontDescription};

/// A vector drawing context with a save/restore state stack.
///
/// Coordinates are relative to the current translation. `save` pushes the
/// translation, clip and source; `restore` pops them.
pub trait DrawBackend {
    /// Push the current drawing state.
    fn save(&mut self);
    /// Pop the most recently saved drawing state.
    fn restore(&mut self);
    /// Shift the origin.
    fn translate(&mut self, dx: f64, dy: f64);
    /// Intersect the clip region with a rectangle.
    fn clip(&mut self, rect: Rect);

    /// Set the paint source for subsequent fills and strokes.
    fn set_source(&mut self, source: &Source);
    /// Set the stroke width.
    fn set_line_width(&mut self, width: f64);
    /// Set the stroke dash pattern. An empty pattern draws solid lines.
    fn set_dash(&mut self, dashes: &[f64], offset: f64);

    /// Start a new sub-path.
    fn move_to(&mut self, p: Point);
    /// Add a straight segment.
    fn line_to(&mut self, p: Point);
    /// Add a cubic Bézier segment.
    fn curve_to(&mut self, c1: Point, c2: Point, end: Point);
    /// Add a closed rectangle sub-path.
    fn rectangle(&mut self, rect: Rect);
    /// Add a circular arc. Angles are in radians.
    fn arc(&mut self, center: Point, radius: f64, start: f64, end: f64);
    /// Close the current sub-path.
    fn close_path(&mut self);

    /// Fill and clear the current path.
    fn fill(&mut self);
    /// Stroke and clear the current path.
    fn stroke(&mut self);
    /// Paint the source over the whole clip region.
    fn paint(&mut self);

    /// Draw a string with its top-left corner at `at`.
    fn show_text(&mut self, font: &FontDescription, text: &str, at: Point);
    /// Blit an image scaled into `dest`.
    fn draw_image(&mut self, image: &ImageInfo, dest: Rect);
}

/// A native window's drawable surface.
pub trait Surface {
    /// Current surface size.
    fn size(&self) -> Size;
    /// Resize the backing store.
    fn resize(&mut self, size: Size) -> Result<(), WindowError>;
    /// The drawing context for the next frame.
    fn backend(&mut self) -> &mut dyn DrawBackend;
    /// Hand the frame to the platform. `damage` is the area that changed.
    fn present(&mut self, damage: Rect) -> Result<(), WindowError>;
}

/// Creates native windows and their surfaces.
pub trait SurfaceFactory {
    /// Create the native window `id`. A failure leaves no trace on screen.
    fn create(
        &mut self,
        id: WindowId,
        title: &str,
        size: Size,
    ) -> Result<Box<dyn Surface>, WindowError>;
}

/// The platform event pump.
pub trait PlatformSource {
    /// The next pending event, if any. Never blocks.
    fn poll(&mut self) -> Option<PlatformEvent>;
}
