use super::{
    backend::{DrawLog, RecordingFactory},
    sink::{Notes, Recorder},
};
use crate::{
    Context, Core, NodeId, TypedId, Widget, Window, WindowId,
    backend::text::MonospaceMetrics,
    error::{Error, Result},
    event::{KeyEvent, Modifiers, MouseButton, WindowEvent},
    geom::{Insets, Point, Size},
    style::Theme,
    window::WindowConfig,
};

/// Width of one character under the harness text metrics.
pub const CELL_WIDTH: f64 = 8.0;
/// Height of one line under the harness text metrics.
pub const CELL_HEIGHT: f64 = 16.0;

/// A shown, focused [`Window`] wired to recording doubles. Tests drive it
/// with pointer and key helpers and inspect the draw log and notifications.
pub struct Harness {
    /// The window under test.
    pub window: Window,
    /// Notifications the window reported.
    pub notes: Notes,
    /// What the window drew.
    pub draws: DrawLog,
    /// Timestamp of the last event sent.
    time: u32,
}

/// Builder for a [`Harness`].
#[derive(Debug, Clone)]
pub struct HarnessBuilder {
    config: WindowConfig,
    theme: Theme,
}

impl HarnessBuilder {
    fn new() -> Self {
        Self {
            config: WindowConfig::new("harness", Size::new(200.0, 200.0)),
            theme: Theme::default(),
        }
    }

    /// Set the window size.
    pub fn size(mut self, w: f64, h: f64) -> Self {
        self.config.size = Size::new(w, h);
        self
    }

    /// Set the window padding.
    pub fn padding(mut self, padding: Insets) -> Self {
        self.config.padding = padding;
        self
    }

    /// Set the menu band height.
    pub fn menu_height(mut self, h: f64) -> Self {
        self.config.menu_height = h;
        self
    }

    /// Set the theme.
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Create the window, show and focus it, draw the first frame and clear
    /// the logs.
    pub fn build(self) -> Result<Harness> {
        let factory = RecordingFactory::new();
        let (recorder, notes) = Recorder::new();
        let id = WindowId::default();
        let mut window = Window::new(id, &self.config, &mut factory.clone(), Box::new(recorder))?;
        window.core_mut().set_theme(self.theme);
        window
            .core_mut()
            .set_text_measure(Box::new(MonospaceMetrics::cell(CELL_WIDTH, CELL_HEIGHT)));
        let draws = factory
            .log(id)
            .ok_or_else(|| Error::Internal("harness surface missing".into()))?;

        let mut h = Harness {
            window,
            notes,
            draws,
            time: 0,
        };
        h.send(WindowEvent::Shown)?;
        h.send(WindowEvent::FocusGained)?;
        h.draw()?;
        h.draws.clear();
        h.notes.clear();
        Ok(h)
    }
}

impl Harness {
    /// A builder with a 200x200 window.
    pub fn builder() -> HarnessBuilder {
        HarnessBuilder::new()
    }

    /// A 200x200 harness.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// The window's widget tree.
    pub fn core(&self) -> &Core {
        self.window.core()
    }

    /// The window's widget tree, mutably.
    pub fn core_mut(&mut self) -> &mut Core {
        self.window.core_mut()
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.core().root_id()
    }

    /// Attach a widget under the root.
    pub fn add<W: Widget + 'static>(&mut self, widget: W) -> Result<NodeId> {
        let root = self.root();
        self.core_mut().add_child(root, widget)
    }

    /// Attach a widget under the root and return a typed handle.
    pub fn add_typed<W: Widget + 'static>(&mut self, widget: W) -> Result<TypedId<W>> {
        Ok(TypedId::new(self.add(widget)?))
    }

    /// Replace the root widget.
    pub fn set_root<W: Widget + 'static>(&mut self, widget: W) -> Result<TypedId<W>> {
        Ok(TypedId::new(self.core_mut().set_root(widget)?))
    }

    /// Run a closure against a typed widget.
    pub fn with<W, R>(
        &mut self,
        id: TypedId<W>,
        f: impl FnOnce(&mut W, &mut dyn Context) -> Result<R>,
    ) -> Result<R>
    where
        W: Widget + 'static,
    {
        self.core_mut().with_typed(id, f)
    }

    /// Send a platform event with the next timestamp.
    pub fn send(&mut self, event: WindowEvent) -> Result<()> {
        self.time += 1;
        self.window.handle(self.time, &event)
    }

    /// Move the pointer.
    pub fn move_to(&mut self, pos: Point) -> Result<()> {
        self.send(WindowEvent::PointerMoved {
            pos,
            modifiers: Modifiers::NONE,
        })
    }

    /// Press the left button.
    pub fn press(&mut self, pos: Point) -> Result<()> {
        self.send(WindowEvent::ButtonDown {
            button: MouseButton::Left,
            pos,
            clicks: 1,
            modifiers: Modifiers::NONE,
        })
    }

    /// Release the left button.
    pub fn release(&mut self, pos: Point) -> Result<()> {
        self.send(WindowEvent::ButtonUp {
            button: MouseButton::Left,
            pos,
            modifiers: Modifiers::NONE,
        })
    }

    /// Move to, press and release the left button at `pos`.
    pub fn click(&mut self, pos: Point) -> Result<()> {
        self.move_to(pos)?;
        self.press(pos)?;
        self.release(pos)
    }

    /// Drag with the left button from `from` to `to`.
    pub fn drag(&mut self, from: Point, to: Point) -> Result<()> {
        self.move_to(from)?;
        self.press(from)?;
        self.move_to(to)?;
        self.release(to)
    }

    /// Turn the wheel.
    pub fn wheel(&mut self, pos: Point, dx: f64, dy: f64) -> Result<()> {
        self.send(WindowEvent::Wheel {
            pos,
            dx,
            dy,
            modifiers: Modifiers::NONE,
        })
    }

    /// Press and release a key.
    pub fn key(&mut self, key: impl Into<KeyEvent>) -> Result<()> {
        let k = key.into();
        self.send(WindowEvent::KeyDown(k.clone()))?;
        self.send(WindowEvent::KeyUp(k))
    }

    /// Resize the window.
    pub fn resize(&mut self, w: f64, h: f64) -> Result<()> {
        self.send(WindowEvent::Resized(Size::new(w, h)))
    }

    /// Draw pending damage. Returns whether anything was drawn.
    pub fn draw(&mut self) -> Result<bool> {
        self.window.draw()
    }

    /// Forget earlier draw operations, then draw pending damage.
    pub fn redraw(&mut self) -> Result<bool> {
        self.draws.clear();
        self.draw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{geom::Rect, style::Color, testing::Probe};

    #[test]
    fn builder_shows_and_focuses() -> Result<()> {
        let h = Harness::builder().size(50.0, 40.0).build()?;
        assert!(h.window.is_shown());
        assert!(h.window.is_focused());
        assert!(!h.window.is_dirty());
        assert!(h.notes.is_empty());
        assert_eq!(h.core().bounds(h.root())?, Rect::new(0.0, 0.0, 50.0, 40.0));
        Ok(())
    }

    #[test]
    fn draws_are_recorded() -> Result<()> {
        let mut h = Harness::builder().size(50.0, 40.0).build()?;
        h.add(Probe::new().filled(Color::BLACK))?;
        assert!(h.draw()?);
        assert!(
            h.draws
                .fills()
                .contains(&(Rect::new(0.0, 0.0, 50.0, 40.0), Color::BLACK))
        );
        assert_eq!(h.draws.presents(), vec![Rect::new(0.0, 0.0, 50.0, 40.0)]);
        assert!(!h.redraw()?);
        Ok(())
    }
}
