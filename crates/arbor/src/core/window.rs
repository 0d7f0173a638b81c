//! The native window shell: owns a surface and a widget tree, and turns
//! platform events into dispatch.

use tracing::debug;

use super::{
    backend::{Surface, SurfaceFactory},
    event::WindowEvent,
    id::{NodeId, WindowId},
    sink::{EventSink, Notification},
    world::Core,
};
use crate::{
    error::Result,
    geom::{Insets, Point, Rect, Size},
};

/// Parameters for a new window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    /// Window title.
    pub title: String,
    /// Initial client area size.
    pub size: Size,
    /// Initial screen position.
    pub position: Point,
    /// Space between the client edge and the root widget.
    pub padding: Insets,
    /// Height of the menu band above the root widget. Zero for none.
    pub menu_height: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            size: Size::new(640.0, 480.0),
            position: Point::zero(),
            padding: Insets::zero(),
            menu_height: 0.0,
        }
    }
}

impl WindowConfig {
    /// A config with the given title and size.
    pub fn new(title: impl Into<String>, size: Size) -> Self {
        Self {
            title: title.into(),
            size,
            ..Self::default()
        }
    }

    /// Set the padding.
    pub fn padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    /// Set the menu band height.
    pub fn menu_height(mut self, h: f64) -> Self {
        self.menu_height = h;
        self
    }
}

/// A native window and the widget tree it hosts.
pub struct Window {
    /// Registry key.
    id: WindowId,
    /// Window title.
    title: String,
    /// Native drawable.
    surface: Box<dyn Surface>,
    /// Widget tree, damage and interaction state.
    core: Core,
    /// Screen position.
    position: Point,
    /// Client area size.
    size: Size,
    /// Space around the root.
    padding: Insets,
    /// Menu band height.
    menu_height: f64,
    /// Is the window mapped?
    shown: bool,
    /// Does the window hold keyboard focus?
    focused: bool,
    /// Has a close been accepted?
    closed: bool,
}

impl Window {
    /// Create the native window through `factory`. On failure nothing is
    /// shown and the error is returned.
    pub fn new(
        id: WindowId,
        config: &WindowConfig,
        factory: &mut dyn SurfaceFactory,
        sink: Box<dyn EventSink>,
    ) -> Result<Self> {
        let surface = factory.create(id, &config.title, config.size)?;
        let mut core = Core::new();
        core.set_sink(sink);
        let mut w = Self {
            id,
            title: config.title.clone(),
            surface,
            core,
            position: config.position,
            size: config.size,
            padding: config.padding,
            menu_height: config.menu_height.max(0.0),
            shown: false,
            focused: false,
            closed: false,
        };
        w.sync_root()?;
        debug!(window = ?id, title = %w.title, size = ?w.size, "window created");
        Ok(w)
    }

    /// Registry key.
    pub fn id(&self) -> WindowId {
        self.id
    }

    /// Window title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Set the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Client area size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Screen position.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Is the window mapped?
    pub fn is_shown(&self) -> bool {
        self.shown
    }

    /// Does the window hold keyboard focus?
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Has the window accepted a close request?
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Does the window have damage waiting to be drawn?
    pub fn is_dirty(&self) -> bool {
        self.core.damage().is_dirty()
    }

    /// The widget tree.
    pub fn core(&self) -> &Core {
        &self.core
    }

    /// The widget tree, mutably.
    pub fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    /// The area given to the root widget, in window coordinates.
    pub fn root_rect(&self) -> Rect {
        let p = self.padding;
        Rect::new(
            p.left,
            p.top + self.menu_height,
            self.size.w - p.horizontal(),
            self.size.h - self.menu_height - p.vertical(),
        )
    }

    /// Change the padding around the root.
    pub fn set_padding(&mut self, padding: Insets) -> Result<()> {
        self.padding = padding;
        self.sync_root()
    }

    /// Change the menu band height.
    pub fn set_menu_height(&mut self, h: f64) -> Result<()> {
        self.menu_height = h.max(0.0);
        self.sync_root()
    }

    fn sync_root(&mut self) -> Result<()> {
        let rect = self.root_rect();
        self.core.set_window_rect(self.size.rect(), rect)
    }

    /// The widget under a window point. `None` in the menu band, the
    /// padding, or outside the window.
    pub fn widget_at(&self, p: Point) -> Option<NodeId> {
        if !self.root_rect().contains_point(p) {
            return None;
        }
        self.core.hit_test(p)
    }

    /// Window-level sensitivity. An insensitive window ignores all pointer
    /// and keyboard input.
    pub fn set_sensitive(&mut self, sensitive: bool) -> Result<()> {
        self.core.set_enabled(sensitive)
    }

    /// Is the window sensitive?
    pub fn is_sensitive(&self) -> bool {
        self.core.is_enabled()
    }

    /// Move keyboard focus to a widget.
    pub fn set_focused_widget(&mut self, node: impl Into<NodeId>) -> Result<bool> {
        self.core.set_focus(node)
    }

    /// The widget holding keyboard focus.
    pub fn focused_widget(&self) -> Option<NodeId> {
        self.core.focused()
    }

    /// A window point in screen coordinates.
    pub fn convert_to_screen(&self, p: Point) -> Point {
        self.position + p
    }

    /// Accepts pointer buttons and motion?
    fn accepts_pointer(&self) -> bool {
        self.focused && self.core.is_enabled()
    }

    /// Handle one platform event.
    pub fn handle(&mut self, timestamp: u32, event: &WindowEvent) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        match event {
            WindowEvent::Shown => {
                self.shown = true;
                self.size = self.surface.size();
                self.sync_root()?;
                self.core.invalidate_all();
                debug!(window = ?self.id, "shown");
                self.core.notify(&Notification::WindowShown);
            }
            WindowEvent::Hidden => {
                self.shown = false;
                debug!(window = ?self.id, "hidden");
                self.core.notify(&Notification::WindowHidden);
            }
            WindowEvent::Exposed => self.core.invalidate_all(),
            WindowEvent::Moved(p) => {
                self.position = *p;
                self.core.notify(&Notification::WindowMoved(*p));
            }
            WindowEvent::Resized(s) => {
                self.surface.resize(*s)?;
                self.size = *s;
                self.sync_root()?;
                debug!(window = ?self.id, size = ?s, "resized");
                self.core.notify(&Notification::WindowResized(*s));
            }
            WindowEvent::PointerEntered => {}
            WindowEvent::PointerLeft => {
                self.core.end_drag()?;
                self.core.set_hover(None)?;
            }
            WindowEvent::FocusGained => {
                self.focused = true;
                debug!(window = ?self.id, "focus gained");
            }
            WindowEvent::FocusLost => {
                self.focused = false;
                self.core.end_drag()?;
                debug!(window = ?self.id, "focus lost");
            }
            WindowEvent::CloseRequested => {
                if self.core.sink.close_requested() {
                    debug!(window = ?self.id, "close vetoed");
                } else {
                    self.closed = true;
                    debug!(window = ?self.id, "close accepted");
                }
            }
            WindowEvent::PointerMoved { pos, modifiers } => {
                if self.accepts_pointer() {
                    self.core.pointer_moved(*pos, *modifiers, timestamp)?;
                }
            }
            WindowEvent::ButtonDown {
                button,
                pos,
                clicks,
                modifiers,
            } => {
                if self.accepts_pointer() {
                    self.core
                        .pointer_button(true, *button, *pos, *clicks, *modifiers, timestamp)?;
                }
            }
            WindowEvent::ButtonUp {
                button,
                pos,
                modifiers,
            } => {
                if self.accepts_pointer() {
                    self.core
                        .pointer_button(false, *button, *pos, 1, *modifiers, timestamp)?;
                }
            }
            WindowEvent::Wheel {
                pos,
                dx,
                dy,
                modifiers,
            } => {
                if self.core.is_enabled() {
                    self.core.pointer_wheel(*pos, *dx, *dy, *modifiers, timestamp)?;
                }
            }
            WindowEvent::KeyDown(k) => {
                if self.core.is_enabled() {
                    self.core.key(k.clone(), true)?;
                }
            }
            WindowEvent::KeyUp(k) => {
                if self.core.is_enabled() {
                    self.core.key(k.clone(), false)?;
                }
            }
        }
        Ok(())
    }

    /// Redraw the damaged region and present it. Hidden windows keep their
    /// damage until shown. Returns whether anything was drawn.
    pub fn draw(&mut self) -> Result<bool> {
        if !self.shown || self.closed {
            return Ok(false);
        }
        match self.core.redraw(self.surface.backend())? {
            Some(rect) => {
                self.surface.present(rect)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{Error, WindowError},
        event::{Key, KeyEvent, Modifiers, MouseButton},
        testing::{Probe, Recorder, RecordingFactory},
    };

    fn window(config: &WindowConfig) -> Result<(Window, crate::testing::Notes, RecordingFactory)> {
        let mut factory = RecordingFactory::new();
        let (recorder, notes) = Recorder::new();
        let w = Window::new(WindowId::default(), config, &mut factory, Box::new(recorder))?;
        Ok((w, notes, factory))
    }

    #[test]
    fn creation_failure() {
        let mut factory = RecordingFactory::failing();
        let r = Window::new(
            WindowId::default(),
            &WindowConfig::default(),
            &mut factory,
            Box::new(crate::sink::NullSink),
        );
        assert!(matches!(r, Err(Error::Window(WindowError::Create(_)))));
        assert_eq!(factory.created(), 0);
    }

    #[test]
    fn padding_and_menu_offset_root() -> Result<()> {
        let config = WindowConfig::new("t", Size::new(200.0, 100.0))
            .padding(Insets::new(5.0, 4.0, 3.0, 2.0))
            .menu_height(20.0);
        let (w, _, _) = window(&config)?;
        assert_eq!(w.root_rect(), Rect::new(5.0, 24.0, 192.0, 74.0));
        assert_eq!(w.core().bounds(w.core().root_id())?, w.root_rect());
        assert_eq!(w.widget_at(Point::new(50.0, 10.0)), None);
        assert_eq!(w.widget_at(Point::new(2.0, 50.0)), None);
        assert_eq!(w.widget_at(Point::new(50.0, 50.0)), Some(w.core().root_id()));
        Ok(())
    }

    #[test]
    fn lifecycle_notifications() -> Result<()> {
        let (mut w, notes, _) = window(&WindowConfig::new("t", Size::new(100.0, 100.0)))?;
        notes.clear();
        w.handle(0, &WindowEvent::Shown)?;
        assert!(w.is_shown() && w.is_dirty());
        assert!(w.draw()?);
        assert!(!w.is_dirty());
        w.handle(1, &WindowEvent::Exposed)?;
        assert!(w.is_dirty());
        w.handle(2, &WindowEvent::Moved(Point::new(30.0, 40.0)))?;
        assert_eq!(w.convert_to_screen(Point::new(1.0, 2.0)), Point::new(31.0, 42.0));
        w.handle(3, &WindowEvent::Resized(Size::new(50.0, 60.0)))?;
        assert_eq!(w.core().damage().rect(), Some(Rect::new(0.0, 0.0, 50.0, 60.0)));
        w.handle(4, &WindowEvent::Hidden)?;
        assert!(!w.draw()?);
        assert_eq!(
            notes.all(),
            vec![
                Notification::WindowShown,
                Notification::WindowMoved(Point::new(30.0, 40.0)),
                Notification::BoundsChanged {
                    node: w.core().root_id(),
                    bounds: Rect::new(0.0, 0.0, 50.0, 60.0)
                },
                Notification::WindowResized(Size::new(50.0, 60.0)),
                Notification::WindowHidden,
            ]
        );
        Ok(())
    }

    #[test]
    fn pointer_requires_focus_and_sensitivity() -> Result<()> {
        let (mut w, _, _) = window(&WindowConfig::new("t", Size::new(100.0, 100.0)))?;
        let (p, log) = Probe::new().focusable().logged();
        let root = w.core().root_id();
        let p = w.core_mut().add_child(root, p)?;
        let down = WindowEvent::ButtonDown {
            button: MouseButton::Left,
            pos: Point::new(10.0, 10.0),
            clicks: 1,
            modifiers: Modifiers::NONE,
        };
        w.handle(0, &down)?;
        assert_eq!(log.events().len(), 0);

        w.handle(1, &WindowEvent::FocusGained)?;
        w.handle(2, &down)?;
        assert_eq!(w.focused_widget(), Some(p));
        let presses = log.count(|e| matches!(e, crate::event::Event::ButtonPressed(_)));
        assert_eq!(presses, 1);

        w.set_sensitive(false)?;
        w.handle(3, &down)?;
        w.handle(4, &WindowEvent::KeyDown(KeyEvent::new(Key::Enter)))?;
        assert_eq!(log.count(|e| matches!(e, crate::event::Event::ButtonPressed(_))), 1);
        assert_eq!(log.count(|e| matches!(e, crate::event::Event::KeyPressed(_))), 0);
        Ok(())
    }

    #[test]
    fn close_can_be_vetoed() -> Result<()> {
        let mut factory = RecordingFactory::new();
        let (recorder, _) = Recorder::new();
        let mut w = Window::new(
            WindowId::default(),
            &WindowConfig::default(),
            &mut factory,
            Box::new(recorder.vetoing()),
        )?;
        w.handle(0, &WindowEvent::CloseRequested)?;
        assert!(!w.is_closed());

        let (mut w, _, _) = window(&WindowConfig::default())?;
        w.handle(0, &WindowEvent::CloseRequested)?;
        assert!(w.is_closed());
        Ok(())
    }
}
