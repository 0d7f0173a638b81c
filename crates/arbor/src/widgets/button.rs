//! Push button widget.

use crate::{
    Context, EventOutcome, Painter, ViewContext, Widget,
    backend::text::FontDescription,
    error::Result,
    event::{Event, Key, MouseButton},
    geom::{Constraint, Insets, Point, Size},
    sink::Notification,
    style::Color,
};

/// Width of the button frame.
const FRAME: f64 = 1.0;

/// A push button. Reports [`Notification::Clicked`] when released over
/// itself after a press, or when Enter or Space is pressed while it has
/// focus.
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    /// Button text.
    label: String,
    /// Font override.
    font: Option<FontDescription>,
    /// Left button is down and the pointer has not left since.
    pressed: bool,
    /// Pointer is over the button.
    hovered: bool,
}

impl Button {
    /// A button showing `label`.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            font: None,
            pressed: false,
            hovered: false,
        }
    }

    /// Use a specific font.
    pub fn with_font(mut self, font: FontDescription) -> Self {
        self.font = Some(font);
        self
    }

    /// The button text.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Is the button held down?
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Is the pointer over the button?
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Replace the text and re-run the parent's layout.
    pub fn set_label(&mut self, ctx: &mut dyn Context, label: impl Into<String>) -> Result<()> {
        self.label = label.into();
        ctx.invalidate();
        if let Some(parent) = ctx.parent_of(ctx.node_id()) {
            ctx.layout_node(parent)?;
        }
        Ok(())
    }

    /// Fire the click notification.
    pub fn click(&mut self, ctx: &mut dyn Context) {
        let node = ctx.node_id();
        ctx.notify(Notification::Clicked(node));
    }

    fn padding(ctx: &dyn ViewContext) -> Insets {
        let pad = ctx.theme().label_insets();
        Insets::new(
            pad.left + FRAME,
            pad.top + FRAME,
            pad.right + FRAME,
            pad.bottom + FRAME,
        )
    }

    fn font<'a>(&'a self, ctx: &'a dyn ViewContext) -> &'a FontDescription {
        self.font.as_ref().unwrap_or(&ctx.theme().font)
    }

    fn set_pressed(&mut self, ctx: &mut dyn Context, pressed: bool) {
        if self.pressed != pressed {
            self.pressed = pressed;
            ctx.invalidate();
        }
    }

    fn set_hovered(&mut self, ctx: &mut dyn Context, hovered: bool) {
        if self.hovered != hovered {
            self.hovered = hovered;
            ctx.invalidate();
        }
    }
}

impl Widget for Button {
    fn accept_focus(&self) -> bool {
        true
    }

    fn on_event(&mut self, event: &Event, ctx: &mut dyn Context) -> Result<EventOutcome> {
        match event {
            Event::MouseEntered => {
                self.set_hovered(ctx, true);
                Ok(EventOutcome::Ignore)
            }
            Event::MouseExited => {
                self.set_hovered(ctx, false);
                self.set_pressed(ctx, false);
                Ok(EventOutcome::Ignore)
            }
            Event::ButtonPressed(b) if b.button == MouseButton::Left => {
                self.set_pressed(ctx, true);
                Ok(EventOutcome::Handle)
            }
            Event::ButtonReleased(b) if b.button == MouseButton::Left => {
                if self.pressed {
                    self.set_pressed(ctx, false);
                    if ctx.bounds().contains_point(b.pos) {
                        self.click(ctx);
                    }
                }
                Ok(EventOutcome::Handle)
            }
            Event::KeyPressed(k) if matches!(k.key, Key::Enter | Key::Space) && !k.repeat => {
                self.click(ctx);
                Ok(EventOutcome::Handle)
            }
            Event::FocusGained | Event::FocusLost => {
                ctx.invalidate();
                Ok(EventOutcome::Ignore)
            }
            _ => Ok(EventOutcome::Ignore),
        }
    }

    fn draw(&mut self, p: &mut Painter, ctx: &dyn ViewContext) -> Result<()> {
        let theme = ctx.theme();
        let bounds = ctx.bounds();
        let face = if !ctx.is_sensitive() {
            theme.button_insensitive
        } else if self.pressed {
            theme.button_pressed
        } else if self.hovered {
            theme.button_hovered
        } else {
            theme.button_normal
        };
        p.fill_rect(bounds, Color::grey(face));
        p.stroke_rect(bounds, theme.notebook_border, FRAME);

        if !self.label.is_empty() {
            let m = ctx.text_metrics(self.font(ctx), &self.label);
            let mut at = Point::new(
                (bounds.w - m.width) / 2.0,
                (bounds.h - m.height) / 2.0,
            );
            if self.pressed {
                at = at.offset(1.0, 1.0);
            }
            p.text(self.font(ctx), &self.label, at, theme.foreground);
        }

        if ctx.is_focused() {
            p.stroke_rect(bounds.inset(Insets::uniform(FRAME + 1.0)), theme.focus, 1.0);
        }
        Ok(())
    }

    fn preferred_size(&self, wc: Constraint, hc: Constraint, ctx: &dyn ViewContext) -> Size {
        let pad = Self::padding(ctx);
        let m = ctx.text_metrics(self.font(ctx), &self.label);
        Size::new(
            wc.clamp(m.width + pad.horizontal()),
            hc.clamp(m.height + pad.vertical()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        TypedId,
        geom::Rect,
        testing::{CELL_HEIGHT, CELL_WIDTH, Harness},
    };

    fn button() -> Result<(Harness, TypedId<Button>)> {
        let mut h = Harness::builder().size(100.0, 40.0).build()?;
        let b = h.add_typed(Button::new("OK"))?;
        h.notes.clear();
        Ok((h, b))
    }

    #[test]
    fn click_notifies() -> Result<()> {
        let (mut h, b) = button()?;
        h.move_to(Point::new(50.0, 20.0))?;
        h.press(Point::new(50.0, 20.0))?;
        assert!(h.with(b, |b, _| Ok(b.is_pressed()))?);
        assert_eq!(h.core().focused(), Some(b.id()));
        h.release(Point::new(50.0, 20.0))?;
        assert_eq!(h.notes.clicks(), vec![b.id()]);
        assert!(!h.with(b, |b, _| Ok(b.is_pressed()))?);
        Ok(())
    }

    #[test]
    fn leaving_cancels_press() -> Result<()> {
        let (mut h, b) = button()?;
        h.move_to(Point::new(50.0, 20.0))?;
        h.press(Point::new(50.0, 20.0))?;
        h.send(crate::event::WindowEvent::PointerLeft)?;
        assert!(!h.with(b, |b, _| Ok(b.is_pressed()))?);
        h.move_to(Point::new(50.0, 20.0))?;
        h.release(Point::new(50.0, 20.0))?;
        assert!(h.notes.clicks().is_empty());
        Ok(())
    }

    #[test]
    fn keyboard_activation() -> Result<()> {
        let (mut h, b) = button()?;
        h.key(Key::Enter)?;
        assert!(h.notes.clicks().is_empty());
        h.core_mut().set_focus(b)?;
        h.key(Key::Enter)?;
        h.key(' ')?;
        assert_eq!(h.notes.clicks(), vec![b.id(), b.id()]);
        Ok(())
    }

    #[test]
    fn insensitive_ignores_clicks() -> Result<()> {
        let (mut h, b) = button()?;
        h.core_mut().set_sensitive(b, false)?;
        h.click(Point::new(50.0, 20.0))?;
        assert!(h.notes.clicks().is_empty());
        h.redraw()?;
        let face = h.core().theme().button_insensitive;
        assert!(
            h.draws
                .fills()
                .contains(&(Rect::new(0.0, 0.0, 100.0, 40.0), Color::grey(face)))
        );
        Ok(())
    }

    #[test]
    fn preferred_fits_label() -> Result<()> {
        let (h, b) = button()?;
        let s = h
            .core()
            .preferred_size(b, Constraint::Unconstrained, Constraint::Unconstrained)?;
        assert_eq!(s, Size::new(2.0 * CELL_WIDTH + 10.0, CELL_HEIGHT + 8.0));
        Ok(())
    }
}
