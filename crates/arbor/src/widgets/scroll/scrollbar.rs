//! A scrollbar: a trough, a draggable thumb and a [`ScrollState`].

use super::state::ScrollState;
use crate::{
    Context, EventOutcome, Painter, ViewContext, Widget,
    error::Result,
    event::{Event, MouseButton},
    geom::{Constraint, Orientation, Point, Rect, Size},
    sink::Notification,
};

/// Where the scrollbar is in its drag state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// The thumb is being dragged. `grab` is the pointer's offset into the
    /// thumb along the bar's axis when the drag began.
    Dragging {
        /// Offset into the thumb.
        grab: f64,
    },
}

/// A scrollbar widget.
///
/// Every value change is reported to the window's sink and posted to the
/// parent node as [`Event::ValueChanged`].
#[derive(Debug, Clone)]
pub struct Scrollbar {
    /// Axis the thumb moves along.
    orientation: Orientation,
    /// Range and value.
    state: ScrollState,
    /// Drag state machine.
    drag: DragState,
    /// Is the pointer over the thumb?
    thumb_hovered: bool,
}

impl Scrollbar {
    /// A scrollbar along `orientation`.
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            state: ScrollState::default(),
            drag: DragState::Idle,
            thumb_hovered: false,
        }
    }

    /// A vertical scrollbar.
    pub fn vertical() -> Self {
        Self::new(Orientation::Vertical)
    }

    /// A horizontal scrollbar.
    pub fn horizontal() -> Self {
        Self::new(Orientation::Horizontal)
    }

    /// Axis the thumb moves along.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// The range and value.
    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    /// Current value.
    pub fn value(&self) -> f64 {
        self.state.value()
    }

    /// Drag state.
    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// Is a thumb drag in progress?
    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Is the pointer over the thumb?
    pub fn is_thumb_hovered(&self) -> bool {
        self.thumb_hovered
    }

    /// Replace the range, keeping `value` clamped to it.
    #[allow(clippy::too_many_arguments)]
    pub fn set_range(
        &mut self,
        ctx: &mut dyn Context,
        lower: f64,
        upper: f64,
        page_size: f64,
        page_increment: f64,
        step_increment: f64,
        value: f64,
    ) -> Result<()> {
        let old = self.state;
        if self
            .state
            .set_range(lower, upper, page_size, page_increment, step_increment, value)
        {
            self.value_changed(ctx);
        } else if old != self.state {
            ctx.invalidate();
        }
        Ok(())
    }

    /// Set the value, clamped. Returns `true` if it changed.
    pub fn set_value(&mut self, ctx: &mut dyn Context, v: f64) -> Result<bool> {
        if self.state.set_value(v) {
            self.value_changed(ctx);
            return Ok(true);
        }
        Ok(false)
    }

    /// Scroll by a wheel delta, one step per unit.
    pub fn scroll_by(&mut self, ctx: &mut dyn Context, delta: f64) -> Result<bool> {
        self.set_value(ctx, self.state.value() + delta * self.state.step_increment())
    }

    fn value_changed(&mut self, ctx: &mut dyn Context) {
        let node = ctx.node_id();
        let value = self.state.value();
        ctx.notify(Notification::ValueChanged { node, value });
        if let Some(parent) = ctx.parent_of(node) {
            ctx.post(
                parent,
                Event::ValueChanged {
                    source: node,
                    orientation: self.orientation,
                    value,
                },
            );
        }
        ctx.invalidate();
    }

    /// Start and length of the trough along the axis, in local coordinates.
    fn track(&self, size: Size, padding: f64) -> (f64, f64) {
        (padding, (self.orientation.main(size) - 2.0 * padding).max(0.0))
    }

    /// The thumb rectangle in local coordinates.
    pub fn thumb_rect(&self, ctx: &dyn ViewContext) -> Rect {
        let theme = ctx.theme();
        let size = ctx.size();
        let pad = theme.scrollbar_padding;
        let (origin, track) = self.track(size, pad);
        let (start, len) = self.state.thumb(track, theme.min_thumb_length);
        let cross = (self.orientation.cross_of(size) - 2.0 * pad).max(0.0);
        self.orientation.rect(origin + start, pad, len, cross)
    }

    fn main(&self, p: Point) -> f64 {
        self.orientation.main_of_point(p)
    }

    fn set_thumb_hovered(&mut self, ctx: &mut dyn Context, hovered: bool) {
        if self.thumb_hovered != hovered {
            self.thumb_hovered = hovered;
            ctx.invalidate();
        }
    }

    fn stop_drag(&mut self, ctx: &mut dyn Context) {
        if self.is_dragging() {
            self.drag = DragState::Idle;
            ctx.invalidate();
        }
    }
}

impl Widget for Scrollbar {
    fn draw(&mut self, p: &mut Painter, ctx: &dyn ViewContext) -> Result<()> {
        let theme = ctx.theme();
        p.fill_rect(ctx.bounds(), theme.scrollbar_background);
        if self.state.can_scroll() {
            let color = if self.thumb_hovered || self.is_dragging() {
                theme.scrollbar_thumb_active
            } else {
                theme.scrollbar_thumb
            };
            p.fill_rect(self.thumb_rect(ctx), color);
        }
        Ok(())
    }

    fn on_event(&mut self, event: &Event, ctx: &mut dyn Context) -> Result<EventOutcome> {
        match event {
            Event::MouseMoved(m) => {
                let over = self.thumb_rect(ctx).contains_point(m.pos);
                self.set_thumb_hovered(ctx, over);
                Ok(EventOutcome::Handle)
            }
            Event::MouseExited => {
                self.set_thumb_hovered(ctx, false);
                Ok(EventOutcome::Ignore)
            }
            Event::ButtonPressed(b) if b.button == MouseButton::Left => {
                if !self.state.can_scroll() {
                    return Ok(EventOutcome::Handle);
                }
                let thumb = self.thumb_rect(ctx);
                if thumb.contains_point(b.pos) {
                    self.drag = DragState::Dragging {
                        grab: self.main(b.pos) - self.main(thumb.tl),
                    };
                    ctx.begin_drag(b.button)?;
                    ctx.invalidate();
                } else if self.main(b.pos) < self.main(thumb.tl) {
                    if self.state.page(-1.0) {
                        self.value_changed(ctx);
                    }
                } else if self.state.page(1.0) {
                    self.value_changed(ctx);
                }
                Ok(EventOutcome::Handle)
            }
            Event::DragMotion(m) => {
                if let DragState::Dragging { grab } = self.drag {
                    let theme = ctx.theme();
                    let (origin, track) = self.track(ctx.size(), theme.scrollbar_padding);
                    let min = theme.min_thumb_length;
                    let start = self.main(m.pos) - grab - origin;
                    let v = self.state.value_at(start, track, min);
                    self.set_value(ctx, v)?;
                }
                Ok(EventOutcome::Handle)
            }
            Event::DragEnded => {
                self.stop_drag(ctx);
                Ok(EventOutcome::Handle)
            }
            Event::ButtonReleased(b) if b.button == MouseButton::Left => {
                self.stop_drag(ctx);
                Ok(EventOutcome::Handle)
            }
            Event::MouseScrolled(w) => {
                let delta = match self.orientation {
                    Orientation::Vertical => w.dy,
                    Orientation::Horizontal if w.dx != 0.0 => w.dx,
                    Orientation::Horizontal => w.dy,
                };
                if delta != 0.0 && self.scroll_by(ctx, delta)? {
                    Ok(EventOutcome::Handle)
                } else {
                    Ok(EventOutcome::Ignore)
                }
            }
            _ => Ok(EventOutcome::Ignore),
        }
    }

    fn preferred_size(&self, wc: Constraint, hc: Constraint, ctx: &dyn ViewContext) -> Size {
        let theme = ctx.theme();
        let thickness = theme.scrollbar_width;
        let length = theme.min_thumb_length + 2.0 * theme.scrollbar_padding;
        match self.orientation {
            Orientation::Horizontal => Size::new(wc.or(length), hc.clamp(thickness)),
            Orientation::Vertical => Size::new(wc.clamp(thickness), hc.or(length)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        TypedId,
        geom::Point,
        testing::Harness,
    };

    /// A 12x100 vertical bar at the window origin, range 0..130 with a page
    /// of 30.
    fn bar() -> Result<(Harness, TypedId<Scrollbar>)> {
        let mut h = Harness::builder().size(12.0, 100.0).build()?;
        let sb = h.add_typed(Scrollbar::vertical())?;
        h.with(sb, |sb, ctx| sb.set_range(ctx, 0.0, 130.0, 30.0, 30.0, 5.0, 0.0))?;
        h.notes.clear();
        Ok((h, sb))
    }

    #[test]
    fn thumb_tracks_value() -> Result<()> {
        let (mut h, sb) = bar()?;
        // Track is 96 long, thumb 96 * 30 / 130.
        let len = 96.0 * 30.0 / 130.0;
        let r = h.with(sb, |sb, ctx| Ok(sb.thumb_rect(ctx)))?;
        assert_eq!(r, Rect::new(2.0, 2.0, 8.0, len));
        h.with(sb, |sb, ctx| sb.set_value(ctx, 100.0))?;
        let r = h.with(sb, |sb, ctx| Ok(sb.thumb_rect(ctx)))?;
        assert!((r.bottom() - 98.0).abs() < 1e-9);
        assert_eq!(h.notes.values(), vec![(sb.id(), 100.0)]);
        Ok(())
    }

    #[test]
    fn drag_state_machine() -> Result<()> {
        let (mut h, sb) = bar()?;
        h.move_to(Point::new(6.0, 5.0))?;
        assert!(h.with(sb, |sb, _| Ok(sb.is_thumb_hovered()))?);
        h.press(Point::new(6.0, 5.0))?;
        assert_eq!(
            h.with(sb, |sb, _| Ok(sb.drag_state()))?,
            DragState::Dragging { grab: 3.0 }
        );
        assert_eq!(h.core().drag_owner(), Some(sb.id()));

        // Pointer leaves the bar entirely; the drag keeps tracking it.
        let travel = 96.0 - 96.0 * 30.0 / 130.0;
        h.move_to(Point::new(300.0, 5.0 + travel / 2.0))?;
        let v = h.with(sb, |sb, _| Ok(sb.value()))?;
        assert!((v - 50.0).abs() < 1e-6);

        h.release(Point::new(300.0, 5.0 + travel / 2.0))?;
        assert_eq!(h.with(sb, |sb, _| Ok(sb.drag_state()))?, DragState::Idle);
        assert_eq!(h.core().drag_owner(), None);
        Ok(())
    }

    #[test]
    fn sensitivity_loss_ends_drag() -> Result<()> {
        let (mut h, sb) = bar()?;
        h.move_to(Point::new(6.0, 5.0))?;
        h.press(Point::new(6.0, 5.0))?;
        assert!(h.with(sb, |sb, _| Ok(sb.is_dragging()))?);
        h.core_mut().set_sensitive(sb, false)?;
        assert!(!h.with(sb, |sb, _| Ok(sb.is_dragging()))?);
        Ok(())
    }

    #[test]
    fn trough_pages_and_wheel_steps() -> Result<()> {
        let (mut h, sb) = bar()?;
        h.click(Point::new(6.0, 90.0))?;
        assert_eq!(h.with(sb, |sb, _| Ok(sb.value()))?, 30.0);
        h.wheel(Point::new(6.0, 90.0), 0.0, 2.0)?;
        assert_eq!(h.with(sb, |sb, _| Ok(sb.value()))?, 40.0);
        h.wheel(Point::new(6.0, 90.0), 0.0, -100.0)?;
        assert_eq!(h.with(sb, |sb, _| Ok(sb.value()))?, 0.0);
        assert_eq!(
            h.notes.values(),
            vec![(sb.id(), 30.0), (sb.id(), 40.0), (sb.id(), 0.0)]
        );
        Ok(())
    }
}
