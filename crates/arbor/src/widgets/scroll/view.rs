//! A scrolled container: a clipping viewport around one content node, plus a
//! vertical and a horizontal [`Scrollbar`].
//!
//! Both bars use the same normalised range. The page size is
//! `100 * viewport / content` capped at 100, and the value runs over
//! `0..=100` whenever the content is longer than the viewport. A value `v`
//! maps to a content offset of `v / 100 * (content - viewport)`.

use super::scrollbar::Scrollbar;
use crate::{
    Context, EventOutcome, NodeId, Painter, TypedId, ViewContext, Widget,
    error::{Error, Result},
    event::Event,
    geom::{Constraint, Insets, Orientation, Point, Rect, Size},
};

/// When a scroll view shows a scrollbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollPolicy {
    /// Always shown.
    Always,
    /// Shown when the content is longer than the viewport.
    #[default]
    Automatic,
    /// Never shown. The content is constrained to the viewport on this axis.
    Never,
}

impl ScrollPolicy {
    fn shows(self, content: f64, viewport: f64) -> bool {
        match self {
            Self::Always => true,
            Self::Automatic => content > viewport,
            Self::Never => false,
        }
    }
}

/// The clipping node between a scroll view and its content. Its viewport
/// offset shifts the content during drawing and hit-testing.
struct Viewport;

impl Widget for Viewport {}

/// Normalised page size for one axis.
fn page_size(content: f64, viewport: f64) -> f64 {
    if content <= 0.0 {
        100.0
    } else {
        (100.0 * viewport / content).min(100.0)
    }
}

/// A scrolled container.
pub struct ScrollView {
    /// Clipping node holding the content.
    viewport: Option<NodeId>,
    /// Vertical bar.
    vbar: Option<TypedId<Scrollbar>>,
    /// Horizontal bar.
    hbar: Option<TypedId<Scrollbar>>,
    /// The scrolled node.
    content: Option<NodeId>,
    /// Content widget waiting for the view to mount.
    pending: Option<Box<dyn Widget>>,
    /// Horizontal bar policy.
    hpolicy: ScrollPolicy,
    /// Vertical bar policy.
    vpolicy: ScrollPolicy,
    /// Draw a one-unit frame around the view.
    border: bool,
    /// Content size set by the application, overriding the measured one.
    content_size: Option<Size>,
    /// Content size used by the last layout.
    extent: Size,
    /// Viewport size from the last layout.
    viewport_size: Size,
    /// Horizontal bar value.
    hvalue: f64,
    /// Vertical bar value.
    vvalue: f64,
}

impl Default for ScrollView {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollView {
    /// An empty scroll view with automatic policies.
    pub fn new() -> Self {
        Self {
            viewport: None,
            vbar: None,
            hbar: None,
            content: None,
            pending: None,
            hpolicy: ScrollPolicy::Automatic,
            vpolicy: ScrollPolicy::Automatic,
            border: false,
            content_size: None,
            extent: Size::zero(),
            viewport_size: Size::zero(),
            hvalue: 0.0,
            vvalue: 0.0,
        }
    }

    /// Use `widget` as the content once the view is mounted.
    pub fn with_content(mut self, widget: impl Into<Box<dyn Widget>>) -> Self {
        self.pending = Some(widget.into());
        self
    }

    /// Set both bar policies.
    pub fn with_policy(mut self, horizontal: ScrollPolicy, vertical: ScrollPolicy) -> Self {
        self.hpolicy = horizontal;
        self.vpolicy = vertical;
        self
    }

    /// Draw a frame around the view.
    pub fn with_border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    /// The viewport node, once mounted.
    pub fn viewport(&self) -> Option<NodeId> {
        self.viewport
    }

    /// The content node, if any.
    pub fn content(&self) -> Option<NodeId> {
        self.content
    }

    /// The vertical bar, once mounted.
    pub fn vbar(&self) -> Option<TypedId<Scrollbar>> {
        self.vbar
    }

    /// The horizontal bar, once mounted.
    pub fn hbar(&self) -> Option<TypedId<Scrollbar>> {
        self.hbar
    }

    /// Horizontal and vertical policies.
    pub fn policy(&self) -> (ScrollPolicy, ScrollPolicy) {
        (self.hpolicy, self.vpolicy)
    }

    /// The content size used by the last layout.
    pub fn content_size(&self) -> Size {
        self.extent
    }

    /// The viewport size from the last layout.
    pub fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    /// The part of the content currently shown, in content coordinates.
    pub fn visible_rect(&self) -> Rect {
        Rect::from_parts(self.offset(), self.viewport_size)
    }

    /// Replace the content with a detached node. The previous content is
    /// detached and left to the caller.
    pub fn set_content(&mut self, ctx: &mut dyn Context, node: NodeId) -> Result<()> {
        let viewport = self
            .viewport
            .ok_or_else(|| Error::Invalid("scroll view is not mounted".into()))?;
        if let Some(old) = self.content.take() {
            ctx.detach(old)?;
        }
        ctx.attach(viewport, node)?;
        self.content = Some(node);
        self.hvalue = 0.0;
        self.vvalue = 0.0;
        ctx.relayout()
    }

    /// Override the measured content size, or return to measuring with
    /// `None`.
    pub fn set_content_size(&mut self, ctx: &mut dyn Context, size: Option<Size>) -> Result<()> {
        self.content_size = size;
        ctx.relayout()
    }

    /// Change the bar policies.
    pub fn set_policy(
        &mut self,
        ctx: &mut dyn Context,
        horizontal: ScrollPolicy,
        vertical: ScrollPolicy,
    ) -> Result<()> {
        self.hpolicy = horizontal;
        self.vpolicy = vertical;
        ctx.relayout()
    }

    /// Show or hide the frame.
    pub fn set_border(&mut self, ctx: &mut dyn Context, border: bool) -> Result<()> {
        if self.border != border {
            self.border = border;
            ctx.invalidate();
            ctx.relayout()?;
        }
        Ok(())
    }

    /// Scroll so that the content point `offset` is at the viewport's top
    /// left, as far as the range allows.
    pub fn scroll_to(&mut self, ctx: &mut dyn Context, offset: Point) -> Result<()> {
        let span = self.span();
        if let Some(bar) = self.hbar
            && span.w > 0.0
        {
            let v = 100.0 * offset.x / span.w;
            self.hvalue = ctx.with_typed(bar, |sb, ctx| {
                sb.set_value(ctx, v)?;
                Ok(sb.value())
            })?;
        }
        if let Some(bar) = self.vbar
            && span.h > 0.0
        {
            let v = 100.0 * offset.y / span.h;
            self.vvalue = ctx.with_typed(bar, |sb, ctx| {
                sb.set_value(ctx, v)?;
                Ok(sb.value())
            })?;
        }
        self.apply_offset(ctx)
    }

    /// How far the content overhangs the viewport on each axis.
    fn span(&self) -> Size {
        self.extent
            .shrink(self.viewport_size.w, self.viewport_size.h)
    }

    fn offset(&self) -> Point {
        let span = self.span();
        Point::new(self.hvalue / 100.0 * span.w, self.vvalue / 100.0 * span.h)
    }

    fn apply_offset(&self, ctx: &mut dyn Context) -> Result<()> {
        match self.viewport {
            Some(viewport) => ctx.set_viewport_offset(viewport, self.offset()),
            None => Ok(()),
        }
    }

    fn frame(&self) -> Insets {
        Insets::uniform(if self.border { 1.0 } else { 0.0 })
    }

    /// The content size for a given viewport: the application's size or the
    /// content's preference, never smaller than the viewport.
    fn measure_content(&self, ctx: &dyn ViewContext, viewport: Size) -> Size {
        let preferred = match (self.content_size, self.content) {
            (Some(size), _) => size,
            (None, Some(content)) => {
                let wc = match self.hpolicy {
                    ScrollPolicy::Never => Constraint::bounded(viewport.w),
                    _ => Constraint::Unconstrained,
                };
                let hc = match self.vpolicy {
                    ScrollPolicy::Never => Constraint::bounded(viewport.h),
                    _ => Constraint::Unconstrained,
                };
                ctx.preferred_size_of(content, wc, hc)
            }
            (None, None) => Size::zero(),
        };
        let mut size = preferred.max(viewport);
        if self.hpolicy == ScrollPolicy::Never {
            size.w = viewport.w;
        }
        if self.vpolicy == ScrollPolicy::Never {
            size.h = viewport.h;
        }
        size
    }

    /// Push a new range into a bar, keeping its value, and return the
    /// resulting value.
    fn sync_bar(
        ctx: &mut dyn Context,
        bar: TypedId<Scrollbar>,
        content: f64,
        viewport: f64,
        value: f64,
    ) -> Result<f64> {
        let page = page_size(content, viewport);
        let upper = if content > viewport { page + 100.0 } else { page };
        let step = (page / 10.0).max(f64::EPSILON);
        ctx.with_typed(bar, |sb, ctx| {
            sb.set_range(ctx, 0.0, upper, page, page, step, value)?;
            Ok(sb.value())
        })
    }
}

impl Widget for ScrollView {
    fn on_mount(&mut self, ctx: &mut dyn Context) -> Result<()> {
        let node = ctx.node_id();
        let viewport = ctx.add_child_to(node, Box::new(Viewport))?;
        self.viewport = Some(viewport);
        self.vbar = Some(ctx.add_child(Scrollbar::vertical())?);
        self.hbar = Some(ctx.add_child(Scrollbar::horizontal())?);
        if let Some(widget) = self.pending.take() {
            self.content = Some(ctx.add_child_to(viewport, widget)?);
        }
        Ok(())
    }

    fn layout(&mut self, size: Size, ctx: &mut dyn Context) -> Result<()> {
        let (Some(viewport), Some(vbar), Some(hbar)) = (self.viewport, self.vbar, self.hbar) else {
            return Ok(());
        };
        let inner = size.rect().inset(self.frame());
        let thickness = ctx.theme().scrollbar_width;

        // Showing one bar shrinks the viewport and may make the other one
        // necessary, so settle visibility in two rounds.
        let mut show_v = self.vpolicy == ScrollPolicy::Always;
        let mut show_h = self.hpolicy == ScrollPolicy::Always;
        for _ in 0..2 {
            let vp = inner.size().shrink(
                if show_v { thickness } else { 0.0 },
                if show_h { thickness } else { 0.0 },
            );
            let content = self.measure_content(ctx, vp);
            show_v = self.vpolicy.shows(content.h, vp.h);
            show_h = self.hpolicy.shows(content.w, vp.w);
        }
        let vp = inner.size().shrink(
            if show_v { thickness } else { 0.0 },
            if show_h { thickness } else { 0.0 },
        );
        let content = self.measure_content(ctx, vp);
        self.viewport_size = vp;
        self.extent = content;

        ctx.set_child_bounds(viewport, Rect::from_parts(inner.tl, vp))?;
        ctx.set_child_bounds(
            vbar.id(),
            Rect::new(inner.tl.x + vp.w, inner.tl.y, thickness, vp.h),
        )?;
        ctx.set_child_bounds(
            hbar.id(),
            Rect::new(inner.tl.x, inner.tl.y + vp.h, vp.w, thickness),
        )?;
        ctx.set_visible_of(vbar.id(), show_v)?;
        ctx.set_visible_of(hbar.id(), show_h)?;
        if let Some(node) = self.content {
            ctx.set_child_bounds(node, content.rect())?;
        }

        self.vvalue = Self::sync_bar(ctx, vbar, content.h, vp.h, self.vvalue)?;
        self.hvalue = Self::sync_bar(ctx, hbar, content.w, vp.w, self.hvalue)?;
        self.apply_offset(ctx)
    }

    fn on_event(&mut self, event: &Event, ctx: &mut dyn Context) -> Result<EventOutcome> {
        match event {
            Event::ValueChanged {
                source,
                orientation,
                value,
            } => {
                let ours = match orientation {
                    Orientation::Vertical => self.vbar.map(|b| b.id()),
                    Orientation::Horizontal => self.hbar.map(|b| b.id()),
                };
                if ours != Some(*source) {
                    return Ok(EventOutcome::Ignore);
                }
                match orientation {
                    Orientation::Vertical => self.vvalue = *value,
                    Orientation::Horizontal => self.hvalue = *value,
                }
                self.apply_offset(ctx)?;
                Ok(EventOutcome::Handle)
            }
            Event::MouseScrolled(w) => {
                let mut handled = false;
                if let Some(bar) = self.vbar
                    && w.dy != 0.0
                    && ctx.is_visible(bar.id())
                {
                    let (changed, v) = ctx.with_typed(bar, |sb, ctx| {
                        Ok((sb.scroll_by(ctx, w.dy)?, sb.value()))
                    })?;
                    self.vvalue = v;
                    handled |= changed;
                }
                if let Some(bar) = self.hbar
                    && w.dx != 0.0
                    && ctx.is_visible(bar.id())
                {
                    let (changed, v) = ctx.with_typed(bar, |sb, ctx| {
                        Ok((sb.scroll_by(ctx, w.dx)?, sb.value()))
                    })?;
                    self.hvalue = v;
                    handled |= changed;
                }
                if handled {
                    self.apply_offset(ctx)?;
                    Ok(EventOutcome::Handle)
                } else {
                    Ok(EventOutcome::Ignore)
                }
            }
            _ => Ok(EventOutcome::Ignore),
        }
    }

    fn draw(&mut self, p: &mut Painter, ctx: &dyn ViewContext) -> Result<()> {
        if self.border {
            p.stroke_rect(ctx.bounds(), ctx.theme().notebook_border, 1.0);
        }
        Ok(())
    }

    fn preferred_size(&self, wc: Constraint, hc: Constraint, ctx: &dyn ViewContext) -> Size {
        let frame = self.frame();
        let min = 2.0 * ctx.theme().scrollbar_width;
        Size::new(
            wc.clamp(min + frame.horizontal()),
            hc.clamp(min + frame.vertical()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Harness, Probe};

    /// A 100x300 view over a 50x1000 probe, at the window origin.
    fn tall() -> Result<(Harness, TypedId<ScrollView>)> {
        let mut h = Harness::builder().size(100.0, 300.0).build()?;
        let content = Probe::new().with_preferred(Size::new(50.0, 1000.0));
        let sv = h.add_typed(ScrollView::new().with_content(content))?;
        h.notes.clear();
        Ok((h, sv))
    }

    #[test]
    fn bars_follow_policy() -> Result<()> {
        let (mut h, sv) = tall()?;
        let (vbar, hbar) = h.with(sv, |sv, _| Ok((sv.vbar(), sv.hbar())))?;
        let (vbar, hbar) = (
            vbar.ok_or(Error::Internal("no vbar".into()))?,
            hbar.ok_or(Error::Internal("no hbar".into()))?,
        );
        assert!(h.core().is_shown(vbar));
        assert!(!h.core().is_shown(hbar));
        assert_eq!(h.with(sv, |sv, _| Ok(sv.viewport_size()))?, Size::new(88.0, 300.0));
        assert_eq!(h.with(sv, |sv, _| Ok(sv.content_size()))?, Size::new(88.0, 1000.0));

        let state = h.with(vbar, |sb, _| Ok(*sb.state()))?;
        assert!((state.page_size() - 30.0).abs() < 1e-9);
        assert!((state.upper() - 130.0).abs() < 1e-9);

        h.with(sv, |sv, ctx| {
            sv.set_policy(ctx, ScrollPolicy::Always, ScrollPolicy::Never)
        })?;
        assert!(!h.core().is_shown(vbar));
        assert!(h.core().is_shown(hbar));
        assert_eq!(h.with(sv, |sv, _| Ok(sv.viewport_size()))?, Size::new(100.0, 288.0));
        Ok(())
    }

    #[test]
    fn wheel_scrolls_content() -> Result<()> {
        let (mut h, sv) = tall()?;
        h.wheel(Point::new(40.0, 40.0), 0.0, 10.0)?;
        let visible = h.with(sv, |sv, _| Ok(sv.visible_rect()))?;
        // Ten steps of a tenth of a 30-unit page.
        assert!((visible.tl.y - 0.3 * 700.0).abs() < 1e-6);
        let viewport = h
            .with(sv, |sv, _| Ok(sv.viewport()))?
            .ok_or(Error::Internal("no viewport".into()))?;
        assert_eq!(h.core().node(viewport).map(|n| n.viewport_offset()), Some(visible.tl));
        Ok(())
    }

    #[test]
    fn hit_test_follows_offset() -> Result<()> {
        let (mut h, sv) = tall()?;
        let content = h
            .with(sv, |sv, _| Ok(sv.content()))?
            .ok_or(Error::Internal("no content".into()))?;
        h.with(sv, |sv, ctx| sv.scroll_to(ctx, Point::new(0.0, 350.0)))?;
        assert_eq!(h.with(sv, |sv, _| Ok(sv.visible_rect().tl.y))?, 350.0);
        assert_eq!(h.core().hit_test(Point::new(10.0, 10.0)), Some(content));
        assert_eq!(
            h.core().window_bounds(content)?,
            Rect::new(0.0, -350.0, 88.0, 1000.0)
        );
        Ok(())
    }

    #[test]
    fn resize_preserves_value() -> Result<()> {
        let (mut h, sv) = tall()?;
        h.with(sv, |sv, ctx| sv.scroll_to(ctx, Point::new(0.0, 350.0)))?;
        h.resize(100.0, 500.0)?;
        // Value 50 survives; the overhang is now 500.
        assert_eq!(h.with(sv, |sv, _| Ok(sv.visible_rect()))?, Rect::new(0.0, 250.0, 88.0, 500.0));
        Ok(())
    }

    #[test]
    fn short_content_needs_no_bars() -> Result<()> {
        let mut h = Harness::builder().size(100.0, 100.0).build()?;
        let content = Probe::new().with_preferred(Size::new(20.0, 20.0));
        let sv = h.add_typed(ScrollView::new().with_content(content).with_border(true))?;
        let (vbar, hbar) = h.with(sv, |sv, _| Ok((sv.vbar(), sv.hbar())))?;
        assert!(!vbar.is_some_and(|b| h.core().is_shown(b)));
        assert!(!hbar.is_some_and(|b| h.core().is_shown(b)));
        assert_eq!(h.with(sv, |sv, _| Ok(sv.viewport_size()))?, Size::new(98.0, 98.0));
        h.wheel(Point::new(50.0, 50.0), 0.0, 3.0)?;
        assert_eq!(h.with(sv, |sv, _| Ok(sv.visible_rect().tl))?, Point::zero());
        Ok(())
    }
}
