//! A free-placement container with an optional custom draw routine.

use std::{collections::HashMap, fmt};

use crate::{
    Context, NodeId, Painter, ViewContext, Widget,
    error::{Error, Result},
    geom::{Constraint, Rect, Size},
};

/// Custom drawing for a canvas. Receives the canvas bounds in local
/// coordinates.
pub type DrawFn = Box<dyn FnMut(&mut Painter, Rect) -> Result<()> + Send>;

/// Places children at explicit rectangles and draws custom content beneath
/// them.
#[derive(Default)]
pub struct Canvas {
    /// Where each child sits, relative to the canvas.
    placements: HashMap<NodeId, Rect>,
    /// Custom content drawn before the children.
    on_draw: Option<DrawFn>,
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("placements", &self.placements)
            .field("on_draw", &self.on_draw.is_some())
            .finish()
    }
}

impl Canvas {
    /// An empty canvas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw custom content with `f`.
    pub fn with_draw(mut self, f: impl FnMut(&mut Painter, Rect) -> Result<()> + Send + 'static) -> Self {
        self.on_draw = Some(Box::new(f));
        self
    }

    /// Replace the custom draw routine and redraw.
    pub fn set_draw(&mut self, ctx: &mut dyn Context, f: Option<DrawFn>) {
        self.on_draw = f;
        ctx.invalidate();
    }

    /// The placement of a child, if it has one.
    pub fn placement(&self, child: NodeId) -> Option<Rect> {
        self.placements.get(&child).copied()
    }

    /// Create a child from `widget` at `bounds`.
    pub fn add_child(
        &mut self,
        ctx: &mut dyn Context,
        widget: impl Into<Box<dyn Widget>>,
        bounds: Rect,
    ) -> Result<NodeId> {
        let node = ctx.node_id();
        let child = ctx.add_child_to(node, widget.into())?;
        self.placements.insert(child, bounds);
        ctx.set_child_bounds(child, bounds)?;
        Ok(child)
    }

    /// Attach an existing detached node at `bounds`.
    pub fn place(&mut self, ctx: &mut dyn Context, child: NodeId, bounds: Rect) -> Result<()> {
        let node = ctx.node_id();
        ctx.attach(node, child)?;
        self.placements.insert(child, bounds);
        ctx.set_child_bounds(child, bounds)?;
        Ok(())
    }

    /// Move or resize a child.
    pub fn set_child_bounds(&mut self, ctx: &mut dyn Context, child: NodeId, bounds: Rect) -> Result<()> {
        if !self.placements.contains_key(&child) {
            return Err(Error::Invalid(format!("{child:?} is not placed on this canvas")));
        }
        self.placements.insert(child, bounds);
        ctx.set_child_bounds(child, bounds)?;
        Ok(())
    }

    /// Detach a child. The node stays alive for the caller to reuse or
    /// remove.
    pub fn remove_child(&mut self, ctx: &mut dyn Context, child: NodeId) -> Result<()> {
        if self.placements.remove(&child).is_some() {
            ctx.detach(child)?;
        }
        Ok(())
    }

    /// Redraw the whole canvas.
    pub fn queue_draw(&self, ctx: &mut dyn Context) {
        ctx.invalidate();
    }

    /// Redraw part of the canvas, in local coordinates.
    pub fn queue_draw_area(&self, ctx: &mut dyn Context, rect: Rect) {
        ctx.invalidate_local(rect);
    }
}

impl Widget for Canvas {
    fn draw(&mut self, p: &mut Painter, ctx: &dyn ViewContext) -> Result<()> {
        match self.on_draw.as_mut() {
            Some(f) => f(p, ctx.bounds()),
            None => Ok(()),
        }
    }

    fn layout(&mut self, _size: Size, ctx: &mut dyn Context) -> Result<()> {
        for child in ctx.children() {
            if let Some(bounds) = self.placements.get(&child) {
                ctx.set_child_bounds(child, *bounds)?;
            }
        }
        Ok(())
    }

    fn preferred_size(&self, wc: Constraint, hc: Constraint, _ctx: &dyn ViewContext) -> Size {
        let (w, h) = self
            .placements
            .values()
            .fold((0.0f64, 0.0f64), |(w, h), r| (w.max(r.right()), h.max(r.bottom())));
        Size::new(wc.clamp(w), hc.clamp(h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        TypedId,
        geom::Point,
        style::Color,
        testing::{Harness, Probe},
    };

    fn canvas() -> Result<(Harness, TypedId<Canvas>)> {
        let mut h = Harness::new()?;
        let c = h.add_typed(Canvas::new())?;
        Ok((h, c))
    }

    #[test]
    fn placement_and_extent() -> Result<()> {
        let (mut h, c) = canvas()?;
        let (a, b) = h.with(c, |c, ctx| {
            Ok((
                c.add_child(ctx, Probe::new(), Rect::new(10.0, 10.0, 20.0, 20.0))?,
                c.add_child(ctx, Probe::new(), Rect::new(50.0, 5.0, 10.0, 70.0))?,
            ))
        })?;
        assert_eq!(h.core().bounds(a)?, Rect::new(10.0, 10.0, 20.0, 20.0));
        assert_eq!(h.core().hit_test(Point::new(55.0, 60.0)), Some(b));
        assert_eq!(
            h.core()
                .preferred_size(c, Constraint::Unconstrained, Constraint::Unconstrained)?,
            Size::new(60.0, 75.0)
        );

        h.with(c, |c, ctx| c.set_child_bounds(ctx, a, Rect::new(0.0, 0.0, 5.0, 5.0)))?;
        assert_eq!(h.core().bounds(a)?, Rect::new(0.0, 0.0, 5.0, 5.0));

        h.with(c, |c, ctx| c.remove_child(ctx, b))?;
        assert!(h.core().contains(b));
        assert_eq!(h.core().node(b).and_then(|n| n.parent()), None);
        assert_eq!(h.core().hit_test(Point::new(55.0, 60.0)), Some(c.id()));
        Ok(())
    }

    #[test]
    fn unknown_child_is_rejected() -> Result<()> {
        let (mut h, c) = canvas()?;
        let stray = h.core_mut().add(Probe::new());
        let r = h.with(c, |c, ctx| c.set_child_bounds(ctx, stray, Rect::zero()));
        assert!(matches!(r, Err(Error::Invalid(_))));
        Ok(())
    }

    #[test]
    fn queue_draw_area_limits_damage() -> Result<()> {
        let mut h = Harness::new()?;
        let holder = h.add_typed(Canvas::new())?;
        let c = h.with(holder, |hc, ctx| {
            hc.add_child(ctx, Canvas::new(), Rect::new(40.0, 40.0, 100.0, 100.0))
        })?;
        h.redraw()?;
        h.core_mut()
            .with_widget::<Canvas, _>(c, |c, ctx| {
                c.queue_draw_area(ctx, Rect::new(5.0, 5.0, 10.0, 10.0));
                Ok(())
            })?;
        assert_eq!(h.core().damage().rect(), Some(Rect::new(45.0, 45.0, 10.0, 10.0)));
        Ok(())
    }

    #[test]
    fn custom_draw_runs_before_children() -> Result<()> {
        let mut h = Harness::new()?;
        let canvas = Canvas::new().with_draw(|p, bounds| {
            p.fill_rect(Rect::new(0.0, 0.0, bounds.w, 10.0), Color::rgb(1.0, 0.0, 0.0));
            Ok(())
        });
        let c = h.add_typed(canvas)?;
        h.with(c, |c, ctx| {
            c.add_child(
                ctx,
                Probe::new().filled(Color::rgb(0.0, 0.0, 1.0)),
                Rect::new(0.0, 0.0, 10.0, 10.0),
            )
        })?;
        h.redraw()?;
        let fills = h.draws.fills();
        let red = fills
            .iter()
            .position(|(_, c)| *c == Color::rgb(1.0, 0.0, 0.0));
        let blue = fills
            .iter()
            .position(|(_, c)| *c == Color::rgb(0.0, 0.0, 1.0));
        assert!(red.is_some() && blue.is_some() && red < blue);
        assert_eq!(fills[red.unwrap_or_default()].0, Rect::new(0.0, 0.0, 200.0, 10.0));
        Ok(())
    }
}
