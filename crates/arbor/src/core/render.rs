//! The painter handed to widgets, and the per-window redraw pass.

use tracing::{trace, warn};

use super::{
    backend::{DrawBackend, image::ImageInfo, text::FontDescription},
    context::CoreViewContext,
    id::NodeId,
    style::{Color, Source},
    world::Core,
};
use crate::{
    error::Result,
    geom::{Point, Rect},
};

/// Painter state saved and restored in pairs.
#[derive(Debug, Clone, Copy)]
struct PaintState {
    /// Translation from local to window coordinates.
    offset: Point,
    /// Clip region in window coordinates.
    clip: Rect,
    /// Accumulated opacity.
    alpha: f64,
}

/// A drawing context scoped to one frame. Tracks translation, clip and
/// opacity alongside the backend so widgets can cull their own drawing.
pub struct Painter<'a> {
    /// Drawing collaborator.
    backend: &'a mut dyn DrawBackend,
    /// Current state.
    state: PaintState,
    /// Saved states.
    stack: Vec<PaintState>,
}

impl<'a> Painter<'a> {
    /// A painter over `backend`, clipped to `clip` in window coordinates.
    pub fn new(backend: &'a mut dyn DrawBackend, clip: Rect) -> Self {
        Self {
            backend,
            state: PaintState {
                offset: Point::zero(),
                clip,
                alpha: 1.0,
            },
            stack: Vec::new(),
        }
    }

    /// Push the current state.
    pub fn save(&mut self) {
        self.backend.save();
        self.stack.push(self.state);
    }

    /// Pop the most recently saved state. Unbalanced calls are ignored.
    pub fn restore(&mut self) {
        if let Some(s) = self.stack.pop() {
            self.state = s;
            self.backend.restore();
        }
    }

    /// Run `f` between a save and a restore. The restore happens on every
    /// exit path, including early returns and errors inside `f`.
    pub fn scoped<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.save();
        let mut g = scopeguard::guard(self, |p| p.restore());
        f(&mut g)
    }

    /// Number of unrestored saves.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Shift the origin.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.state.offset = self.state.offset.offset(dx, dy);
        self.backend.translate(dx, dy);
    }

    /// Intersect the clip with a local rectangle. Returns `false` if nothing
    /// remains visible.
    pub fn clip(&mut self, r: Rect) -> bool {
        let abs = r.translate(self.state.offset);
        match self.state.clip.intersect(&abs) {
            Some(c) => {
                self.state.clip = c;
                self.backend.clip(r);
                true
            }
            None => {
                self.state.clip = Rect::from_parts(self.state.clip.tl, Default::default());
                self.backend.clip(Rect::from_parts(r.tl, Default::default()));
                false
            }
        }
    }

    /// Current translation from local to window coordinates.
    pub fn offset(&self) -> Point {
        self.state.offset
    }

    /// Current clip in local coordinates.
    pub fn clip_rect(&self) -> Rect {
        self.state.clip.translate(-self.state.offset)
    }

    /// Does a local rectangle overlap the clip?
    pub fn is_visible(&self, r: Rect) -> bool {
        self.state.clip.intersects(&r.translate(self.state.offset))
    }

    /// Multiply the opacity of everything drawn from here on.
    pub fn multiply_alpha(&mut self, factor: f64) {
        self.state.alpha *= factor.clamp(0.0, 1.0);
    }

    /// Current opacity.
    pub fn alpha(&self) -> f64 {
        self.state.alpha
    }

    /// Set the paint source, adjusted for the current opacity.
    pub fn set_source(&mut self, source: impl Into<Source>) {
        let s = source.into().with_alpha(self.state.alpha);
        self.backend.set_source(&s);
    }

    /// Set the stroke width.
    pub fn set_line_width(&mut self, width: f64) {
        self.backend.set_line_width(width);
    }

    /// Set the dash pattern.
    pub fn set_dash(&mut self, dashes: &[f64], offset: f64) {
        self.backend.set_dash(dashes, offset);
    }

    /// Start a sub-path.
    pub fn move_to(&mut self, p: Point) {
        self.backend.move_to(p);
    }

    /// Add a line segment.
    pub fn line_to(&mut self, p: Point) {
        self.backend.line_to(p);
    }

    /// Add a Bézier segment.
    pub fn curve_to(&mut self, c1: Point, c2: Point, end: Point) {
        self.backend.curve_to(c1, c2, end);
    }

    /// Add a rectangle sub-path.
    pub fn rectangle(&mut self, r: Rect) {
        self.backend.rectangle(r);
    }

    /// Add an arc.
    pub fn arc(&mut self, center: Point, radius: f64, start: f64, end: f64) {
        self.backend.arc(center, radius, start, end);
    }

    /// Close the sub-path.
    pub fn close_path(&mut self) {
        self.backend.close_path();
    }

    /// Fill the path.
    pub fn fill(&mut self) {
        self.backend.fill();
    }

    /// Stroke the path.
    pub fn stroke(&mut self) {
        self.backend.stroke();
    }

    /// Paint the whole clip.
    pub fn paint(&mut self) {
        self.backend.paint();
    }

    /// Fill a rectangle. Skipped entirely when outside the clip.
    pub fn fill_rect(&mut self, r: Rect, source: impl Into<Source>) {
        if r.is_empty() || !self.is_visible(r) {
            return;
        }
        self.set_source(source);
        self.backend.rectangle(r);
        self.backend.fill();
    }

    /// Outline a rectangle with the stroke centred inside its edges.
    pub fn stroke_rect(&mut self, r: Rect, color: Color, width: f64) {
        if r.is_empty() || !self.is_visible(r) {
            return;
        }
        let h = width / 2.0;
        self.set_source(color);
        self.backend.set_line_width(width);
        self.backend
            .rectangle(Rect::new(r.tl.x + h, r.tl.y + h, r.w - width, r.h - width));
        self.backend.stroke();
    }

    /// Stroke a straight line.
    pub fn line(&mut self, a: Point, b: Point, color: Color, width: f64) {
        self.set_source(color);
        self.backend.set_line_width(width);
        self.backend.move_to(a);
        self.backend.line_to(b);
        self.backend.stroke();
    }

    /// Draw text with its top-left corner at `at`.
    pub fn text(&mut self, font: &FontDescription, text: &str, at: Point, color: Color) {
        if text.is_empty() {
            return;
        }
        self.set_source(color);
        self.backend.show_text(font, text, at);
    }

    /// Blit an image scaled into `dest`.
    pub fn image(&mut self, image: &ImageInfo, dest: Rect) {
        if dest.is_empty() || !self.is_visible(dest) {
            return;
        }
        self.backend.draw_image(image, dest);
    }
}

impl Core {
    /// Draw everything inside the damaged region and clear it. Returns the
    /// region drawn, or `None` if the window was clean.
    ///
    /// The background is cleared unless an opaque root covers the region.
    /// Nodes whose visible area misses the region are skipped along with
    /// their subtrees. A widget whose draw fails is logged and its subtree
    /// skipped; the rest of the frame still draws.
    pub fn redraw(&mut self, backend: &mut dyn DrawBackend) -> Result<Option<Rect>> {
        self.flush_posted()?;
        let Some(rect) = self.damage.rect() else {
            return Ok(None);
        };
        let mut drawn = 0;
        {
            let mut p = Painter::new(backend, self.damage.bounds());
            let root = self.root;
            p.scoped(|p| {
                p.clip(rect);
                if !self.opaque_covers(rect) {
                    p.fill_rect(rect, self.theme.window_background);
                }
                self.draw_node(p, root, &mut drawn);
            });
        }
        self.damage.clear();
        trace!(?rect, drawn, "redraw");
        Ok(Some(rect))
    }

    /// Does some opaque node, drawn at full opacity, cover `rect` completely?
    /// A child's visible area never exceeds its parent's, so the walk stops
    /// at the first node that does not contain `rect`.
    fn opaque_covers(&self, rect: Rect) -> bool {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if node.opacity < 1.0
                || !self
                    .visible_bounds(id)
                    .is_some_and(|b| b.contains_rect(&rect))
            {
                continue;
            }
            if node.is_opaque() {
                return true;
            }
            stack.extend(self.children_of(id));
        }
        false
    }

    /// Draw a node and its subtree. The painter is translated to the parent's
    /// content origin.
    fn draw_node(&mut self, p: &mut Painter, node_id: NodeId, drawn: &mut usize) {
        let Some(node) = self.nodes.get(node_id) else {
            return;
        };
        let bounds = node.bounds();
        if !node.visible || bounds.is_empty() || !p.is_visible(bounds) {
            return;
        }
        let local = bounds.size().rect();
        let (background, opacity, scroll) = (node.background, node.opacity, node.scroll);

        p.scoped(|p| {
            p.translate(bounds.tl.x, bounds.tl.y);
            if !p.clip(local) {
                return;
            }
            p.multiply_alpha(opacity);
            if let Some(bg) = background {
                p.fill_rect(local, bg);
            }
            if !self.draw_widget(p, node_id) {
                return;
            }
            *drawn += 1;
            p.translate(-scroll.x, -scroll.y);
            for child in self.children_of(node_id) {
                self.draw_node(p, child, drawn);
            }
        });
    }

    /// Run a widget's draw step. Returns `false` if it failed.
    fn draw_widget(&mut self, p: &mut Painter, node_id: NodeId) -> bool {
        let Some(mut widget) = self.nodes.get_mut(node_id).and_then(|n| n.widget.take()) else {
            trace!(node = ?node_id, "draw skipped, widget busy");
            return true;
        };
        let result = p.scoped(|p| widget.draw(p, &CoreViewContext::new(self, node_id)));
        let name = widget.name();
        if let Some(node) = self.nodes.get_mut(node_id) {
            node.widget = Some(widget);
        }
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(node = ?node_id, widget = %name, error = %e, "widget draw failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Error,
        testing::{DrawOp, Probe, RecordingBackend},
    };

    fn window(w: f64, h: f64) -> Result<Core> {
        let mut core = Core::new();
        let r = Rect::new(0.0, 0.0, w, h);
        core.set_window_rect(r, r)?;
        Ok(core)
    }

    #[test]
    fn scoped_restores_on_early_exit() {
        let (log, mut backend) = RecordingBackend::create();
        let mut p = Painter::new(&mut backend, Rect::new(0.0, 0.0, 10.0, 10.0));
        let r: Result<()> = p.scoped(|p| {
            p.translate(5.0, 5.0);
            Err(Error::Draw("boom".into()))
        });
        assert!(r.is_err());
        assert_eq!(p.depth(), 0);
        assert_eq!(p.offset(), Point::zero());
        assert_eq!(log.depth(), 0);
    }

    #[test]
    fn clip_culls() {
        let (_, mut backend) = RecordingBackend::create();
        let mut p = Painter::new(&mut backend, Rect::new(0.0, 0.0, 100.0, 100.0));
        p.translate(50.0, 50.0);
        assert!(p.clip(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert_eq!(p.clip_rect(), Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(!p.is_visible(Rect::new(20.0, 0.0, 5.0, 5.0)));
        assert!(!p.clip(Rect::new(20.0, 20.0, 5.0, 5.0)));
    }

    #[test]
    fn redraw_clears_damage() -> Result<()> {
        let mut core = window(100.0, 100.0)?;
        let (p, log) = Probe::new().logged();
        core.add_child(core.root_id(), p)?;
        let (_, mut backend) = RecordingBackend::create();
        assert_eq!(
            core.redraw(&mut backend)?,
            Some(Rect::new(0.0, 0.0, 100.0, 100.0))
        );
        assert_eq!(log.draws(), 1);
        assert!(!core.damage().is_dirty());
        assert_eq!(core.redraw(&mut backend)?, None);
        assert_eq!(log.draws(), 1);
        Ok(())
    }

    #[test]
    fn opaque_root_skips_clear() -> Result<()> {
        let mut core = window(100.0, 100.0)?;
        let (ops, mut backend) = RecordingBackend::create();
        core.redraw(&mut backend)?;
        assert_eq!(ops.fills().len(), 1);

        ops.clear();
        core.set_background(core.root_id(), Some(Color::grey(0.5)))?;
        core.redraw(&mut backend)?;
        assert_eq!(ops.fills(), vec![(Rect::new(0.0, 0.0, 100.0, 100.0), Color::grey(0.5))]);
        Ok(())
    }

    #[test]
    fn opaque_descendant_skips_clear() -> Result<()> {
        let mut core = window(100.0, 100.0)?;
        let host = core.add_child(core.root_id(), Probe::new())?;
        let panel = core.add_child(host, Probe::new())?;
        core.set_bounds(host, Rect::new(10.0, 10.0, 80.0, 80.0))?;
        core.set_bounds(panel, Rect::new(10.0, 10.0, 40.0, 40.0))?;
        core.set_background(panel, Some(Color::BLACK))?;
        let (ops, mut backend) = RecordingBackend::create();
        core.redraw(&mut backend)?;

        ops.clear();
        core.invalidate_rect(Rect::new(30.0, 30.0, 10.0, 10.0));
        core.redraw(&mut backend)?;
        assert_eq!(ops.fills(), vec![(Rect::new(20.0, 20.0, 40.0, 40.0), Color::BLACK)]);

        // Damage reaching past the panel still clears the window.
        ops.clear();
        core.invalidate_rect(Rect::new(65.0, 30.0, 10.0, 10.0));
        core.redraw(&mut backend)?;
        assert_eq!(ops.fills()[0].1, core.theme().window_background);

        // A translucent ancestor lets the window show through.
        core.set_opacity(host, 0.5)?;
        core.redraw(&mut backend)?;
        ops.clear();
        core.invalidate_rect(Rect::new(30.0, 30.0, 10.0, 10.0));
        core.redraw(&mut backend)?;
        assert_eq!(ops.fills().len(), 2);
        Ok(())
    }

    #[test]
    fn draw_failure_is_contained() -> Result<()> {
        let mut core = window(100.0, 100.0)?;
        let host = core.add_child(core.root_id(), Probe::new())?;
        let (bad, bad_log) = Probe::new().failing().logged();
        let bad = core.add_child(host, bad)?;
        let (child, child_log) = Probe::new().logged();
        let child = core.add_child(bad, child)?;
        let (sibling, sibling_log) = Probe::new().logged();
        let sibling = core.add_child(host, sibling)?;
        core.set_bounds(bad, Rect::new(0.0, 0.0, 50.0, 50.0))?;
        core.set_bounds(sibling, Rect::new(50.0, 0.0, 50.0, 50.0))?;
        core.set_bounds(child, Rect::new(0.0, 0.0, 10.0, 10.0))?;

        let (ops, mut backend) = RecordingBackend::create();
        assert!(core.redraw(&mut backend)?.is_some());
        assert_eq!(bad_log.draws(), 1);
        assert_eq!(child_log.draws(), 0);
        assert_eq!(sibling_log.draws(), 1);
        assert_eq!(ops.depth(), 0);
        Ok(())
    }

    #[test]
    fn opacity_scales_sources() -> Result<()> {
        let mut core = window(100.0, 100.0)?;
        let a = core.add_child(core.root_id(), Probe::new())?;
        core.set_background(a, Some(Color::BLACK))?;
        core.set_opacity(a, 0.5)?;
        let (ops, mut backend) = RecordingBackend::create();
        core.redraw(&mut backend)?;
        assert!(
            ops.ops()
                .iter()
                .any(|op| matches!(op, DrawOp::Source(Source::Solid(c)) if c.a == 0.5))
        );
        Ok(())
    }
}
