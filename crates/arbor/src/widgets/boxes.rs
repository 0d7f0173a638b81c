//! A container that stacks its children along one axis.

use std::collections::HashMap;

use crate::{
    Context, NodeId, ViewContext, Widget,
    error::Result,
    geom::{Constraint, Orientation, Size},
};

/// How a child is packed into a [`BoxLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packing {
    /// Take a share of the space left over after preferred sizes.
    pub expand: bool,
    /// Stretch across the cross axis. When false the child keeps its
    /// preferred cross size and is centred.
    pub fill: bool,
    /// Pack from the end of the main axis rather than the start.
    pub end: bool,
}

impl Default for Packing {
    fn default() -> Self {
        Self {
            expand: false,
            fill: true,
            end: false,
        }
    }
}

impl Packing {
    /// Start-packed, expanding.
    pub fn expand() -> Self {
        Self {
            expand: true,
            ..Self::default()
        }
    }

    /// This packing, from the end of the axis.
    pub fn at_end(mut self) -> Self {
        self.end = true;
        self
    }

    /// This packing, without cross-axis fill.
    pub fn no_fill(mut self) -> Self {
        self.fill = false;
        self
    }
}

/// Stacks children horizontally or vertically.
///
/// Visible children first get their preferred length along the axis.
/// Leftover space is split evenly between expanding children; if the
/// preferred lengths do not fit, every child is scaled down by the same
/// factor. Start-packed children run forward from the leading edge in
/// attachment order, end-packed ones backward from the trailing edge.
#[derive(Debug, Clone)]
pub struct BoxLayout {
    /// Stacking axis.
    orientation: Orientation,
    /// Gap between adjacent visible children.
    spacing: f64,
    /// Per-child packing. Children without an entry use the default.
    packing: HashMap<NodeId, Packing>,
}

impl BoxLayout {
    /// An empty box along `orientation`.
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            spacing: 0.0,
            packing: HashMap::new(),
        }
    }

    /// A box stacking left to right.
    pub fn horizontal() -> Self {
        Self::new(Orientation::Horizontal)
    }

    /// A box stacking top to bottom.
    pub fn vertical() -> Self {
        Self::new(Orientation::Vertical)
    }

    /// Set the gap between children.
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing.max(0.0);
        self
    }

    /// Stacking axis.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Gap between children.
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Packing of a child.
    pub fn packing(&self, child: NodeId) -> Packing {
        self.packing.get(&child).copied().unwrap_or_default()
    }

    /// Create a child from `widget` and pack it.
    pub fn pack(
        &mut self,
        ctx: &mut dyn Context,
        widget: impl Into<Box<dyn Widget>>,
        packing: Packing,
    ) -> Result<NodeId> {
        let node = ctx.node_id();
        let child = ctx.add_child_to(node, widget.into())?;
        self.packing.insert(child, packing);
        ctx.relayout()?;
        Ok(child)
    }

    /// Pack a widget at the start of the axis.
    pub fn pack_start(
        &mut self,
        ctx: &mut dyn Context,
        widget: impl Into<Box<dyn Widget>>,
        expand: bool,
        fill: bool,
    ) -> Result<NodeId> {
        self.pack(
            ctx,
            widget,
            Packing {
                expand,
                fill,
                end: false,
            },
        )
    }

    /// Pack a widget at the end of the axis.
    pub fn pack_end(
        &mut self,
        ctx: &mut dyn Context,
        widget: impl Into<Box<dyn Widget>>,
        expand: bool,
        fill: bool,
    ) -> Result<NodeId> {
        self.pack(
            ctx,
            widget,
            Packing {
                expand,
                fill,
                end: true,
            },
        )
    }

    /// Attach an existing detached node and pack it.
    pub fn pack_node(&mut self, ctx: &mut dyn Context, child: NodeId, packing: Packing) -> Result<()> {
        self.packing.insert(child, packing);
        let node = ctx.node_id();
        if let Err(e) = ctx.attach(node, child) {
            self.packing.remove(&child);
            return Err(e);
        }
        Ok(())
    }

    /// Change how a child is packed.
    pub fn set_packing(&mut self, ctx: &mut dyn Context, child: NodeId, packing: Packing) -> Result<()> {
        if self.packing(child) != packing {
            self.packing.insert(child, packing);
            ctx.relayout()?;
        }
        Ok(())
    }

    /// Remove a child and its subtree.
    pub fn remove(&mut self, ctx: &mut dyn Context, child: NodeId) -> Result<()> {
        self.packing.remove(&child);
        ctx.remove_subtree(child)
    }

    /// Change the gap between children.
    pub fn set_spacing(&mut self, ctx: &mut dyn Context, spacing: f64) -> Result<()> {
        let spacing = spacing.max(0.0);
        if self.spacing != spacing {
            self.spacing = spacing;
            ctx.relayout()?;
        }
        Ok(())
    }

    fn visible_children(&self, ctx: &dyn ViewContext) -> Vec<NodeId> {
        ctx.children()
            .into_iter()
            .filter(|c| ctx.is_visible(*c))
            .collect()
    }

    /// Preferred size of a child when the cross axis is limited to `cross`.
    fn child_preference(&self, ctx: &dyn ViewContext, child: NodeId, cross: Constraint) -> Size {
        match self.orientation {
            Orientation::Horizontal => {
                ctx.preferred_size_of(child, Constraint::Unconstrained, cross)
            }
            Orientation::Vertical => ctx.preferred_size_of(child, cross, Constraint::Unconstrained),
        }
    }

    fn gaps(&self, n: usize) -> f64 {
        self.spacing * n.saturating_sub(1) as f64
    }
}

impl Widget for BoxLayout {
    fn layout(&mut self, size: Size, ctx: &mut dyn Context) -> Result<()> {
        let attached = ctx.children();
        self.packing.retain(|id, _| attached.contains(id));
        let o = self.orientation;
        let children = self.visible_children(ctx);
        if children.is_empty() {
            return Ok(());
        }
        let main = o.main(size);
        let cross = o.cross_of(size);

        let prefs: Vec<Size> = children
            .iter()
            .map(|c| self.child_preference(ctx, *c, Constraint::bounded(cross)))
            .collect();
        let mut lengths: Vec<f64> = prefs.iter().map(|p| o.main(*p)).collect();

        let available = (main - self.gaps(children.len())).max(0.0);
        let wanted: f64 = lengths.iter().sum();
        if wanted > available {
            let scale = if wanted > 0.0 { available / wanted } else { 0.0 };
            for l in &mut lengths {
                *l *= scale;
            }
        } else {
            let expanders = children
                .iter()
                .filter(|c| self.packing(**c).expand)
                .count();
            if expanders > 0 {
                let share = (available - wanted) / expanders as f64;
                for (l, c) in lengths.iter_mut().zip(&children) {
                    if self.packing(*c).expand {
                        *l += share;
                    }
                }
            }
        }

        let mut start = 0.0;
        let mut end = main;
        for ((child, pref), length) in children.iter().zip(&prefs).zip(&lengths) {
            let packing = self.packing(*child);
            let (cross_pos, cross_len) = if packing.fill {
                (0.0, cross)
            } else {
                let c = o.cross_of(*pref).min(cross);
                ((cross - c) / 2.0, c)
            };
            let main_pos = if packing.end {
                end -= length;
                let pos = end;
                end -= self.spacing;
                pos
            } else {
                let pos = start;
                start = start + length + self.spacing;
                pos
            };
            ctx.set_child_bounds(*child, o.rect(main_pos, cross_pos, *length, cross_len))?;
        }
        Ok(())
    }

    fn preferred_size(&self, wc: Constraint, hc: Constraint, ctx: &dyn ViewContext) -> Size {
        let o = self.orientation;
        let children = self.visible_children(ctx);
        let cross = match o {
            Orientation::Horizontal => hc,
            Orientation::Vertical => wc,
        };
        let mut main = self.gaps(children.len());
        let mut thickness: f64 = 0.0;
        for child in children {
            let p = self.child_preference(ctx, child, cross);
            main += o.main(p);
            thickness = thickness.max(o.cross_of(p));
        }
        let s = o.size(main, thickness);
        Size::new(wc.clamp(s.w), hc.clamp(s.h))
    }
}
