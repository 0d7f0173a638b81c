//! A tabbed container showing one page at a time.

use crate::{
    Context, EventOutcome, NodeId, Painter, ViewContext, Widget,
    error::{Error, Result},
    event::{Event, MouseButton},
    geom::{Constraint, Insets, Orientation, Point, Rect, Size},
    sink::Notification,
};

/// The side of a notebook its tab headers sit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabPosition {
    /// Above the pages.
    #[default]
    Top,
    /// Below the pages.
    Bottom,
    /// Left of the pages.
    Left,
    /// Right of the pages.
    Right,
}

impl TabPosition {
    /// The axis the headers run along.
    pub fn axis(self) -> Orientation {
        match self {
            Self::Top | Self::Bottom => Orientation::Horizontal,
            Self::Left | Self::Right => Orientation::Vertical,
        }
    }
}

/// One page and its header label.
#[derive(Debug, Clone, PartialEq)]
struct Tab {
    /// The page node.
    node: NodeId,
    /// Header text.
    label: String,
}

/// Tabbed container. Only the current page takes part in drawing and
/// hit-testing; the headers belong to the notebook itself.
#[derive(Debug, Clone, Default)]
pub struct Notebook {
    /// Pages in header order.
    tabs: Vec<Tab>,
    /// Index of the shown page.
    current: Option<usize>,
    /// Header side.
    position: TabPosition,
    /// Header rectangles from the last layout, in local coordinates.
    headers: Vec<Rect>,
    /// Page area from the last layout.
    content: Rect,
}

impl Notebook {
    /// An empty notebook with headers on top.
    pub fn new() -> Self {
        Self::default()
    }

    /// Put the headers on another side.
    pub fn with_position(mut self, position: TabPosition) -> Self {
        self.position = position;
        self
    }

    /// Number of tabs.
    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    /// Index of the current tab.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// The current page node.
    pub fn current_page(&self) -> Option<NodeId> {
        self.current.and_then(|i| self.tabs.get(i)).map(|t| t.node)
    }

    /// The page node of tab `index`.
    pub fn page(&self, index: usize) -> Option<NodeId> {
        self.tabs.get(index).map(|t| t.node)
    }

    /// The label of tab `index`.
    pub fn label(&self, index: usize) -> Option<&str> {
        self.tabs.get(index).map(|t| t.label.as_str())
    }

    /// Header side.
    pub fn position(&self) -> TabPosition {
        self.position
    }

    /// Header rectangles from the last layout.
    pub fn header_rects(&self) -> &[Rect] {
        &self.headers
    }

    /// The page area from the last layout.
    pub fn content_rect(&self) -> Rect {
        self.content
    }

    /// Add a page. The first page added becomes current.
    pub fn add_tab(
        &mut self,
        ctx: &mut dyn Context,
        widget: impl Into<Box<dyn Widget>>,
        label: impl Into<String>,
    ) -> Result<NodeId> {
        let me = ctx.node_id();
        let node = ctx.add_child_to(me, widget.into())?;
        self.tabs.push(Tab {
            node,
            label: label.into(),
        });
        if self.current.is_none() {
            self.current = Some(0);
            self.current_changed(ctx);
        }
        ctx.invalidate();
        ctx.relayout()?;
        Ok(node)
    }

    /// Remove tab `index` and its page. Removing a tab before the current
    /// one keeps the same page current; removing the current tab when it is
    /// the last one moves the selection back by one.
    pub fn remove_tab(&mut self, ctx: &mut dyn Context, index: usize) -> Result<()> {
        if index >= self.tabs.len() {
            return Err(Error::Invalid(format!("no tab at index {index}")));
        }
        let before = (self.current, self.current_page());
        let last = self.tabs.len() - 1;
        let tab = self.tabs.remove(index);
        self.current = match self.current {
            Some(c) if index < c => Some(c - 1),
            Some(c) if index == c && c == last => c.checked_sub(1),
            other => other,
        };
        ctx.remove_subtree(tab.node)?;
        if (self.current, self.current_page()) != before {
            self.current_changed(ctx);
        }
        ctx.invalidate();
        ctx.relayout()
    }

    /// Show tab `index`.
    pub fn set_current(&mut self, ctx: &mut dyn Context, index: usize) -> Result<()> {
        if index >= self.tabs.len() {
            return Err(Error::Invalid(format!("no tab at index {index}")));
        }
        if self.current != Some(index) {
            if let Some(old) = self.current_page() {
                ctx.release_interaction(old)?;
            }
            self.current = Some(index);
            self.current_changed(ctx);
            ctx.invalidate();
            ctx.relayout()?;
        }
        Ok(())
    }

    /// Change the label of tab `index`.
    pub fn set_label(
        &mut self,
        ctx: &mut dyn Context,
        index: usize,
        label: impl Into<String>,
    ) -> Result<()> {
        let tab = self
            .tabs
            .get_mut(index)
            .ok_or_else(|| Error::Invalid(format!("no tab at index {index}")))?;
        tab.label = label.into();
        ctx.invalidate();
        ctx.relayout()
    }

    /// Move the headers to another side.
    pub fn set_position(&mut self, ctx: &mut dyn Context, position: TabPosition) -> Result<()> {
        if self.position != position {
            self.position = position;
            ctx.invalidate();
            ctx.relayout()?;
        }
        Ok(())
    }

    /// The header index under a local point.
    pub fn header_at(&self, p: Point) -> Option<usize> {
        self.headers.iter().position(|r| r.contains_point(p))
    }

    fn current_changed(&self, ctx: &mut dyn Context) {
        let node = ctx.node_id();
        ctx.notify(Notification::CurrentTabChanged {
            node,
            index: self.current,
        });
    }

    /// Natural header sizes, each oriented as drawn: width by height.
    fn header_sizes(&self, ctx: &dyn ViewContext) -> Vec<Size> {
        let theme = ctx.theme();
        let pad = theme.tab_insets();
        self.tabs
            .iter()
            .map(|t| {
                let m = ctx.text_metrics(&theme.font, &t.label);
                Size::new(m.width + pad.horizontal(), m.height + pad.vertical())
            })
            .collect()
    }

    /// Header rectangles and their common thickness for a notebook of
    /// `size`. Headers that do not fit share the length equally.
    fn place_headers(&self, size: Size, ctx: &dyn ViewContext) -> (Vec<Rect>, f64) {
        let axis = self.position.axis();
        let distance = ctx.theme().tab_distance;
        let sizes = self.header_sizes(ctx);
        if sizes.is_empty() {
            return (Vec::new(), 0.0);
        }
        let thickness = sizes.iter().map(|s| axis.cross_of(*s)).fold(0.0, f64::max);
        let gaps = distance * (sizes.len() - 1) as f64;
        let mut lengths: Vec<f64> = sizes.iter().map(|s| axis.main(*s)).collect();
        let available = axis.main(size);
        if lengths.iter().sum::<f64>() + gaps > available {
            let share = ((available - gaps) / sizes.len() as f64).max(0.0);
            lengths.iter_mut().for_each(|l| *l = share);
        }
        let cross_pos = match self.position {
            TabPosition::Top | TabPosition::Left => 0.0,
            TabPosition::Bottom | TabPosition::Right => {
                (axis.cross_of(size) - thickness).max(0.0)
            }
        };
        let mut pos = 0.0;
        let rects = lengths
            .iter()
            .map(|l| {
                let r = axis.rect(pos, cross_pos, *l, thickness);
                pos = pos + l + distance;
                r
            })
            .collect();
        (rects, thickness)
    }

    /// The pane below the headers, before child padding.
    fn pane(&self, size: Size, thickness: f64) -> Rect {
        let edge = match self.position {
            TabPosition::Top => Insets::new(0.0, thickness, 0.0, 0.0),
            TabPosition::Bottom => Insets::new(0.0, 0.0, 0.0, thickness),
            TabPosition::Left => Insets::new(thickness, 0.0, 0.0, 0.0),
            TabPosition::Right => Insets::new(0.0, 0.0, thickness, 0.0),
        };
        size.rect().inset(edge)
    }
}

impl Widget for Notebook {
    fn children(&self, _attached: &[NodeId]) -> Vec<NodeId> {
        self.current_page().into_iter().collect()
    }

    fn layout(&mut self, size: Size, ctx: &mut dyn Context) -> Result<()> {
        let (headers, thickness) = self.place_headers(size, ctx);
        let padding = ctx.theme().notebook_child_padding;
        let content = self
            .pane(size, thickness)
            .inset(Insets::uniform(padding));
        if headers != self.headers {
            ctx.invalidate();
        }
        self.headers = headers;
        self.content = content;
        for tab in &self.tabs {
            ctx.set_child_bounds(tab.node, content)?;
        }
        Ok(())
    }

    fn on_event(&mut self, event: &Event, ctx: &mut dyn Context) -> Result<EventOutcome> {
        match event {
            Event::ButtonPressed(b) if b.button == MouseButton::Left => match self.header_at(b.pos) {
                Some(index) => {
                    self.set_current(ctx, index)?;
                    Ok(EventOutcome::Handle)
                }
                None => Ok(EventOutcome::Ignore),
            },
            _ => Ok(EventOutcome::Ignore),
        }
    }

    fn draw(&mut self, p: &mut Painter, ctx: &dyn ViewContext) -> Result<()> {
        let theme = ctx.theme();
        let pad = theme.tab_insets();
        let thickness = self
            .headers
            .first()
            .map(|r| self.position.axis().cross_of(r.size()))
            .unwrap_or(0.0);
        p.stroke_rect(self.pane(ctx.size(), thickness), theme.notebook_border, 1.0);

        for (i, (tab, r)) in self.tabs.iter().zip(&self.headers).enumerate() {
            if !p.is_visible(*r) {
                continue;
            }
            let fill = if self.current == Some(i) {
                theme.tab_selected
            } else {
                theme.tab_unselected
            };
            p.fill_rect(*r, fill);
            p.stroke_rect(*r, theme.notebook_border, 1.0);
            p.scoped(|p| {
                if p.clip(*r) {
                    let at = Point::new(r.tl.x + pad.left, r.tl.y + pad.top);
                    p.text(&theme.font, &tab.label, at, theme.foreground);
                }
            });
        }
        Ok(())
    }

    fn preferred_size(&self, wc: Constraint, hc: Constraint, ctx: &dyn ViewContext) -> Size {
        let axis = self.position.axis();
        let theme = ctx.theme();
        let sizes = self.header_sizes(ctx);
        let thickness = sizes.iter().map(|s| axis.cross_of(*s)).fold(0.0, f64::max);
        let headers: f64 = sizes.iter().map(|s| axis.main(*s)).sum::<f64>()
            + theme.tab_distance * sizes.len().saturating_sub(1) as f64;

        let padding = 2.0 * theme.notebook_child_padding;
        let page = self
            .tabs
            .iter()
            .map(|t| ctx.preferred_size_of(t.node, Constraint::Unconstrained, Constraint::Unconstrained))
            .fold(Size::zero(), |a, b| a.max(b));
        let main = (axis.main(page) + padding).max(headers);
        let cross = axis.cross_of(page) + padding + thickness;
        let s = axis.size(main, cross);
        Size::new(wc.clamp(s.w), hc.clamp(s.h))
    }
}
