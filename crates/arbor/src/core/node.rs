use crate::{
    core::{id::NodeId, style::Color},
    geom::{Point, Rect, Size},
    widget::Widget,
};

/// A node in the widget arena.
pub struct Node {
    /// Widget behavior. `None` while the widget is borrowed out for a call.
    pub(crate) widget: Option<Box<dyn Widget>>,
    /// Parent node, if attached. Never used to extend lifetime.
    pub(crate) parent: Option<NodeId>,
    /// Attached children, in insertion order.
    pub(crate) children: Vec<NodeId>,
    /// Position relative to the parent's content origin.
    pub(crate) position: Point,
    /// Current size.
    pub(crate) size: Size,
    /// Own visibility flag.
    pub(crate) visible: bool,
    /// Own sensitivity flag. Effective sensitivity also depends on ancestors.
    pub(crate) sensitive: bool,
    /// Can this node take focus?
    pub(crate) can_focus: bool,
    /// Background fill painted before the widget draws.
    pub(crate) background: Option<Color>,
    /// Opacity multiplier applied to this node and its descendants.
    pub(crate) opacity: f64,
    /// Sizes assigned to the node never fall below this.
    pub(crate) min_size: Size,
    /// Viewport proxy offset applied to the coordinates of the children.
    pub(crate) scroll: Point,
    /// Has `on_mount` run?
    pub(crate) mounted: bool,
    /// Widget name, captured at creation.
    pub(crate) name: String,
    /// A layout was requested while the widget was borrowed.
    pub(crate) needs_layout: bool,
}

impl Node {
    /// Wrap a widget in a fresh, detached node.
    pub(crate) fn new(widget: Box<dyn Widget>) -> Self {
        let name = widget.name();
        let can_focus = widget.accept_focus();
        Self {
            widget: Some(widget),
            parent: None,
            children: Vec::new(),
            position: Point::zero(),
            size: Size::zero(),
            visible: true,
            sensitive: true,
            can_focus,
            background: None,
            opacity: 1.0,
            min_size: Size::zero(),
            scroll: Point::zero(),
            mounted: false,
            name,
            needs_layout: false,
        }
    }

    /// Parent node, if attached.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Attached children.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Bounds relative to the parent.
    pub fn bounds(&self) -> Rect {
        Rect::from_parts(self.position, self.size)
    }

    /// Position relative to the parent.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Current size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Own visibility flag.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Own sensitivity flag. See `Core::is_sensitive` for the effective value.
    pub fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    /// Can this node take focus?
    pub fn can_focus(&self) -> bool {
        self.can_focus
    }

    /// Background fill.
    pub fn background(&self) -> Option<Color> {
        self.background
    }

    /// Opacity multiplier.
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Minimum size.
    pub fn min_size(&self) -> Size {
        self.min_size
    }

    /// Viewport proxy offset.
    pub fn viewport_offset(&self) -> Point {
        self.scroll
    }

    /// Has the node been mounted into a live tree?
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Widget name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Does this node paint an opaque background over its whole area?
    pub(crate) fn is_opaque(&self) -> bool {
        self.visible && self.opacity >= 1.0 && self.background.is_some_and(|c| c.is_opaque())
    }
}
