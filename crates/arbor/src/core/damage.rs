//! Per-window damage tracking.
//!
//! Invalidations within one tick coalesce into a single bounding rectangle.
//! The raw union is kept unclipped and clipped to the window's client bounds
//! when read, so resizing the window never loses or invents damage.

use crate::geom::Rect;

/// The accumulated dirty region of one window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Damage {
    /// Union of all invalidated rectangles since the last redraw.
    region: Option<Rect>,
    /// The window's client bounds.
    bounds: Rect,
}

impl Damage {
    /// An empty damage tracker for a window with the given client bounds.
    pub fn new(bounds: Rect) -> Self {
        Self {
            region: None,
            bounds,
        }
    }

    /// Union a rectangle into the damaged region. Empty rectangles are ignored.
    pub fn add(&mut self, r: Rect) {
        if r.is_empty() {
            return;
        }
        self.region = Some(match self.region {
            Some(existing) => existing.union(&r),
            None => r,
        });
    }

    /// Damage the whole window.
    pub fn add_all(&mut self) {
        self.add(self.bounds);
    }

    /// Update the client bounds the region is clipped to.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// The client bounds.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Is anything waiting to be redrawn?
    pub fn is_dirty(&self) -> bool {
        self.rect().is_some()
    }

    /// The damaged region clipped to the client bounds, if any.
    pub fn rect(&self) -> Option<Rect> {
        self.region.and_then(|r| r.intersect(&self.bounds))
    }

    /// Forget all damage.
    pub fn clear(&mut self) {
        self.region = None;
    }

    /// Return the clipped damaged region and clear it.
    pub fn take(&mut self) -> Option<Rect> {
        let r = self.rect();
        self.clear();
        r
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn rect() -> impl Strategy<Value = Rect> {
        (-50.0..150.0f64, -50.0..150.0f64, 0.0..80.0f64, 0.0..80.0f64)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    #[test]
    fn empty_rect_does_not_dirty() {
        let mut d = Damage::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        d.add(Rect::new(10.0, 10.0, 0.0, 5.0));
        assert!(!d.is_dirty());
        d.add(Rect::new(200.0, 200.0, 5.0, 5.0));
        assert!(!d.is_dirty());
    }

    #[test]
    fn growing_bounds_reveals_clipped_damage() {
        let mut d = Damage::new(Rect::new(0.0, 0.0, 50.0, 50.0));
        d.add(Rect::new(40.0, 40.0, 20.0, 20.0));
        assert_eq!(d.rect(), Some(Rect::new(40.0, 40.0, 10.0, 10.0)));
        d.set_bounds(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(d.rect(), Some(Rect::new(40.0, 40.0, 20.0, 20.0)));
        assert_eq!(d.take(), Some(Rect::new(40.0, 40.0, 20.0, 20.0)));
        assert_eq!(d.rect(), None);
    }

    proptest! {
        #[test]
        fn union_of_two_invalidations(r1 in rect(), r2 in rect()) {
            let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
            let mut d = Damage::new(bounds);
            d.add(r1);
            d.add(r2);
            prop_assert_eq!(d.rect(), r1.union(&r2).intersect(&bounds));
            d.take();
            prop_assert!(!d.is_dirty());
        }
    }
}
