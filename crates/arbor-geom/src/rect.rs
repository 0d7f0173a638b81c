use super::{Error, Insets, Point, Result, Size, size::non_negative};

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Top-left corner
    pub tl: Point,
    /// Width
    pub w: f64,
    /// Height
    pub h: f64,
}

impl Rect {
    /// Construct a rectangle. Negative extents are clamped to zero.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            tl: Point { x, y },
            w: non_negative(w),
            h: non_negative(h),
        }
    }

    /// Construct a rectangle from an origin and a size.
    pub fn from_parts(tl: Point, size: Size) -> Self {
        Self::new(tl.x, tl.y, size.w, size.h)
    }

    /// A zero rectangle at the origin.
    pub fn zero() -> Self {
        Self::default()
    }

    /// The right edge (exclusive).
    pub fn right(&self) -> f64 {
        self.tl.x + self.w
    }

    /// The bottom edge (exclusive).
    pub fn bottom(&self) -> f64 {
        self.tl.y + self.h
    }

    /// The size of this rectangle.
    pub fn size(&self) -> Size {
        Size {
            w: self.w,
            h: self.h,
        }
    }

    /// Does this rectangle enclose no area?
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Does this rectangle contain the point? Left and top edges are
    /// inclusive, right and bottom edges exclusive.
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.tl.x && p.x < self.right() && p.y >= self.tl.y && p.y < self.bottom()
    }

    /// Does this rectangle completely enclose the other? Empty rectangles are
    /// enclosed by everything.
    pub fn contains_rect(&self, other: &Self) -> bool {
        if other.is_empty() {
            return true;
        }
        other.tl.x >= self.tl.x
            && other.tl.y >= self.tl.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Does this rectangle share any area with the other?
    pub fn intersects(&self, other: &Self) -> bool {
        self.intersect(other).is_some()
    }

    /// The overlapping area of two rectangles, or `None` if they do not
    /// overlap.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let left = self.tl.x.max(other.tl.x);
        let top = self.tl.y.max(other.tl.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return None;
        }
        Some(Self::new(left, top, right - left, bottom - top))
    }

    /// The smallest rectangle enclosing both. Empty rectangles contribute
    /// nothing.
    pub fn union(&self, other: &Self) -> Self {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        let left = self.tl.x.min(other.tl.x);
        let top = self.tl.y.min(other.tl.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(left, top, right - left, bottom - top)
    }

    /// Shift the rectangle by an offset.
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self {
            tl: self.tl.offset(dx, dy),
            w: self.w,
            h: self.h,
        }
    }

    /// Shift the rectangle by a point treated as a vector.
    pub fn translate(&self, by: Point) -> Self {
        self.offset(by.x, by.y)
    }

    /// Extract the inner rectangle left after removing the insets. Collapses
    /// to an empty rectangle rather than inverting.
    pub fn inset(&self, insets: Insets) -> Self {
        Self::new(
            self.tl.x + insets.left,
            self.tl.y + insets.top,
            self.w - insets.horizontal(),
            self.h - insets.vertical(),
        )
    }

    /// Given a point that falls within this rectangle, rebase the point to be
    /// relative to our origin. If the point falls outside the rect, an error is
    /// returned.
    pub fn rebase(&self, pt: Point) -> Result<Point> {
        if !self.contains_point(pt) {
            return Err(Error::Geometry("co-ords outside rectangle".into()));
        }
        Ok(pt - self.tl)
    }
}

impl From<Size> for Rect {
    fn from(s: Size) -> Self {
        s.rect()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn intersect() -> Result<()> {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersect(&b), Some(Rect::new(5.0, 5.0, 5.0, 5.0)));
        assert_eq!(a.intersect(&Rect::new(10.0, 0.0, 5.0, 5.0)), None);
        assert_eq!(a.intersect(&Rect::new(2.0, 2.0, 0.0, 3.0)), None);
        Ok(())
    }

    #[test]
    fn union_ignores_empty() -> Result<()> {
        let a = Rect::new(1.0, 1.0, 2.0, 2.0);
        assert_eq!(a.union(&Rect::zero()), a);
        assert_eq!(Rect::new(50.0, 50.0, 0.0, 0.0).union(&a), a);
        assert_eq!(
            a.union(&Rect::new(10.0, 0.0, 1.0, 1.0)),
            Rect::new(1.0, 0.0, 10.0, 3.0)
        );
        Ok(())
    }

    #[test]
    fn contains() -> Result<()> {
        let r = Rect::new(10.0, 10.0, 10.0, 10.0);
        assert!(r.contains_point(Point::new(10.0, 10.0)));
        assert!(!r.contains_point(Point::new(20.0, 15.0)));
        assert!(r.contains_rect(&Rect::new(12.0, 12.0, 8.0, 8.0)));
        assert!(!r.contains_rect(&Rect::new(12.0, 12.0, 9.0, 8.0)));
        assert_eq!(r.rebase(Point::new(15.0, 11.0))?, Point::new(5.0, 1.0));
        assert!(r.rebase(Point::new(0.0, 0.0)).is_err());
        Ok(())
    }

    #[test]
    fn inset_collapses() -> Result<()> {
        let r = Rect::new(0.0, 0.0, 10.0, 4.0);
        assert_eq!(
            r.inset(Insets::uniform(3.0)),
            Rect::new(3.0, 3.0, 4.0, 0.0)
        );
        Ok(())
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (-500.0..500.0f64, -500.0..500.0f64, 0.5..300.0f64, 0.5..300.0f64)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn union_encloses_both(a in rect_strategy(), b in rect_strategy()) {
            let u = a.union(&b);
            prop_assert!(u.contains_rect(&a));
            prop_assert!(u.contains_rect(&b));
        }

        #[test]
        fn intersection_is_contained(a in rect_strategy(), b in rect_strategy()) {
            if let Some(i) = a.intersect(&b) {
                prop_assert!(a.contains_rect(&i));
                prop_assert!(b.contains_rect(&i));
            }
        }
    }
}
