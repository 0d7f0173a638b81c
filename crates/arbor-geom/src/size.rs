use super::{Point, Rect};

/// A `Size` is a rectangle that has a width and height but no location.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Width, never negative.
    pub w: f64,
    /// Height, never negative.
    pub h: f64,
}

impl Size {
    /// Construct a size. Negative and NaN extents are clamped to zero.
    pub fn new(w: f64, h: f64) -> Self {
        Self {
            w: non_negative(w),
            h: non_negative(h),
        }
    }

    /// A zero size.
    pub fn zero() -> Self {
        Self { w: 0.0, h: 0.0 }
    }

    /// Does this size enclose no area?
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Return a `Rect` with the same dimensions, located at the origin.
    pub fn rect(&self) -> Rect {
        Rect {
            tl: Point::zero(),
            w: self.w,
            h: self.h,
        }
    }

    /// Component-wise maximum.
    pub fn max(&self, other: Self) -> Self {
        Self {
            w: self.w.max(other.w),
            h: self.h.max(other.h),
        }
    }

    /// Shrink by the given amounts, clamping at zero.
    pub fn shrink(&self, dw: f64, dh: f64) -> Self {
        Self::new(self.w - dw, self.h - dh)
    }

    /// True if this size can completely enclose the target size in both dimensions.
    pub fn contains(&self, other: &Self) -> bool {
        self.w >= other.w && self.h >= other.h
    }
}

impl From<Rect> for Size {
    fn from(r: Rect) -> Self {
        Self { w: r.w, h: r.h }
    }
}

impl From<(f64, f64)> for Size {
    fn from(v: (f64, f64)) -> Self {
        Self::new(v.0, v.1)
    }
}

/// Clamp a length so it is never negative.
pub(crate) fn non_negative(v: f64) -> f64 {
    if v > 0.0 { v } else { 0.0 }
}
