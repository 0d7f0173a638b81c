//! The normalized value model behind a scrollbar.

/// Range and value of a scrollbar.
///
/// `value` always lies in `lower..=upper - page_size` (or at `lower` when the
/// page is larger than the range). Every mutation re-clamps it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    /// Smallest value.
    lower: f64,
    /// End of the range. The value stops one page short of it.
    upper: f64,
    /// Length of the visible page in value units.
    page_size: f64,
    /// Distance moved by one page step.
    page_increment: f64,
    /// Distance moved by one wheel or arrow step.
    step_increment: f64,
    /// Current value.
    value: f64,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            lower: 0.0,
            upper: 100.0,
            page_size: 100.0,
            page_increment: 10.0,
            step_increment: 1.0,
            value: 0.0,
        }
    }
}

impl ScrollState {
    /// A state with the given range and value.
    pub fn new(lower: f64, upper: f64, page_size: f64, value: f64) -> Self {
        let mut s = Self::default();
        s.set_range(lower, upper, page_size, s.page_increment, s.step_increment, value);
        s
    }

    /// Smallest value.
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// End of the range.
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Page length in value units.
    pub fn page_size(&self) -> f64 {
        self.page_size
    }

    /// Page step.
    pub fn page_increment(&self) -> f64 {
        self.page_increment
    }

    /// Single step.
    pub fn step_increment(&self) -> f64 {
        self.step_increment
    }

    /// Current value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Largest value the state can hold.
    pub fn max_value(&self) -> f64 {
        (self.upper - self.page_size).max(self.lower)
    }

    /// Is there anywhere to scroll to?
    pub fn can_scroll(&self) -> bool {
        self.max_value() > self.lower
    }

    /// `v` clamped into the valid range. NaN clamps to `lower`.
    pub fn clamp(&self, v: f64) -> f64 {
        if v.is_nan() {
            return self.lower;
        }
        v.clamp(self.lower, self.max_value())
    }

    /// Replace the range and value. Negative page sizes and increments are
    /// treated as zero and an inverted range collapses to `lower`. Returns
    /// `true` if the value changed.
    pub fn set_range(
        &mut self,
        lower: f64,
        upper: f64,
        page_size: f64,
        page_increment: f64,
        step_increment: f64,
        value: f64,
    ) -> bool {
        self.lower = lower;
        self.upper = upper.max(lower);
        self.page_size = page_size.max(0.0);
        self.page_increment = page_increment.max(0.0);
        self.step_increment = step_increment.max(0.0);
        let old = self.value;
        self.value = self.clamp(value);
        old != self.value
    }

    /// Set the value, clamped. Returns `true` if it changed.
    pub fn set_value(&mut self, v: f64) -> bool {
        let v = self.clamp(v);
        if v == self.value {
            return false;
        }
        self.value = v;
        true
    }

    /// Position within the range: 0 at `lower`, 1 at the maximum value.
    pub fn fraction(&self) -> f64 {
        let span = self.max_value() - self.lower;
        if span <= 0.0 {
            0.0
        } else {
            (self.value - self.lower) / span
        }
    }

    /// Move `n` single steps. Returns `true` if the value changed.
    pub fn step(&mut self, n: f64) -> bool {
        self.set_value(self.value + n * self.step_increment)
    }

    /// Move `n` page steps. Returns `true` if the value changed.
    pub fn page(&mut self, n: f64) -> bool {
        self.set_value(self.value + n * self.page_increment)
    }

    /// Thumb start offset and length along a track of `track` pixels. The
    /// thumb covers the page's share of the range but never less than
    /// `min_len`, and its start maps linearly over the remaining travel.
    pub fn thumb(&self, track: f64, min_len: f64) -> (f64, f64) {
        let track = track.max(0.0);
        let range = self.upper - self.lower;
        let len = if range <= 0.0 {
            track
        } else {
            (track * self.page_size / range).clamp(min_len.min(track), track)
        };
        ((track - len) * self.fraction(), len)
    }

    /// The value that puts the thumb's start at `start` pixels along the
    /// track. Inverse of [`thumb`](Self::thumb).
    pub fn value_at(&self, start: f64, track: f64, min_len: f64) -> f64 {
        let (_, len) = self.thumb(track, min_len);
        let travel = track - len;
        if travel <= 0.0 {
            return self.lower;
        }
        let f = (start / travel).clamp(0.0, 1.0);
        self.lower + f * (self.max_value() - self.lower)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::error::Result;

    #[test]
    fn clamps() -> Result<()> {
        let mut s = ScrollState::new(0.0, 130.0, 30.0, 0.0);
        assert_eq!(s.max_value(), 100.0);
        assert!(s.set_value(500.0));
        assert_eq!(s.value(), 100.0);
        assert!(!s.set_value(100.0));
        assert!(s.set_value(-4.0));
        assert_eq!(s.value(), 0.0);
        assert!(!s.set_value(f64::NAN));

        // A page larger than the range pins the value to the lower bound.
        let s = ScrollState::new(0.0, 100.0, 100.0, 50.0);
        assert_eq!(s.value(), 0.0);
        assert!(!s.can_scroll());
        Ok(())
    }

    #[test]
    fn set_range_preserves_value() -> Result<()> {
        let mut s = ScrollState::new(0.0, 130.0, 30.0, 60.0);
        assert!(!s.set_range(0.0, 150.0, 50.0, 10.0, 1.0, s.value()));
        assert_eq!(s.value(), 60.0);
        assert!(s.set_range(0.0, 100.0, 50.0, 10.0, 1.0, s.value()));
        assert_eq!(s.value(), 50.0);
        Ok(())
    }

    #[test]
    fn thumb_geometry() -> Result<()> {
        let s = ScrollState::new(0.0, 130.0, 30.0, 0.0);
        let (start, len) = s.thumb(130.0, 8.0);
        assert_eq!((start, len), (0.0, 30.0));
        assert_eq!(s.value_at(50.0, 130.0, 8.0), 50.0);

        // Thumbs never shrink below the minimum.
        let s = ScrollState::new(0.0, 10_000.0, 1.0, 0.0);
        assert_eq!(s.thumb(100.0, 8.0).1, 8.0);
        // ...nor grow past the track.
        assert_eq!(s.thumb(4.0, 8.0).1, 4.0);
        Ok(())
    }

    #[test]
    fn steps_and_pages() -> Result<()> {
        let mut s = ScrollState::default();
        s.set_range(0.0, 130.0, 30.0, 25.0, 5.0, 0.0);
        assert!(s.step(2.0));
        assert_eq!(s.value(), 10.0);
        assert!(s.page(1.0));
        assert_eq!(s.value(), 35.0);
        assert!(s.page(10.0));
        assert_eq!(s.value(), 100.0);
        assert!(!s.step(1.0));
        Ok(())
    }

    proptest! {
        #[test]
        fn value_always_clamped(
            lower in -1000.0..1000.0f64,
            span in 0.0..1000.0f64,
            page in 0.0..1500.0f64,
            v in -1e6..1e6f64,
        ) {
            let mut s = ScrollState::new(lower, lower + span, page, 0.0);
            s.set_value(v);
            prop_assert!(s.value() >= s.lower());
            prop_assert!(s.value() <= s.max_value());
            let again = s.value();
            prop_assert!(!s.set_value(again));
            prop_assert_eq!(s.value(), again);
        }

        #[test]
        fn thumb_round_trip(value in 0.0..100.0f64, track in 20.0..1000.0f64) {
            let s = ScrollState::new(0.0, 130.0, 30.0, value);
            let (start, _) = s.thumb(track, 8.0);
            prop_assert!((s.value_at(start, track, 8.0) - s.value()).abs() < 1e-6);
        }
    }
}
