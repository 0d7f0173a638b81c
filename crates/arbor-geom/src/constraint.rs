use super::size::non_negative;

/// A size limit passed top-down during size negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Constraint {
    /// No upper bound.
    #[default]
    Unconstrained,
    /// At most this many units. Never negative.
    Bounded(f64),
}

impl Constraint {
    /// A bounded constraint. Negative bounds clamp to zero.
    pub fn bounded(v: f64) -> Self {
        Self::Bounded(non_negative(v))
    }

    /// The bound, if any.
    pub fn available(&self) -> Option<f64> {
        match self {
            Self::Unconstrained => None,
            Self::Bounded(v) => Some(*v),
        }
    }

    /// Is there an upper bound?
    pub fn is_bounded(&self) -> bool {
        matches!(self, Self::Bounded(_))
    }

    /// The constraint left after consuming `used` units.
    pub fn shrink(&self, used: f64) -> Self {
        match self {
            Self::Unconstrained => Self::Unconstrained,
            Self::Bounded(v) => Self::bounded(v - used),
        }
    }

    /// Clamp a length to this constraint and to zero.
    pub fn clamp(&self, v: f64) -> f64 {
        let v = non_negative(v);
        match self {
            Self::Unconstrained => v,
            Self::Bounded(max) => v.min(*max),
        }
    }

    /// The bound, or `fallback` when unconstrained.
    pub fn or(&self, fallback: f64) -> f64 {
        self.available().unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shrink_never_negative() {
        let c = Constraint::bounded(10.0);
        assert_eq!(c.shrink(4.0), Constraint::Bounded(6.0));
        assert_eq!(c.shrink(40.0), Constraint::Bounded(0.0));
        assert_eq!(Constraint::Unconstrained.shrink(4.0), Constraint::Unconstrained);
        assert_eq!(Constraint::bounded(-2.0).available(), Some(0.0));
    }

    #[test]
    fn clamp() {
        assert_eq!(Constraint::bounded(5.0).clamp(8.0), 5.0);
        assert_eq!(Constraint::Unconstrained.clamp(-8.0), 0.0);
        assert_eq!(Constraint::Unconstrained.or(3.0), 3.0);
    }
}
