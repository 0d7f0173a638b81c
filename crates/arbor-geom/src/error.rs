use thiserror::Error;

/// Geometry error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A geometric precondition did not hold.
    #[error("geometry: {0}")]
    Geometry(String),
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, Error>;
