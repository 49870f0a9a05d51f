//! Error types for mapping options.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    /// A header threshold outside `(0, 1]`.
    #[error("{name} threshold must be in (0, 1], got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    /// A scan depth of zero rows.
    #[error("{name} must be at least 1")]
    InvalidDepth { name: &'static str },
}

pub type Result<T> = std::result::Result<T, MapError>;
