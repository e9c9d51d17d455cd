//! Error types for relief building.

use thiserror::Error;

/// Result type alias for relief operations.
pub type ReliefResult<T> = Result<T, ReliefError>;

/// Errors that can occur while constructing a relief mesh.
///
/// All parameters are validated eagerly, before any geometry is
/// emitted, so a partial mesh is never returned.
#[derive(Debug, Error)]
pub enum ReliefError {
    /// The sample grid has no usable surface area.
    #[error("sample grid is empty: {width}x{height}")]
    EmptyGrid {
        /// Grid width in samples.
        width: usize,
        /// Grid height in samples.
        height: usize,
    },

    /// A configuration value is out of range.
    #[error("invalid relief parameters: {0}")]
    InvalidParams(String),

    /// Sample data length does not match the declared dimensions.
    #[error("grid data length {len} does not match {width}x{height}")]
    GridShape {
        /// Provided sample count.
        len: usize,
        /// Declared width.
        width: usize,
        /// Declared height.
        height: usize,
    },
}

impl ReliefError {
    /// Create an invalid-params error.
    #[must_use]
    pub fn invalid_params(details: impl Into<String>) -> Self {
        Self::InvalidParams(details.into())
    }
}
