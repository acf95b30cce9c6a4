//! Error types for spatial index operations.

use thiserror::Error;

/// Errors that can occur when inserting into or querying a spatial index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpatialError {
    /// A required point or rectangle argument cannot be used.
    ///
    /// Raised for points with a NaN or infinite coordinate and for rectangles
    /// with a NaN bound or a minimum greater than its maximum.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the argument.
        reason: &'static str,
    },
}

impl SpatialError {
    pub(crate) fn invalid(reason: &'static str) -> Self {
        SpatialError::InvalidArgument { reason }
    }
}
