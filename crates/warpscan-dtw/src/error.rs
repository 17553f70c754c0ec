//! Error types for search configuration, query preparation and vector arithmetic.

/// Errors from configuring a search, building a query or combining vectors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DtwError {
    /// Returned when a search or vector is created with zero dimensions.
    #[error("dimensions must be at least 1, got {dimensions}")]
    InvalidDimensions {
        /// The rejected dimension count.
        dimensions: usize,
    },

    /// Returned when the warping window fraction is outside `(0.0, 1.0]`.
    #[error("warping window must be greater than 0.0 and no more than 1.0, got {fraction}")]
    InvalidWarpingWindow {
        /// The rejected fraction.
        fraction: f64,
    },

    /// Returned when a vector's dimension differs from the one it is combined with.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Dimension configured for the receiver.
        expected: usize,
        /// Dimension of the offending vector.
        got: usize,
    },

    /// Returned when a point is appended to a query that was already processed.
    #[error("query is already processed and cannot take more points")]
    QueryProcessed,

    /// Returned when a query is processed before any point was added.
    #[error("query must contain at least one point")]
    EmptyQuery,

    /// Returned when a query dimension has zero standard deviation and cannot be z-normalized.
    #[error("query dimension {dimension} is constant and cannot be z-normalized")]
    ConstantQuery {
        /// Zero-based index of the constant dimension.
        dimension: usize,
    },

    /// Returned when the epoch cannot hold a full query window.
    #[error("epoch of {epoch} points cannot hold a query of {query_len} points")]
    EpochTooShort {
        /// Configured epoch size.
        epoch: usize,
        /// Length of the processed query.
        query_len: usize,
    },
}
