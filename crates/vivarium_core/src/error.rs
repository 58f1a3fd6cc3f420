//! Error types for the simulation core.

use thiserror::Error;

/// Failure kinds the core reports to its callers.
///
/// Every error is synchronous and final: the core never retries. Retry
/// policy, if any, belongs to the dispatch layer above.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A caller-supplied value is out of its documented domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A channel name that is not mirror, shard or flux.
    #[error("unknown lattice channel: {0}")]
    UnknownChannel(String),

    /// The per-hour feed allowance is already spent.
    #[error("burst cap reached for the current hour")]
    BurstCapExceeded,

    /// Imported lattice grids with inconsistent or invalid dimensions.
    #[error("lattice shape mismatch: {0}")]
    ShapeMismatch(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Creates a new invalid-argument error.
    #[must_use]
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Creates a new shape-mismatch error.
    #[must_use]
    pub fn shape_mismatch<S: Into<String>>(msg: S) -> Self {
        Self::ShapeMismatch(msg.into())
    }
}
