//! Error types for imgalg-core
//!
//! Provides a unified error type for all grid operations. Each variant
//! carries the offending coordinates or dimensions so a caller can report
//! which operation failed and why.
//!
//! Validation always happens before mutation: an operation that returns
//! an error leaves its receiver untouched.

use thiserror::Error;

/// imgalg-core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Coordinate outside the grid domain (Skip policy, or mutable access)
    #[error("coordinate ({x}, {y}) is outside the {width}x{height} domain")]
    OutOfDomain {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    /// Binary pixelwise operation on grids of different shape
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// API used in a way it does not support
    #[error("usage error: {0}")]
    Usage(String),

    /// Backing storage could not be obtained
    #[error("memory allocation failed for a {width}x{height} grid")]
    AllocationFailed { width: u32, height: u32 },
}

/// Result type alias for grid operations
pub type Result<T> = std::result::Result<T, Error>;
