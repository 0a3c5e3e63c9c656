//! Error types for imgalg-filter

use thiserror::Error;

/// Errors that can occur during kernel and filtering operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FilterError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] imgalg_core::Error),

    /// Offset outside the kernel footprint
    #[error("offset ({dx}, {dy}) is outside the footprint of a {width}x{height} kernel")]
    KernelOutOfDomain {
        dx: i64,
        dy: i64,
        width: u32,
        height: u32,
    },

    /// Flat storage index past the end of the kernel
    #[error("kernel index {index} out of range for size {size}")]
    KernelIndexOutOfRange { index: usize, size: usize },

    /// Invalid kernel
    #[error("invalid kernel: {0}")]
    InvalidKernel(String),

    /// Two kernels bound together have different shapes
    #[error("kernel shape mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Cursor dereferenced with no kernel bound
    #[error("cursor has no bound kernel")]
    UnboundKernel,
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
