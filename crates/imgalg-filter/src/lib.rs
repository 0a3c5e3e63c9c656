//! imgalg-filter - Neighbourhood operations on grids
//!
//! This crate provides:
//!
//! - Kernels: dense weight masks and procedural (generated) masks
//! - A convolution cursor with linear, multiplicative-max,
//!   multiplicative-min and generic merge/reduce strategies
//! - Order-statistic filters (OWA and SOWA)

pub mod convolve;
pub mod cursor;
mod error;
pub mod kernel;
pub mod owa;
pub mod reduce;

pub use error::{FilterError, FilterResult};
pub use kernel::{Centered, DenseKernel, Footprint, Generator, Kernel, Point, ProceduralKernel, Site};

// Re-export commonly used functions
pub use convolve::{
    convolve, convolve_generic, convolve_linear, convolve_mul_max, convolve_mul_min, convolve_with,
};
pub use cursor::{Cursor, Strategy};
pub use owa::{OwaFilter, SowaFilter, owa_filter, sowa_filter};
pub use reduce::{MergeFn, ReduceFn};
