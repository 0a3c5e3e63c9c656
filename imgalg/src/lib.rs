//! imgalg - Image algebra for Rust
//!
//! A dense numeric grid generic over its sample type, with edge-aware
//! access, pixelwise arithmetic, kernel convolution and order-statistic
//! filtering.
//!
//! # Overview
//!
//! - [`Grid`]: `W x H` samples with an [`EdgePolicy`] for reads past the border
//! - [`filter::DenseKernel`] and [`filter::ProceduralKernel`]: neighbourhood masks
//! - [`filter::Cursor`]: lazy convolution over a grid
//! - [`filter::owa_filter`] and [`filter::sowa_filter`]: rank-weighted filters
//!
//! # Example
//!
//! ```
//! use imgalg::filter::{DenseKernel, convolve_mul_max};
//! use imgalg::{EdgePolicy, Grid};
//!
//! // Dilate a single bright sample with a 3x3 cross.
//! let mut grid = Grid::from_fn(5, 5, |x, y| if (x, y) == (2, 2) { 1.0 } else { 0.0 }).unwrap();
//! grid.set_edge_policy(EdgePolicy::Zero);
//!
//! let dilated = convolve_mul_max(&grid, &DenseKernel::von_neumann()).unwrap();
//! assert_eq!(dilated.sum(), 5.0);
//! assert_eq!(dilated.get_pixel(2, 1).unwrap(), 1.0);
//! assert_eq!(dilated.get_pixel(1, 1).unwrap(), 0.0);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use imgalg_core::*;

// Re-export the filter crate as a module to avoid name conflicts
pub use imgalg_filter as filter;
