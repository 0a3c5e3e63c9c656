//! imgalg-core - Generic image grids
//!
//! This crate provides the storage layer of the image algebra:
//!
//! - [`Grid`]: a dense row-major `W x H` array of numeric samples
//! - [`EdgePolicy`]: how reads outside the domain behave
//! - [`Sample`]: the numeric bound shared by every grid element type
//! - [`Comparison`]: operators for characteristic grids

pub mod edge;
pub mod error;
pub mod grid;
pub mod sample;

pub use edge::EdgePolicy;
pub use error::{Error, Result};
pub use grid::Grid;
pub use grid::compare::Comparison;
pub use sample::Sample;
