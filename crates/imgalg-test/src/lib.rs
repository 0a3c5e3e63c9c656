//! imgalg-test - Regression test framework for imgalg
//!
//! Every `tests/*_reg.rs` file in the workspace follows the same shape:
//! create a [`RegParams`], run a numbered sequence of checks, and assert
//! on [`RegParams::cleanup`] at the end. Checks record failures instead
//! of panicking, so one run reports every broken check.
//!
//! # Usage
//!
//! ```
//! use imgalg_test::{RegParams, ramp_grid};
//!
//! let grid = ramp_grid::<i32>(4, 4).unwrap();
//! let mut rp = RegParams::new("ramp");
//! rp.compare_values(136.0, grid.sum() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" (default) or "display"

mod error;
mod params;

use imgalg_core::{Grid, Sample};

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

fn fixture<T>(name: &str, result: imgalg_core::Result<T>) -> TestResult<T> {
    result.map_err(|source| TestError::Fixture {
        name: name.to_string(),
        source,
    })
}

/// Grid whose samples count `1, 2, ..., W*H` in row-major order
///
/// The 4x4 ramp is the standard convolution fixture:
///
/// ```text
///  1  2  3  4
///  5  6  7  8
///  9 10 11 12
/// 13 14 15 16
/// ```
pub fn ramp_grid<T: Sample>(width: u32, height: u32) -> TestResult<Grid<T>> {
    fixture(
        "ramp",
        Grid::from_fn(width, height, |x, y| {
            T::from_f64_lossy((y as f64) * (width as f64) + (x as f64) + 1.0)
        }),
    )
}

/// Grid alternating `low` and `high` like a checkerboard, `low` at (0, 0)
pub fn checker_grid<T: Sample>(width: u32, height: u32, low: T, high: T) -> TestResult<Grid<T>> {
    fixture(
        "checker",
        Grid::from_fn(width, height, |x, y| if (x + y) % 2 == 0 { low } else { high }),
    )
}

/// Grid with a single `value` at (x, y) and zero elsewhere
pub fn impulse_grid<T: Sample>(width: u32, height: u32, x: u32, y: u32, value: T) -> TestResult<Grid<T>> {
    fixture(
        "impulse",
        Grid::from_fn(width, height, |px, py| {
            if px == x && py == y { value } else { T::zero() }
        }),
    )
}
