//! Order-statistic filters
//!
//! OWA (order-weighted averaging) sorts the samples under the footprint and
//! takes a weighted sum by rank: `Σ sorted[i] * weight[i]`, with `weight`
//! read in kernel storage order. Rank weights `[1, 0, ..., 0]` give a
//! minimum filter, `[0, ..., 0, 1]` a maximum filter, and uniform weights
//! summing to one the mean.
//!
//! SOWA (structured OWA) adds a same-shaped offset kernel to the samples
//! before sorting, which turns min/max ranks into soft erosion and
//! dilation with a signed structuring element.
//!
//! Unlike the plain convolution passes, a tap that misses under
//! `EdgePolicy::Skip` still occupies its slot with the value zero and
//! takes part in the sort.

use imgalg_core::{Grid, Sample};
use log::debug;

use crate::FilterResult;
use crate::convolve::convolve_with;
use crate::cursor::Cursor;
use crate::kernel::Kernel;

/// OWA filter holding its rank weights
#[derive(Clone, Copy)]
pub struct OwaFilter<'k, T: Sample> {
    weights: &'k dyn Kernel<T>,
}

impl<'k, T: Sample> OwaFilter<'k, T> {
    /// Filter with the given rank weights
    pub fn new(weights: &'k dyn Kernel<T>) -> Self {
        OwaFilter { weights }
    }

    /// Rank weights
    pub fn weights(&self) -> &'k dyn Kernel<T> {
        self.weights
    }

    /// Filter `grid` into a new grid of the same shape.
    pub fn apply(&self, grid: &Grid<T>) -> FilterResult<Grid<T>> {
        let mut cursor = Cursor::owa(grid, self.weights);
        convolve_with(grid, &mut cursor)
    }
}

/// SOWA filter holding rank weights and per-tap offsets of the same shape
#[derive(Clone, Copy)]
pub struct SowaFilter<'k, T: Sample> {
    weights: &'k dyn Kernel<T>,
    offsets: &'k dyn Kernel<T>,
}

impl<'k, T: Sample> SowaFilter<'k, T> {
    /// Bind rank weights and offsets.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::DimensionMismatch` if the two kernels differ
    /// in width or height.
    pub fn new(weights: &'k dyn Kernel<T>, offsets: &'k dyn Kernel<T>) -> FilterResult<Self> {
        let expected = (weights.width(), weights.height());
        let actual = (offsets.width(), offsets.height());
        if expected != actual {
            return Err(crate::FilterError::DimensionMismatch { expected, actual });
        }
        debug!(
            "sowa filter bound: {}x{} weights and offsets",
            expected.0, expected.1
        );
        Ok(SowaFilter { weights, offsets })
    }

    /// Rank weights
    pub fn weights(&self) -> &'k dyn Kernel<T> {
        self.weights
    }

    /// Per-tap offsets
    pub fn offsets(&self) -> &'k dyn Kernel<T> {
        self.offsets
    }

    /// Filter `grid` into a new grid of the same shape.
    pub fn apply(&self, grid: &Grid<T>) -> FilterResult<Grid<T>> {
        let mut cursor = Cursor::sowa(grid, self.weights, self.offsets)?;
        convolve_with(grid, &mut cursor)
    }
}

/// One-shot OWA filter
pub fn owa_filter<T: Sample>(grid: &Grid<T>, weights: &dyn Kernel<T>) -> FilterResult<Grid<T>> {
    OwaFilter::new(weights).apply(grid)
}

/// One-shot SOWA filter
///
/// # Errors
///
/// Returns `FilterError::DimensionMismatch` if `weights` and `offsets`
/// differ in shape.
pub fn sowa_filter<T: Sample>(
    grid: &Grid<T>,
    weights: &dyn Kernel<T>,
    offsets: &dyn Kernel<T>,
) -> FilterResult<Grid<T>> {
    SowaFilter::new(weights, offsets)?.apply(grid)
}
