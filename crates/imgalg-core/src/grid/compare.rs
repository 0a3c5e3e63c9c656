//! Characteristic functions and equality
//!
//! A characteristic grid holds `1` where a comparison holds and `0`
//! elsewhere, in the grid's own sample type.

use super::Grid;
use crate::error::Result;
use crate::sample::Sample;

/// Sample comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// `a < b`
    Lt,
    /// `a <= b`
    Le,
    /// `a > b`
    Gt,
    /// `a >= b`
    Ge,
    /// `a == b`
    Eq,
    /// `a != b`
    Ne,
}

impl Comparison {
    /// Evaluate the comparison for one pair of samples.
    #[inline]
    pub fn holds<T: PartialOrd>(self, a: T, b: T) -> bool {
        match self {
            Comparison::Lt => a < b,
            Comparison::Le => a <= b,
            Comparison::Gt => a > b,
            Comparison::Ge => a >= b,
            Comparison::Eq => a == b,
            Comparison::Ne => a != b,
        }
    }
}

#[inline]
fn indicator<T: Sample>(flag: bool) -> T {
    if flag { T::one() } else { T::zero() }
}

impl<T: Sample> Grid<T> {
    /// Pixelwise characteristic function against another grid.
    ///
    /// # Errors
    ///
    /// Returns `Error::DimensionMismatch` if the shapes differ.
    pub fn characteristic(&self, other: &Grid<T>, cmp: Comparison) -> Result<Grid<T>> {
        self.zip_map(other, |a, b| indicator(cmp.holds(a, b)))
    }

    /// Pixelwise characteristic function against a constant.
    ///
    /// # Examples
    ///
    /// ```
    /// use imgalg_core::{Comparison, Grid};
    ///
    /// let grid = Grid::from_data(4, 1, vec![1, 5, 3, 7]).unwrap();
    /// let mask = grid.characteristic_scalar(4, Comparison::Gt);
    /// assert_eq!(mask.data(), &[0, 1, 0, 1]);
    /// ```
    pub fn characteristic_scalar(&self, value: T, cmp: Comparison) -> Grid<T> {
        self.map(|a| indicator(cmp.holds(a, value)))
    }

    /// Shape and samples identical. The edge policy is not compared.
    pub fn equal_to(&self, other: &Grid<T>) -> bool {
        self.dimensions() == other.dimensions() && self.data == other.data
    }

    /// True when every sample equals `value` (vacuously true when empty).
    pub fn all_equal(&self, value: T) -> bool {
        self.data.iter().all(|&v| v == value)
    }
}

impl<T: Sample> PartialEq for Grid<T> {
    fn eq(&self, other: &Self) -> bool {
        self.equal_to(other)
    }
}
