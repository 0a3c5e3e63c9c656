//! Pixelwise arithmetic on grids
//!
//! Grid-with-grid operations require identical shapes and return
//! `Error::DimensionMismatch` otherwise. Grid-with-scalar operations
//! cannot fail. Division by a zero sample or scalar yields zero, and
//! integer results wrap on overflow (see [`Sample`]).
//!
//! `join` is the pixelwise maximum and `meet` the pixelwise minimum; the
//! `|` and `&` operators map onto them.

use std::ops::{Add, BitAnd, BitOr, Div, Mul, Neg, Sub};

use super::Grid;
use crate::error::Result;
use crate::sample::Sample;

impl<T: Sample> Grid<T> {
    fn binary_in_place<F>(&mut self, other: &Grid<T>, op: F) -> Result<()>
    where
        F: Fn(T, T) -> T,
    {
        self.check_same_size(other)?;
        for (a, &b) in self.data.iter_mut().zip(other.data.iter()) {
            *a = op(*a, b);
        }
        Ok(())
    }

    fn scalar_in_place<F>(&mut self, op: F)
    where
        F: Fn(T) -> T,
    {
        for v in self.data.iter_mut() {
            *v = op(*v);
        }
    }

    // ========================================================================
    // Grid with grid, new result
    // ========================================================================

    /// Pixelwise sum `self + other`.
    pub fn add(&self, other: &Grid<T>) -> Result<Grid<T>> {
        self.zip_map(other, Sample::add_wrapped)
    }

    /// Pixelwise difference `self - other`.
    pub fn sub(&self, other: &Grid<T>) -> Result<Grid<T>> {
        self.zip_map(other, Sample::sub_wrapped)
    }

    /// Pixelwise product `self * other`.
    pub fn mul(&self, other: &Grid<T>) -> Result<Grid<T>> {
        self.zip_map(other, Sample::mul_wrapped)
    }

    /// Pixelwise quotient `self / other`, zero where `other` is zero.
    pub fn div(&self, other: &Grid<T>) -> Result<Grid<T>> {
        self.zip_map(other, Sample::div_or_zero)
    }

    /// Pixelwise maximum.
    pub fn join(&self, other: &Grid<T>) -> Result<Grid<T>> {
        self.zip_map(other, Sample::join)
    }

    /// Pixelwise minimum.
    pub fn meet(&self, other: &Grid<T>) -> Result<Grid<T>> {
        self.zip_map(other, Sample::meet)
    }

    // ========================================================================
    // Grid with grid, in place
    // ========================================================================

    /// `self += other`, pixelwise.
    pub fn add_in_place(&mut self, other: &Grid<T>) -> Result<()> {
        self.binary_in_place(other, Sample::add_wrapped)
    }

    /// `self -= other`, pixelwise.
    pub fn sub_in_place(&mut self, other: &Grid<T>) -> Result<()> {
        self.binary_in_place(other, Sample::sub_wrapped)
    }

    /// `self *= other`, pixelwise.
    pub fn mul_in_place(&mut self, other: &Grid<T>) -> Result<()> {
        self.binary_in_place(other, Sample::mul_wrapped)
    }

    /// `self /= other`, pixelwise, zero where `other` is zero.
    pub fn div_in_place(&mut self, other: &Grid<T>) -> Result<()> {
        self.binary_in_place(other, Sample::div_or_zero)
    }

    /// `self |= other`: keep the pixelwise maximum.
    pub fn join_in_place(&mut self, other: &Grid<T>) -> Result<()> {
        self.binary_in_place(other, Sample::join)
    }

    /// `self &= other`: keep the pixelwise minimum.
    pub fn meet_in_place(&mut self, other: &Grid<T>) -> Result<()> {
        self.binary_in_place(other, Sample::meet)
    }

    // ========================================================================
    // Grid with scalar, new result
    // ========================================================================

    /// Add `value` to every sample.
    pub fn add_scalar(&self, value: T) -> Grid<T> {
        self.map(|v| v.add_wrapped(value))
    }

    /// Subtract `value` from every sample.
    pub fn sub_scalar(&self, value: T) -> Grid<T> {
        self.map(|v| v.sub_wrapped(value))
    }

    /// Multiply every sample by `value`.
    pub fn mul_scalar(&self, value: T) -> Grid<T> {
        self.map(|v| v.mul_wrapped(value))
    }

    /// Divide every sample by `value`. A zero divisor gives a zero grid.
    pub fn div_scalar(&self, value: T) -> Grid<T> {
        self.map(|v| v.div_or_zero(value))
    }

    /// Pixelwise maximum against a constant.
    pub fn join_scalar(&self, value: T) -> Grid<T> {
        self.map(|v| v.join(value))
    }

    /// Pixelwise minimum against a constant.
    pub fn meet_scalar(&self, value: T) -> Grid<T> {
        self.map(|v| v.meet(value))
    }

    /// `value - self`, pixelwise.
    pub fn scalar_sub(&self, value: T) -> Grid<T> {
        self.map(|v| value.sub_wrapped(v))
    }

    /// `value / self`, pixelwise, zero where a sample is zero.
    pub fn scalar_div(&self, value: T) -> Grid<T> {
        self.map(|v| value.div_or_zero(v))
    }

    /// `0 - self`, pixelwise.
    pub fn negate(&self) -> Grid<T> {
        self.map(Sample::neg_wrapped)
    }

    // ========================================================================
    // Grid with scalar, in place
    // ========================================================================

    /// Add a constant to all samples in place
    pub fn add_constant(&mut self, value: T) {
        self.scalar_in_place(|v| v.add_wrapped(value));
    }

    /// Subtract a constant from all samples in place
    pub fn sub_constant(&mut self, value: T) {
        self.scalar_in_place(|v| v.sub_wrapped(value));
    }

    /// Multiply all samples by a constant in place
    pub fn mul_constant(&mut self, value: T) {
        self.scalar_in_place(|v| v.mul_wrapped(value));
    }

    /// Divide all samples by a constant in place (zero divisor zeroes)
    pub fn div_constant(&mut self, value: T) {
        self.scalar_in_place(|v| v.div_or_zero(value));
    }

    /// Raise every sample to at least `value`
    pub fn join_constant(&mut self, value: T) {
        self.scalar_in_place(|v| v.join(value));
    }

    /// Lower every sample to at most `value`
    pub fn meet_constant(&mut self, value: T) {
        self.scalar_in_place(|v| v.meet(value));
    }
}

// ============================================================================
// Operator overloads
// ============================================================================

macro_rules! grid_binop {
    ($trait:ident, $method:ident, $inherent:ident) => {
        impl<T: Sample> $trait for &Grid<T> {
            type Output = Result<Grid<T>>;

            fn $method(self, other: Self) -> Self::Output {
                Grid::$inherent(self, other)
            }
        }
    };
}

grid_binop!(Add, add, add);
grid_binop!(Sub, sub, sub);
grid_binop!(Mul, mul, mul);
grid_binop!(Div, div, div);
grid_binop!(BitOr, bitor, join);
grid_binop!(BitAnd, bitand, meet);

impl<T: Sample> Neg for &Grid<T> {
    type Output = Grid<T>;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}
