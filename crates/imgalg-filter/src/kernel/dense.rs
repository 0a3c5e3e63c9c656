//! Kernels backed by an explicit weight array

use imgalg_core::Sample;
use num_traits::Signed;

use super::{Footprint, Kernel, Site};
use crate::{FilterError, FilterResult};

/// A kernel with `width * height` explicit weights in row-major order
///
/// Storage index `i` holds the weight at footprint offset
/// `Footprint::offset_of(i)`, so index 0 is the upper-left tap.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseKernel<T> {
    width: u32,
    height: u32,
    data: Vec<T>,
}

fn check_extent(width: u32, height: u32) -> FilterResult<()> {
    if width == 0 || height == 0 {
        return Err(FilterError::InvalidKernel(format!(
            "kernel dimensions must be positive, got {}x{}",
            width, height
        )));
    }
    Ok(())
}

/// `width * height` weights set to `value`, without aborting on a huge
/// extent.
fn allocate_weights<T: Clone>(width: u32, height: u32, value: T) -> FilterResult<Vec<T>> {
    check_extent(width, height)?;
    let too_large = || {
        FilterError::InvalidKernel(format!(
            "cannot allocate a {}x{} kernel",
            width, height
        ))
    };
    let len = (width as usize).checked_mul(height as usize).ok_or_else(too_large)?;
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|_| too_large())?;
    data.resize(len, value);
    Ok(data)
}

impl<T: Sample> DenseKernel<T> {
    /// Create a kernel with every weight set to `value`.
    pub fn new(width: u32, height: u32, value: T) -> FilterResult<Self> {
        Ok(DenseKernel {
            width,
            height,
            data: allocate_weights(width, height, value)?,
        })
    }

    /// Create a kernel from row-major weights.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidKernel` for a zero extent or when
    /// `data.len() != width * height`.
    pub fn from_slice(width: u32, height: u32, data: &[T]) -> FilterResult<Self> {
        check_extent(width, height)?;
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(FilterError::InvalidKernel(format!(
                "data length {} doesn't match {}x{} = {}",
                data.len(),
                width,
                height,
                expected
            )));
        }
        Ok(DenseKernel {
            width,
            height,
            data: data.to_vec(),
        })
    }

    /// 3x3 all-ones neighbourhood.
    pub fn moore() -> Self {
        DenseKernel {
            width: 3,
            height: 3,
            data: vec![T::one(); 9],
        }
    }

    /// 3x3 cross: the centre and its four edge neighbours.
    pub fn von_neumann() -> Self {
        let (o, i) = (T::zero(), T::one());
        DenseKernel {
            width: 3,
            height: 3,
            data: vec![o, i, o, i, i, i, o, i, o],
        }
    }

    /// Get the weight at a flat storage index.
    pub fn get_index(&self, index: usize) -> FilterResult<T> {
        self.data
            .get(index)
            .copied()
            .ok_or(FilterError::KernelIndexOutOfRange {
                index,
                size: self.data.len(),
            })
    }

    /// Set the weight at a flat storage index.
    pub fn set_index(&mut self, index: usize, value: T) -> FilterResult<()> {
        let size = self.data.len();
        let slot = self
            .data
            .get_mut(index)
            .ok_or(FilterError::KernelIndexOutOfRange { index, size })?;
        *slot = value;
        Ok(())
    }

    /// Set the weight at offset (dx, dy) from the centre.
    pub fn set(&mut self, dx: i64, dy: i64, value: T) -> FilterResult<()> {
        self.verify(dx, dy)?;
        let index = self.index_unchecked(dx, dy);
        self.data[index] = value;
        Ok(())
    }

    #[inline]
    fn index_unchecked(&self, dx: i64, dy: i64) -> usize {
        let fp = Footprint::new(self.width, self.height);
        ((dy + fp.neg_y) * self.width as i64 + (dx + fp.neg_x)) as usize
    }

    /// Weights in storage order
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable weights in storage order
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Set every weight to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Replace every weight from a row-major slice of the same size.
    ///
    /// The kernel is unchanged on error.
    pub fn replace(&mut self, values: &[T]) -> FilterResult<()> {
        if values.len() != self.data.len() {
            return Err(FilterError::InvalidKernel(format!(
                "replacement has {} weights, kernel {}x{} holds {}",
                values.len(),
                self.width,
                self.height,
                self.data.len()
            )));
        }
        self.data.copy_from_slice(values);
        Ok(())
    }

    /// Sum of all weights
    pub fn sum(&self) -> T {
        self.data.iter().fold(T::zero(), |acc, &w| acc.add_wrapped(w))
    }

    /// Rescale the weights so they sum to one.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidKernel` when the weights sum to zero.
    pub fn normalize(&mut self) -> FilterResult<()> {
        let sum = self.sum();
        if sum == T::zero() {
            return Err(FilterError::InvalidKernel(
                "cannot normalize a kernel whose weights sum to zero".to_string(),
            ));
        }
        for w in self.data.iter_mut() {
            *w = w.div_or_zero(sum);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Compound assignment
    // ------------------------------------------------------------------

    /// Add a constant to every weight
    pub fn add_constant(&mut self, value: T) {
        self.data.iter_mut().for_each(|w| *w = w.add_wrapped(value));
    }

    /// Subtract a constant from every weight
    pub fn sub_constant(&mut self, value: T) {
        self.data.iter_mut().for_each(|w| *w = w.sub_wrapped(value));
    }

    /// Multiply every weight by a constant
    pub fn mul_constant(&mut self, value: T) {
        self.data.iter_mut().for_each(|w| *w = w.mul_wrapped(value));
    }

    /// Divide every weight by a constant; a zero divisor zeroes the kernel
    pub fn div_constant(&mut self, value: T) {
        self.data.iter_mut().for_each(|w| *w = w.div_or_zero(value));
    }

    fn zip_in_place<F>(&mut self, other: &DenseKernel<T>, op: F) -> FilterResult<()>
    where
        F: Fn(T, T) -> T,
    {
        if self.width != other.width || self.height != other.height {
            return Err(FilterError::DimensionMismatch {
                expected: (self.width, self.height),
                actual: (other.width, other.height),
            });
        }
        for (a, &b) in self.data.iter_mut().zip(other.data.iter()) {
            *a = op(*a, b);
        }
        Ok(())
    }

    /// Add another kernel's weights elementwise
    pub fn add_weights(&mut self, other: &DenseKernel<T>) -> FilterResult<()> {
        self.zip_in_place(other, Sample::add_wrapped)
    }

    /// Subtract another kernel's weights elementwise
    pub fn sub_weights(&mut self, other: &DenseKernel<T>) -> FilterResult<()> {
        self.zip_in_place(other, Sample::sub_wrapped)
    }

    /// Multiply by another kernel's weights elementwise
    pub fn mul_weights(&mut self, other: &DenseKernel<T>) -> FilterResult<()> {
        self.zip_in_place(other, Sample::mul_wrapped)
    }

    /// Divide by another kernel's weights elementwise (zero where zero)
    pub fn div_weights(&mut self, other: &DenseKernel<T>) -> FilterResult<()> {
        self.zip_in_place(other, Sample::div_or_zero)
    }
}

impl<T: Sample + Signed> DenseKernel<T> {
    /// 3x3 discrete Laplacian: `-4` at the centre, `1` on the cross.
    pub fn laplacian() -> Self {
        let (o, i) = (T::zero(), T::one());
        let four = i + i + i + i;
        DenseKernel {
            width: 3,
            height: 3,
            data: vec![o, i, o, i, -four, i, o, i, o],
        }
    }
}

impl<T: Sample> Kernel<T> for DenseKernel<T> {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn size(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn weight_unchecked(&self, site: &Site) -> T {
        self.data[self.index_unchecked(site.dx, site.dy)]
    }

    fn weight_at_index(&self, _center: super::Point, index: usize) -> FilterResult<T> {
        self.get_index(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::Point;

    #[test]
    fn test_kernel_creation() {
        let k = DenseKernel::new(3, 2, 0.5f32).unwrap();
        assert_eq!(k.width(), 3);
        assert_eq!(k.height(), 2);
        assert_eq!(k.size(), 6);
        assert!(k.data().iter().all(|&w| w == 0.5));

        assert!(DenseKernel::new(0, 3, 1.0f32).is_err());
        assert!(DenseKernel::from_slice(2, 2, &[1, 2, 3]).is_err());
    }

    #[test]
    fn test_huge_extent_is_an_error() {
        assert!(matches!(
            DenseKernel::new(u32::MAX, u32::MAX, 0u8),
            Err(FilterError::InvalidKernel(_))
        ));
        assert!(DenseKernel::new(0, 3, 1.0f64).is_err());
    }

    #[test]
    fn test_integer_weights_wrap() {
        let mut k = DenseKernel::from_slice(2, 1, &[200u8, 100]).unwrap();
        assert_eq!(k.sum(), 44);
        k.add_constant(100);
        assert_eq!(k.data(), &[44, 200]);
        k.mul_weights(&DenseKernel::new(2, 1, 2u8).unwrap()).unwrap();
        assert_eq!(k.data(), &[88, 144]);
        k.sub_constant(100);
        assert_eq!(k.data(), &[244, 44]);
    }

    #[test]
    fn test_offset_access() {
        let k = DenseKernel::from_slice(3, 3, &[1, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap();
        let c = Point::new(0, 0);
        assert_eq!(k.weight(c, 0, 0).unwrap(), 5);
        assert_eq!(k.weight(c, -1, -1).unwrap(), 1);
        assert_eq!(k.weight(c, 1, 0).unwrap(), 6);
        assert!(k.weight(c, -2, 0).is_err());
        assert!(k.verify(0, 2).is_err());
    }

    #[test]
    fn test_even_kernel_access() {
        // 2x2: footprint offsets are {0, 1} on both axes.
        let k = DenseKernel::from_slice(2, 2, &[1, 2, 3, 4]).unwrap();
        let c = Point::new(5, 5);
        assert_eq!(k.weight(c, 0, 0).unwrap(), 1);
        assert_eq!(k.weight(c, 1, 1).unwrap(), 4);
        assert!(k.weight(c, -1, 0).is_err());
    }

    #[test]
    fn test_index_access() {
        let mut k = DenseKernel::new(2, 2, 0i32).unwrap();
        k.set_index(3, 7).unwrap();
        assert_eq!(k.get_index(3).unwrap(), 7);
        assert_eq!(k.weight_at_index(Point::default(), 3).unwrap(), 7);
        assert_eq!(
            k.get_index(4),
            Err(FilterError::KernelIndexOutOfRange { index: 4, size: 4 })
        );

        k.set(0, 1, 9).unwrap();
        assert_eq!(k.get_index(2).unwrap(), 9);
        assert!(k.set(-1, 0, 1).is_err());
    }

    #[test]
    fn test_predefined() {
        let m = DenseKernel::<i32>::moore();
        assert_eq!(m.sum(), 9);
        let v = DenseKernel::<i32>::von_neumann();
        assert_eq!(v.data(), &[0, 1, 0, 1, 1, 1, 0, 1, 0]);
        let l = DenseKernel::<f64>::laplacian();
        assert_eq!(l.sum(), 0.0);
        assert_eq!(l.weight(Point::default(), 0, 0).unwrap(), -4.0);
    }

    #[test]
    fn test_normalize() {
        let mut k = DenseKernel::new(2, 2, 3.0f64).unwrap();
        k.normalize().unwrap();
        assert!(k.data().iter().all(|&w| (w - 0.25).abs() < 1e-12));

        let mut zero = DenseKernel::<f64>::laplacian();
        assert!(zero.normalize().is_err());
        assert_eq!(zero, DenseKernel::laplacian());
    }

    #[test]
    fn test_compound_assignment() {
        let mut k = DenseKernel::from_slice(2, 1, &[2, 4]).unwrap();
        k.add_constant(2);
        assert_eq!(k.data(), &[4, 6]);
        k.mul_constant(3);
        assert_eq!(k.data(), &[12, 18]);
        k.div_constant(6);
        assert_eq!(k.data(), &[2, 3]);
        k.sub_constant(1);
        assert_eq!(k.data(), &[1, 2]);

        let other = DenseKernel::from_slice(2, 1, &[5, 0]).unwrap();
        k.add_weights(&other).unwrap();
        assert_eq!(k.data(), &[6, 2]);
        k.mul_weights(&other).unwrap();
        assert_eq!(k.data(), &[30, 0]);
        k.div_weights(&other).unwrap();
        assert_eq!(k.data(), &[6, 0]);
        k.sub_weights(&other).unwrap();
        assert_eq!(k.data(), &[1, 0]);

        let wrong = DenseKernel::new(1, 2, 1).unwrap();
        assert!(matches!(
            k.add_weights(&wrong),
            Err(FilterError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_fill_and_replace() {
        let mut k = DenseKernel::new(2, 2, 0u8).unwrap();
        k.fill(3);
        assert_eq!(k.sum(), 12);
        k.replace(&[1, 2, 3, 4]).unwrap();
        assert_eq!(k.data(), &[1, 2, 3, 4]);
        assert!(k.replace(&[1]).is_err());
        assert_eq!(k.data(), &[1, 2, 3, 4]);
    }
}
