//! Kernels whose weights are computed on access

use imgalg_core::Sample;

use super::{DenseKernel, Kernel, Point, Site};
use crate::{FilterError, FilterResult};

/// Weight rule: tap site and bound parameter in, weight out
pub type Generator<T> = fn(&Site, T) -> T;

/// A kernel that evaluates `generator(site, param)` for every tap
///
/// Nothing is materialised, so the extent can change between passes
/// without reallocation.
///
/// # Examples
///
/// ```
/// use imgalg_filter::{Kernel, Point, ProceduralKernel, Site};
///
/// // Weight falls off with the squared distance from the centre.
/// fn falloff(site: &Site, scale: f64) -> f64 {
///     scale / (1.0 + (site.dx * site.dx + site.dy * site.dy) as f64)
/// }
///
/// let kernel = ProceduralKernel::new(3, 3, falloff, 2.0).unwrap();
/// assert_eq!(kernel.weight(Point::new(4, 4), 0, 0).unwrap(), 2.0);
/// assert_eq!(kernel.weight(Point::new(4, 4), 1, 0).unwrap(), 1.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ProceduralKernel<T> {
    width: u32,
    height: u32,
    generator: Generator<T>,
    param: T,
}

impl<T: Sample> ProceduralKernel<T> {
    /// Create a procedural kernel.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidKernel` for a zero extent.
    pub fn new(width: u32, height: u32, generator: Generator<T>, param: T) -> FilterResult<Self> {
        check_positive("width", width)?;
        check_positive("height", height)?;
        Ok(ProceduralKernel {
            width,
            height,
            generator,
            param,
        })
    }

    /// Change the width. The kernel is unchanged on error.
    pub fn set_width(&mut self, width: u32) -> FilterResult<()> {
        check_positive("width", width)?;
        self.width = width;
        Ok(())
    }

    /// Change the height. The kernel is unchanged on error.
    pub fn set_height(&mut self, height: u32) -> FilterResult<()> {
        check_positive("height", height)?;
        self.height = height;
        Ok(())
    }

    /// Swap in a new generator and parameter.
    pub fn rebind(&mut self, generator: Generator<T>, param: T) {
        self.generator = generator;
        self.param = param;
    }

    /// Change only the bound parameter.
    pub fn set_param(&mut self, param: T) {
        self.param = param;
    }

    /// The bound parameter
    pub fn param(&self) -> T {
        self.param
    }

    /// Evaluate every tap around `center` into a dense kernel.
    pub fn materialize(&self, center: Point) -> FilterResult<DenseKernel<T>> {
        let mut dense = DenseKernel::new(self.width, self.height, T::zero())?;
        let footprint = self.footprint();
        for (slot, (dx, dy)) in dense.data_mut().iter_mut().zip(footprint.offsets()) {
            *slot = self.weight_unchecked(&center.site(dx, dy));
        }
        Ok(dense)
    }
}

fn check_positive(what: &str, value: u32) -> FilterResult<()> {
    if value == 0 {
        return Err(FilterError::InvalidKernel(format!(
            "procedural kernel {} must be positive",
            what
        )));
    }
    Ok(())
}

impl<T: Sample> Kernel<T> for ProceduralKernel<T> {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn weight_unchecked(&self, site: &Site) -> T {
        (self.generator)(site, self.param)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(site: &Site, _param: i64) -> i64 {
        site.x
    }

    fn scaled_offset(site: &Site, param: i64) -> i64 {
        param * (site.dx + 10 * site.dy)
    }

    #[test]
    fn test_generator_sees_absolute_coordinates() {
        let k = ProceduralKernel::new(3, 3, column, 0).unwrap();
        assert_eq!(k.weight(Point::new(7, 2), -1, 0).unwrap(), 6);
        assert_eq!(k.weight(Point::new(7, 2), 1, 1).unwrap(), 8);
        assert!(k.weight(Point::new(7, 2), 2, 0).is_err());
    }

    #[test]
    fn test_resize_between_passes() {
        let mut k = ProceduralKernel::new(1, 1, scaled_offset, 1).unwrap();
        assert!(k.verify(1, 0).is_err());

        k.set_width(3).unwrap();
        k.set_height(5).unwrap();
        assert_eq!(k.size(), 15);
        assert_eq!(k.weight(Point::default(), 1, 2).unwrap(), 21);

        assert!(k.set_width(0).is_err());
        assert_eq!(k.width(), 3);
    }

    #[test]
    fn test_rebind() {
        let mut k = ProceduralKernel::new(3, 3, scaled_offset, 2).unwrap();
        assert_eq!(k.weight(Point::default(), 1, 0).unwrap(), 2);
        k.set_param(5);
        assert_eq!(k.param(), 5);
        assert_eq!(k.weight(Point::default(), 1, 0).unwrap(), 5);
        k.rebind(column, 0);
        assert_eq!(k.weight(Point::new(3, 3), 1, 0).unwrap(), 4);
    }

    #[test]
    fn test_weight_at_index_follows_storage_order() {
        let k = ProceduralKernel::new(3, 3, scaled_offset, 1).unwrap();
        assert_eq!(k.weight_at_index(Point::default(), 0).unwrap(), -11);
        assert_eq!(k.weight_at_index(Point::default(), 8).unwrap(), 11);
        assert!(k.weight_at_index(Point::default(), 9).is_err());
    }

    #[test]
    fn test_materialize() {
        let k = ProceduralKernel::new(3, 1, column, 0).unwrap();
        let dense = k.materialize(Point::new(10, 0)).unwrap();
        assert_eq!(dense.data(), &[9, 10, 11]);
    }
}
