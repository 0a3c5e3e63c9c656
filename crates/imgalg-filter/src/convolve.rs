//! Convolution passes
//!
//! Each function drives a [`Cursor`] over the whole grid and writes its
//! values into a new grid of the same shape and edge policy.
//!
//! ```
//! use imgalg_core::{EdgePolicy, Grid};
//! use imgalg_filter::{DenseKernel, convolve_linear};
//!
//! let mut grid = Grid::from_fn(4, 4, |x, y| (y * 4 + x + 1) as i32).unwrap();
//! grid.set_edge_policy(EdgePolicy::Zero);
//!
//! let out = convolve_linear(&grid, &DenseKernel::moore()).unwrap();
//! assert_eq!(out.get_pixel(1, 1).unwrap(), 54);
//! ```

use imgalg_core::{Grid, Sample};
use log::{debug, warn};

use crate::FilterResult;
use crate::cursor::{Cursor, Strategy};
use crate::kernel::Kernel;
use crate::reduce::{MergeFn, ReduceFn};

/// Convolve `grid` with `kernel` under any strategy.
///
/// # Errors
///
/// Returns `FilterError::DimensionMismatch` for a `Sowa` strategy whose
/// offsets differ in shape from `kernel`.
pub fn convolve<'a, T: Sample>(
    grid: &'a Grid<T>,
    kernel: &'a dyn Kernel<T>,
    strategy: Strategy<'a, T>,
) -> FilterResult<Grid<T>> {
    let mut cursor = Cursor::new(grid, kernel, strategy)?;
    run(&mut cursor)
}

/// Linear convolution, `Σ sample * weight` per position
pub fn convolve_linear<T: Sample>(grid: &Grid<T>, kernel: &dyn Kernel<T>) -> FilterResult<Grid<T>> {
    run(&mut Cursor::linear(grid, kernel))
}

/// Multiplicative-max convolution, `max(sample * weight)` per position
pub fn convolve_mul_max<T: Sample>(grid: &Grid<T>, kernel: &dyn Kernel<T>) -> FilterResult<Grid<T>> {
    run(&mut Cursor::mul_max(grid, kernel))
}

/// Multiplicative-min convolution, `min(sample * weight)` per position
pub fn convolve_mul_min<T: Sample>(grid: &Grid<T>, kernel: &dyn Kernel<T>) -> FilterResult<Grid<T>> {
    run(&mut Cursor::mul_min(grid, kernel))
}

/// Generic convolution, `reduce([merge(sample, weight)])` per position
pub fn convolve_generic<T: Sample>(
    grid: &Grid<T>,
    kernel: &dyn Kernel<T>,
    merge: MergeFn<T>,
    reduce: ReduceFn<T>,
) -> FilterResult<Grid<T>> {
    run(&mut Cursor::generic(grid, kernel, merge, reduce))
}

/// Run a prepared cursor over `grid`.
///
/// The cursor is rebound to `grid` first, so it starts at the origin
/// whatever grid or position it held before. It is left at the end
/// position.
///
/// # Errors
///
/// Returns `FilterError::UnboundKernel` if the cursor has no kernel.
pub fn convolve_with<'a, T: Sample>(
    grid: &'a Grid<T>,
    cursor: &mut Cursor<'a, T>,
) -> FilterResult<Grid<T>> {
    cursor.rebind(grid);
    run(cursor)
}

fn run<T: Sample>(cursor: &mut Cursor<'_, T>) -> FilterResult<Grid<T>> {
    let grid = cursor.grid();
    let (width, height) = grid.dimensions();

    match cursor.kernel() {
        Some(kernel) => {
            debug!(
                "{:?} convolution: {}x{} grid, {}x{} kernel, edge policy {}",
                cursor.strategy(),
                width,
                height,
                kernel.width(),
                kernel.height(),
                grid.edge_policy()
            );
            if kernel.width() > width || kernel.height() > height {
                warn!(
                    "{}x{} kernel is larger than the {}x{} grid it is applied to",
                    kernel.width(),
                    kernel.height(),
                    width,
                    height
                );
            }
        }
        None => debug!("{:?} convolution with no kernel bound", cursor.strategy()),
    }

    let mut out = grid.create_template()?;
    for (slot, value) in out.data_mut().iter_mut().zip(cursor.by_ref()) {
        *slot = value?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FilterError;
    use crate::kernel::DenseKernel;
    use crate::reduce;
    use imgalg_core::EdgePolicy;

    fn ramp(width: u32, height: u32, policy: EdgePolicy) -> Grid<i32> {
        let mut grid = Grid::from_fn(width, height, |x, y| (y * width + x + 1) as i32).unwrap();
        grid.set_edge_policy(policy);
        grid
    }

    #[test]
    fn test_moore_zero_policy() {
        let grid = ramp(4, 4, EdgePolicy::Zero);
        let out = convolve_linear(&grid, &DenseKernel::moore()).unwrap();
        assert_eq!(out.get_pixel(1, 1).unwrap(), 54);
        // Corner: 1 + 2 + 5 + 6
        assert_eq!(out.get_pixel(0, 0).unwrap(), 14);
        assert_eq!(out.edge_policy(), EdgePolicy::Zero);
    }

    #[test]
    fn test_moore_clamp_policy() {
        let grid = ramp(4, 4, EdgePolicy::Clamp);
        let out = convolve_linear(&grid, &DenseKernel::moore()).unwrap();
        // Corner reads 1 1 2 / 1 1 2 / 5 5 6
        assert_eq!(out.get_pixel(0, 0).unwrap(), 24);
    }

    #[test]
    fn test_unit_kernel_is_scalar_product() {
        let grid = ramp(3, 2, EdgePolicy::Skip);
        let k = DenseKernel::new(1, 1, 3).unwrap();
        let out = convolve_linear(&grid, &k).unwrap();
        assert_eq!(out, grid.mul_scalar(3));
    }

    #[test]
    fn test_specializations_match_generic() {
        let k = DenseKernel::from_slice(3, 3, &[1, -2, 1, 0, 3, 0, 2, -1, 1]).unwrap();
        for policy in EdgePolicy::ALL {
            let grid = ramp(5, 4, policy);
            let pairs: [(FilterResult<Grid<i32>>, ReduceFn<i32>); 3] = [
                (convolve_linear(&grid, &k), reduce::sum),
                (convolve_mul_max(&grid, &k), reduce::max),
                (convolve_mul_min(&grid, &k), reduce::min),
            ];
            for (fast, red) in pairs {
                let slow = convolve_generic(&grid, &k, reduce::multiply, red).unwrap();
                assert_eq!(fast.unwrap(), slow, "policy {policy}");
            }
        }
    }

    #[test]
    fn test_convolve_with_rebinds() {
        let a = ramp(3, 3, EdgePolicy::Clamp);
        let b = ramp(2, 2, EdgePolicy::Clamp);
        let k = DenseKernel::new(1, 1, 2).unwrap();
        let mut cursor = Cursor::linear(&a, &k);
        cursor.advance();

        let out = convolve_with(&b, &mut cursor).unwrap();
        assert_eq!(out.data(), &[2, 4, 6, 8]);
        assert!(cursor.is_end());

        let again = convolve_with(&a, &mut cursor).unwrap();
        assert_eq!(again, a.mul_scalar(2));
    }

    #[test]
    fn test_convolve_with_unbound_fails() {
        let grid = ramp(2, 2, EdgePolicy::Clamp);
        let mut cursor = Cursor::unbound(&grid, Strategy::Linear);
        assert_eq!(
            convolve_with(&grid, &mut cursor),
            Err(FilterError::UnboundKernel)
        );
    }

    #[test]
    fn test_oversized_kernel() {
        let grid = ramp(2, 1, EdgePolicy::Zero);
        let k = DenseKernel::new(5, 5, 1).unwrap();
        let out = convolve_linear(&grid, &k).unwrap();
        assert_eq!(out.data(), &[3, 3]);
    }

    #[test]
    fn test_empty_grid() {
        let grid = Grid::<f32>::new(0, 0).unwrap();
        let out = convolve_linear(&grid, &DenseKernel::moore()).unwrap();
        assert!(out.is_empty());
    }
}
