//! Grid - dense 2-D sample storage
//!
//! `Grid<T>` is a row-major `W x H` array of [`Sample`] values with an
//! [`EdgePolicy`] that governs read-only access outside the domain.
//!
//! See [`arith`] for pixelwise arithmetic and [`compare`] for
//! characteristic functions.
//!
//! # Examples
//!
//! ```
//! use imgalg_core::{EdgePolicy, Grid};
//!
//! let mut grid = Grid::<f64>::new(4, 3).unwrap();
//! grid.set_pixel(1, 2, 0.5).unwrap();
//! assert_eq!(grid.get_pixel(1, 2).unwrap(), 0.5);
//!
//! // Clamp is the default policy: reads past the border saturate.
//! assert_eq!(grid.get_pixel(1, 99).unwrap(), 0.5);
//!
//! grid.set_edge_policy(EdgePolicy::Skip);
//! assert!(grid.get_pixel(1, 99).is_err());
//! ```

pub mod arith;
pub mod compare;

use log::debug;

use crate::edge::{EdgePolicy, Resolved};
use crate::error::{Error, Result};
use crate::sample::Sample;

/// Dense generic image grid
///
/// # Memory Layout
///
/// Data is stored in row-major order with no padding. The sample at
/// (x, y) is at index `y * width + x`.
#[derive(Debug, Clone)]
pub struct Grid<T> {
    /// Width in samples
    width: u32,
    /// Height in samples
    height: u32,
    /// Sample data (row-major, no padding)
    data: Vec<T>,
    /// Out-of-domain read behaviour
    edge_policy: EdgePolicy,
}

/// Allocate `width * height` slots filled with `value`.
fn allocate<T: Clone>(width: u32, height: u32, value: T) -> Result<Vec<T>> {
    let len = (width as usize)
        .checked_mul(height as usize)
        .ok_or(Error::AllocationFailed { width, height })?;
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| Error::AllocationFailed { width, height })?;
    data.resize(len, value);
    Ok(data)
}

impl<T: Sample> Grid<T> {
    /// Create a new grid with every sample set to zero and the default
    /// [`EdgePolicy::Clamp`].
    ///
    /// Zero-sized grids are allowed; they have no in-domain coordinate.
    ///
    /// # Errors
    ///
    /// Returns `Error::AllocationFailed` if storage for `width * height`
    /// samples cannot be obtained.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::with_policy(width, height, EdgePolicy::default())
    }

    /// Create a zero-filled grid with an explicit edge policy.
    pub fn with_policy(width: u32, height: u32, edge_policy: EdgePolicy) -> Result<Self> {
        Ok(Grid {
            width,
            height,
            data: allocate(width, height, T::zero())?,
            edge_policy,
        })
    }

    /// Create a grid with every sample set to `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use imgalg_core::Grid;
    ///
    /// let grid = Grid::new_with_value(10, 10, 7u32).unwrap();
    /// assert_eq!(grid.sum(), 700);
    /// assert!(grid.all_equal(7));
    /// ```
    pub fn new_with_value(width: u32, height: u32, value: T) -> Result<Self> {
        Ok(Grid {
            width,
            height,
            data: allocate(width, height, value)?,
            edge_policy: EdgePolicy::default(),
        })
    }

    /// Create a grid whose sample at (x, y) is `f(x, y)`.
    ///
    /// `f` is called once per sample in row-major order.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> T,
    {
        let mut grid = Self::new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                let idx = (y as usize) * (width as usize) + (x as usize);
                grid.data[idx] = f(x, y);
            }
        }
        Ok(grid)
    }

    /// Create a grid from raw row-major data.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if `data.len() != width * height`.
    pub fn from_data(width: u32, height: u32, data: Vec<T>) -> Result<Self> {
        let expected = (width as usize) * (height as usize);
        if data.len() != expected {
            return Err(Error::InvalidParameter(format!(
                "data length {} doesn't match {}x{} = {}",
                data.len(),
                width,
                height,
                expected
            )));
        }

        Ok(Grid {
            width,
            height,
            data,
            edge_policy: EdgePolicy::default(),
        })
    }

    /// Create a grid of the same shape and edge policy, zeroed.
    ///
    /// This is shape-only construction: no sample values are copied.
    ///
    /// # Errors
    ///
    /// Returns `Error::AllocationFailed` if the storage cannot be obtained.
    pub fn create_template(&self) -> Result<Grid<T>> {
        Self::with_policy(self.width, self.height, self.edge_policy)
    }

    /// Get the grid width
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the grid height
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the grid dimensions as (width, height)
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of samples, `width * height`
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the grid holds no samples
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current edge policy
    #[inline]
    pub fn edge_policy(&self) -> EdgePolicy {
        self.edge_policy
    }

    /// Replace the edge policy. Sample values are not touched.
    #[inline]
    pub fn set_edge_policy(&mut self, edge_policy: EdgePolicy) {
        self.edge_policy = edge_policy;
    }

    /// True when (x, y) lies inside `[0, W) x [0, H)`.
    #[inline]
    pub fn in_domain(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    /// Flat index of an in-domain coordinate.
    #[inline]
    fn index_of(&self, x: i64, y: i64) -> Option<usize> {
        if self.in_domain(x, y) {
            Some((y as usize) * (self.width as usize) + (x as usize))
        } else {
            None
        }
    }

    fn out_of_domain(&self, x: i64, y: i64) -> Error {
        Error::OutOfDomain {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    // ========================================================================
    // Pixel access
    // ========================================================================

    /// Mutable reference to the sample at (x, y).
    ///
    /// The edge policy is not consulted.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfDomain` for any coordinate outside the grid.
    #[inline]
    pub fn pixel_mut(&mut self, x: i64, y: i64) -> Result<&mut T> {
        match self.index_of(x, y) {
            Some(idx) => Ok(&mut self.data[idx]),
            None => Err(self.out_of_domain(x, y)),
        }
    }

    /// Set the sample at (x, y).
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfDomain` for any coordinate outside the grid.
    #[inline]
    pub fn set_pixel(&mut self, x: i64, y: i64, value: T) -> Result<()> {
        *self.pixel_mut(x, y)? = value;
        Ok(())
    }

    /// Read the sample at (x, y) through the edge policy.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfDomain` when (x, y) is outside the grid and the
    /// policy is [`EdgePolicy::Skip`], or the grid is empty.
    #[inline]
    pub fn get_pixel(&self, x: i64, y: i64) -> Result<T> {
        self.fetch(x, y).ok_or_else(|| self.out_of_domain(x, y))
    }

    /// Read the sample at (x, y) through the edge policy, `None` on a miss.
    ///
    /// This is the convolution hot path: a `None` means the tap is skipped.
    #[inline]
    pub fn fetch(&self, x: i64, y: i64) -> Option<T> {
        self.fetch_with(x, y, self.edge_policy)
    }

    #[inline]
    fn fetch_with(&self, x: i64, y: i64, policy: EdgePolicy) -> Option<T> {
        match policy.resolve(x, y, self.width, self.height) {
            Resolved::Index(idx) => Some(self.data[idx]),
            Resolved::Zero => Some(T::zero()),
            Resolved::Miss => None,
        }
    }

    /// Get the sample at (x, y) without the edge policy
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> T {
        let idx = (y as usize) * (self.width as usize) + (x as usize);
        self.data[idx]
    }

    /// Read the sample at a flat row-major index.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfDomain` if `index >= width * height`.
    pub fn pixel_at(&self, index: usize) -> Result<T> {
        self.data
            .get(index)
            .copied()
            .ok_or_else(|| self.flat_out_of_domain(index))
    }

    /// Mutable reference to the sample at a flat row-major index.
    pub fn pixel_at_mut(&mut self, index: usize) -> Result<&mut T> {
        if index >= self.data.len() {
            return Err(self.flat_out_of_domain(index));
        }
        Ok(&mut self.data[index])
    }

    fn flat_out_of_domain(&self, index: usize) -> Error {
        let (x, y) = if self.width == 0 {
            (index as i64, 0)
        } else {
            (
                (index % self.width as usize) as i64,
                (index / self.width as usize) as i64,
            )
        };
        self.out_of_domain(x, y)
    }

    /// Bilinear approximation at a fractional coordinate.
    ///
    /// With `a` the sample at `(floor(x), floor(y))`, `fx`/`fy` the
    /// fractional parts and `ax`, `ay`, `axy` the right, lower and
    /// lower-right neighbours:
    ///
    /// `a + fx*(ax - a) + fy*(ay - a) + fx*fy*(a + axy - ax - ay)`
    ///
    /// All four neighbours are read through the edge policy, so under
    /// [`EdgePolicy::Skip`] a coordinate on the last row or column fails.
    pub fn sample(&self, x: f64, y: f64) -> Result<T> {
        self.bilinear(x, y, self.edge_policy)
    }

    fn bilinear(&self, x: f64, y: f64, policy: EdgePolicy) -> Result<T> {
        let xf = x.floor();
        let yf = y.floor();
        // Saturating casts; the +1 neighbours saturate too, so far-away
        // coordinates resolve through the policy like any other.
        let (x0, y0) = (xf as i64, yf as i64);
        let (x1, y1) = (x0.saturating_add(1), y0.saturating_add(1));

        let read = |px: i64, py: i64| -> Result<f64> {
            self.fetch_with(px, py, policy)
                .map(Sample::to_f64_lossy)
                .ok_or_else(|| self.out_of_domain(px, py))
        };
        let a = read(x0, y0)?;
        let ax = read(x1, y0)?;
        let ay = read(x0, y1)?;
        let axy = read(x1, y1)?;

        let fx = x - xf;
        let fy = y - yf;
        let value = a + fx * (ax - a) + fy * (ay - a) + fx * fy * (a + axy - ax - ay);
        Ok(T::from_f64_lossy(value))
    }

    /// Copy the `width x height` window whose upper-left corner is (x, y).
    ///
    /// Window samples are read through the edge policy, so a window that
    /// overhangs the border is filled per policy.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfDomain` if the window overhangs the border
    /// under [`EdgePolicy::Skip`].
    pub fn sub_grid(&self, x: i64, y: i64, width: u32, height: u32) -> Result<Grid<T>> {
        let mut sub = Grid::with_policy(width, height, self.edge_policy)?;
        let mut idx = 0;
        for sy in 0..height as i64 {
            for sx in 0..width as i64 {
                sub.data[idx] = self.get_pixel(x.saturating_add(sx), y.saturating_add(sy))?;
                idx += 1;
            }
        }
        Ok(sub)
    }

    // ========================================================================
    // Bulk access
    // ========================================================================

    /// Get raw access to the sample data
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Get mutable access to the sample data
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the grid and return its sample buffer
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Get a row of sample data
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[T] {
        let start = (y as usize) * (self.width as usize);
        let end = start + (self.width as usize);
        &self.data[start..end]
    }

    /// Overwrite every sample from a row-major slice.
    ///
    /// Used by decoders that fill a freshly constructed grid.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if `values.len() != width * height`;
    /// the grid is left unchanged.
    pub fn replace_data(&mut self, values: &[T]) -> Result<()> {
        if values.len() != self.data.len() {
            return Err(Error::InvalidParameter(format!(
                "replacement has {} samples, grid {}x{} holds {}",
                values.len(),
                self.width,
                self.height,
                self.data.len()
            )));
        }
        self.data.copy_from_slice(values);
        Ok(())
    }

    /// Set all samples to the specified value
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// Sum of all samples, wrapping for integer grids
    pub fn sum(&self) -> T {
        self.data.iter().fold(T::zero(), |acc, &v| acc.add_wrapped(v))
    }

    /// Mean of all samples, `sum / (W * H)`.
    ///
    /// Integer grids use integer division by the exact sample count. An
    /// empty grid has mean zero.
    pub fn mean(&self) -> T {
        self.sum().div_count(self.data.len())
    }

    /// Population standard deviation.
    ///
    /// The mean and the squared deviations are accumulated in `f64` and the
    /// result converted back once, truncating for integer grids. Unlike
    /// [`mean`](Self::mean), it never sees a wrapped sum.
    pub fn std_dev(&self) -> T {
        if self.data.is_empty() {
            return T::zero();
        }
        let len = self.data.len() as f64;
        let mean = self.data.iter().map(|&v| v.to_f64_lossy()).sum::<f64>() / len;
        let squares: f64 = self
            .data
            .iter()
            .map(|&v| {
                let diff = v.to_f64_lossy() - mean;
                diff * diff
            })
            .sum();
        T::from_f64_lossy((squares / len).sqrt())
    }

    /// Minimum sample, seeded with the type maximum.
    pub fn min(&self) -> T {
        self.data.iter().fold(T::highest(), |acc, &v| acc.meet(v))
    }

    /// Maximum sample, seeded with the type minimum (`-MAX` for floats).
    pub fn max(&self) -> T {
        self.data.iter().fold(T::lowest(), |acc, &v| acc.join(v))
    }

    // ========================================================================
    // Generic operations
    // ========================================================================

    /// Apply `f` to every sample, producing a new grid of the same shape.
    pub fn map<F>(&self, f: F) -> Grid<T>
    where
        F: Fn(T) -> T,
    {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
            edge_policy: self.edge_policy,
        }
    }

    /// Combine two same-shaped grids sample by sample with `f`.
    ///
    /// # Errors
    ///
    /// Returns `Error::DimensionMismatch` if the shapes differ.
    pub fn zip_map<F>(&self, other: &Grid<T>, f: F) -> Result<Grid<T>>
    where
        F: Fn(T, T) -> T,
    {
        self.check_same_size(other)?;
        Ok(Grid {
            width: self.width,
            height: self.height,
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
            edge_policy: self.edge_policy,
        })
    }

    /// Check that two grids have the same dimensions
    pub(crate) fn check_same_size(&self, other: &Grid<T>) -> Result<()> {
        if self.width != other.width || self.height != other.height {
            return Err(Error::DimensionMismatch {
                expected: (self.width, self.height),
                actual: (other.width, other.height),
            });
        }
        Ok(())
    }

    // ========================================================================
    // Domain transforms and resampling
    // ========================================================================

    /// Resample through a fractional coordinate map.
    ///
    /// Output sample (x, y) becomes `self.sample(f(x, y))`.
    ///
    /// # Errors
    ///
    /// Propagates `Error::OutOfDomain` from [`sample`](Self::sample) when a
    /// mapped coordinate cannot be read under the edge policy.
    pub fn domain_transform<F>(&self, mut f: F) -> Result<Grid<T>>
    where
        F: FnMut(f64, f64) -> (f64, f64),
    {
        debug!(
            "domain_transform (bilinear) on {}x{} grid, policy {}",
            self.width, self.height, self.edge_policy
        );
        let mut out = self.create_template()?;
        let mut idx = 0;
        for y in 0..self.height {
            for x in 0..self.width {
                let (sx, sy) = f(x as f64, y as f64);
                out.data[idx] = self.sample(sx, sy)?;
                idx += 1;
            }
        }
        Ok(out)
    }

    /// Resample through an integer coordinate map.
    ///
    /// Output sample (x, y) becomes `self.get_pixel(f(x, y))`.
    pub fn domain_transform_int<F>(&self, mut f: F) -> Result<Grid<T>>
    where
        F: FnMut(i64, i64) -> (i64, i64),
    {
        debug!(
            "domain_transform (integer) on {}x{} grid, policy {}",
            self.width, self.height, self.edge_policy
        );
        let mut out = self.create_template()?;
        let mut idx = 0;
        for y in 0..self.height as i64 {
            for x in 0..self.width as i64 {
                let (sx, sy) = f(x, y);
                out.data[idx] = self.get_pixel(sx, sy)?;
                idx += 1;
            }
        }
        Ok(out)
    }

    /// Reallocate to `width x height`, discarding every sample.
    ///
    /// The new samples are zero; the edge policy is kept.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let data = allocate(width, height, T::zero())?;
        self.width = width;
        self.height = height;
        self.data = data;
        Ok(())
    }

    /// Resize to `width x height`, resampling the current content.
    ///
    /// New coordinate `x'` reads old-space `x' * (W - 2) / (W' - 1)`
    /// (likewise for y) through a bilinear approximation with clamped
    /// neighbour lookups, so the last valid sample is never overrun. A
    /// new extent of 1 maps to old coordinate 0.
    pub fn resize_retain(&mut self, width: u32, height: u32) -> Result<()> {
        debug!(
            "resize_retain {}x{} -> {}x{}",
            self.width, self.height, width, height
        );
        let mut data = allocate(width, height, T::zero())?;
        if !self.is_empty() {
            let scale_x = resample_scale(self.width, width);
            let scale_y = resample_scale(self.height, height);
            let mut idx = 0;
            for y in 0..height {
                for x in 0..width {
                    data[idx] =
                        self.bilinear(x as f64 * scale_x, y as f64 * scale_y, EdgePolicy::Clamp)?;
                    idx += 1;
                }
            }
        }
        self.width = width;
        self.height = height;
        self.data = data;
        Ok(())
    }
}

/// Old-space step per new-space step for [`Grid::resize_retain`].
fn resample_scale(old: u32, new: u32) -> f64 {
    if new <= 1 {
        return 0.0;
    }
    (old as f64 - 2.0).max(0.0) / (new as f64 - 1.0)
}

// ============================================================================
// Tests
// ============================================================================
