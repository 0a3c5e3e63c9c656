//! Convolution cursor
//!
//! A [`Cursor`] walks a grid in row-major order and, at each position,
//! centres its kernel there and reduces the neighbourhood to one output
//! sample according to its [`Strategy`].
//!
//! # Tap rules
//!
//! Every tap is fetched through the grid's edge policy. For the
//! [`Linear`](Strategy::Linear), [`MulMax`](Strategy::MulMax),
//! [`MulMin`](Strategy::MulMin) and [`Generic`](Strategy::Generic)
//! strategies a tap that misses under `Skip` is omitted: it contributes
//! nothing and the reduction sees only the fetched taps.
//!
//! The order-statistic strategies [`Owa`](Strategy::Owa) and
//! [`Sowa`](Strategy::Sowa) instead keep one slot per storage index and
//! leave a missed slot at zero, so the sort always covers the full
//! kernel size.
//!
//! # Positions
//!
//! The cursor starts at (0, 0) and advances to (0, H) once the last row is
//! done; that end position is shared by every cursor over the grid. Two
//! cursors compare equal when they walk the same grid (by identity) and
//! sit at the same position, whatever kernel they hold.

use std::cmp::Ordering;
use std::fmt;
use std::ptr;

use imgalg_core::{Error, Grid, Sample};

use crate::kernel::{Kernel, Point};
use crate::reduce::{self, MergeFn, ReduceFn};
use crate::{FilterError, FilterResult};

/// How a cursor turns one neighbourhood into one sample
#[derive(Clone, Copy)]
pub enum Strategy<'a, T: Sample> {
    /// `Σ sample * weight` over fetched taps
    Linear,
    /// `max(sample * weight)` over fetched taps
    MulMax,
    /// `min(sample * weight)` over fetched taps
    MulMin,
    /// `reduce([merge(sample, weight)])` over fetched taps
    Generic {
        merge: MergeFn<T>,
        reduce: ReduceFn<T>,
    },
    /// Sort the samples, then `Σ sorted[i] * weight[i]`
    Owa,
    /// As `Owa`, with `offsets[i]` added to each fetched sample before the
    /// sort. `offsets` must have the kernel's shape.
    Sowa { offsets: &'a dyn Kernel<T> },
}

impl<T: Sample> Strategy<'_, T> {
    /// Short name for log output
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Linear => "linear",
            Strategy::MulMax => "mul-max",
            Strategy::MulMin => "mul-min",
            Strategy::Generic { .. } => "generic",
            Strategy::Owa => "owa",
            Strategy::Sowa { .. } => "sowa",
        }
    }
}

impl<T: Sample> fmt::Debug for Strategy<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Forward-only convolution traversal over one grid
pub struct Cursor<'a, T: Sample> {
    grid: &'a Grid<T>,
    kernel: Option<&'a dyn Kernel<T>>,
    strategy: Strategy<'a, T>,
    x: u32,
    y: u32,
    /// Per-position tap buffer, cleared before every use
    scratch: Vec<T>,
}

impl<'a, T: Sample> Cursor<'a, T> {
    /// Bind `kernel` to `grid` with the given strategy.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::DimensionMismatch` for a `Sowa` strategy whose
    /// offsets differ in shape from `kernel`.
    pub fn new(
        grid: &'a Grid<T>,
        kernel: &'a dyn Kernel<T>,
        strategy: Strategy<'a, T>,
    ) -> FilterResult<Self> {
        check_offsets(kernel, &strategy)?;
        let mut cursor = Self::unbound(grid, strategy);
        cursor.kernel = Some(kernel);
        Ok(cursor)
    }

    /// A cursor with no kernel. Reading its value is an error until
    /// [`set_kernel`](Self::set_kernel) is called.
    pub fn unbound(grid: &'a Grid<T>, strategy: Strategy<'a, T>) -> Self {
        let mut cursor = Cursor {
            grid,
            kernel: None,
            strategy,
            x: 0,
            y: 0,
            scratch: Vec::new(),
        };
        cursor.reset();
        cursor
    }

    /// The end position (0, H) of `grid`, with no kernel.
    pub fn end(grid: &'a Grid<T>) -> Self {
        let mut cursor = Self::unbound(grid, Strategy::Linear);
        cursor.finish();
        cursor
    }

    /// Linear convolution: `Σ sample * weight`
    pub fn linear(grid: &'a Grid<T>, kernel: &'a dyn Kernel<T>) -> Self {
        Self::with_kernel(grid, kernel, Strategy::Linear)
    }

    /// Multiplicative-max convolution: `max(sample * weight)`
    pub fn mul_max(grid: &'a Grid<T>, kernel: &'a dyn Kernel<T>) -> Self {
        Self::with_kernel(grid, kernel, Strategy::MulMax)
    }

    /// Multiplicative-min convolution: `min(sample * weight)`
    pub fn mul_min(grid: &'a Grid<T>, kernel: &'a dyn Kernel<T>) -> Self {
        Self::with_kernel(grid, kernel, Strategy::MulMin)
    }

    /// Generic convolution with a custom merge and reduce
    pub fn generic(
        grid: &'a Grid<T>,
        kernel: &'a dyn Kernel<T>,
        merge: MergeFn<T>,
        reduce: ReduceFn<T>,
    ) -> Self {
        Self::with_kernel(grid, kernel, Strategy::Generic { merge, reduce })
    }

    /// Order-weighted averaging with rank weights `weights`
    pub fn owa(grid: &'a Grid<T>, weights: &'a dyn Kernel<T>) -> Self {
        Self::with_kernel(grid, weights, Strategy::Owa)
    }

    /// Structured order-weighted averaging.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::DimensionMismatch` when `offsets` and
    /// `weights` differ in width or height.
    pub fn sowa(
        grid: &'a Grid<T>,
        weights: &'a dyn Kernel<T>,
        offsets: &'a dyn Kernel<T>,
    ) -> FilterResult<Self> {
        Self::new(grid, weights, Strategy::Sowa { offsets })
    }

    fn with_kernel(grid: &'a Grid<T>, kernel: &'a dyn Kernel<T>, strategy: Strategy<'a, T>) -> Self {
        let mut cursor = Self::unbound(grid, strategy);
        cursor.kernel = Some(kernel);
        cursor
    }

    /// Bind a kernel, keeping the position.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::DimensionMismatch` if the strategy is `Sowa`
    /// and the kernel's shape differs from the offsets; the previous
    /// kernel stays bound.
    pub fn set_kernel(&mut self, kernel: &'a dyn Kernel<T>) -> FilterResult<()> {
        check_offsets(kernel, &self.strategy)?;
        self.kernel = Some(kernel);
        Ok(())
    }

    /// Walk a different grid, starting over at its origin.
    pub fn rebind(&mut self, grid: &'a Grid<T>) {
        self.grid = grid;
        self.reset();
    }

    /// Return to the origin of the current grid.
    pub fn reset(&mut self) {
        self.x = 0;
        self.y = 0;
        if self.grid.is_empty() {
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.x = 0;
        self.y = self.grid.height();
    }

    /// The grid being walked
    pub fn grid(&self) -> &'a Grid<T> {
        self.grid
    }

    /// The bound kernel, if any
    pub fn kernel(&self) -> Option<&'a dyn Kernel<T>> {
        self.kernel
    }

    /// The reduction strategy
    pub fn strategy(&self) -> Strategy<'a, T> {
        self.strategy
    }

    /// Current (x, y)
    pub fn position(&self) -> (u32, u32) {
        (self.x, self.y)
    }

    /// True at the end position (0, H)
    pub fn is_end(&self) -> bool {
        self.y >= self.grid.height()
    }

    /// Step to the next position in row-major order.
    ///
    /// Past the last column the cursor wraps to the next row; past the last
    /// row it stays at the end position.
    pub fn advance(&mut self) {
        if self.is_end() {
            return;
        }
        self.x += 1;
        if self.x >= self.grid.width() {
            self.x = 0;
            self.y += 1;
        }
    }

    /// The output sample at the current position.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::UnboundKernel` if no kernel is bound, and
    /// `OutOfDomain` at the end position.
    pub fn value(&mut self) -> FilterResult<T> {
        let kernel = self.kernel.ok_or(FilterError::UnboundKernel)?;
        if self.is_end() {
            return Err(FilterError::Core(Error::OutOfDomain {
                x: self.x as i64,
                y: self.y as i64,
                width: self.grid.width(),
                height: self.grid.height(),
            }));
        }

        let center = Point::new(self.x as i64, self.y as i64);
        let value = match self.strategy {
            Strategy::Linear => {
                self.fold_taps(kernel, center, T::zero(), |acc, s, w| {
                    acc.add_wrapped(s.mul_wrapped(w))
                })
            }
            Strategy::MulMax => {
                self.fold_taps(kernel, center, T::lowest(), |acc, s, w| acc.join(s.mul_wrapped(w)))
            }
            Strategy::MulMin => {
                self.fold_taps(kernel, center, T::highest(), |acc, s, w| acc.meet(s.mul_wrapped(w)))
            }
            Strategy::Generic { merge, reduce } => self.gather(kernel, center, merge, reduce),
            Strategy::Owa => self.rank_weighted(kernel, center, None),
            Strategy::Sowa { offsets } => self.rank_weighted(kernel, center, Some(offsets)),
        };
        Ok(value)
    }

    /// Fold over fetched taps without materialising them.
    #[inline]
    fn fold_taps<F>(&self, kernel: &dyn Kernel<T>, center: Point, seed: T, step: F) -> T
    where
        F: Fn(T, T, T) -> T,
    {
        let fp = kernel.footprint();
        let mut acc = seed;
        for dy in -fp.neg_y..=fp.pos_y {
            for dx in -fp.neg_x..=fp.pos_x {
                let site = center.site(dx, dy);
                if let Some(sample) = self.grid.fetch(site.x, site.y) {
                    acc = step(acc, sample, kernel.weight_unchecked(&site));
                }
            }
        }
        acc
    }

    /// Merge fetched taps into scratch, then reduce exactly those.
    fn gather(
        &mut self,
        kernel: &dyn Kernel<T>,
        center: Point,
        merge: MergeFn<T>,
        reduce: ReduceFn<T>,
    ) -> T {
        let fp = kernel.footprint();
        self.scratch.clear();
        for dy in -fp.neg_y..=fp.pos_y {
            for dx in -fp.neg_x..=fp.pos_x {
                let site = center.site(dx, dy);
                if let Some(sample) = self.grid.fetch(site.x, site.y) {
                    self.scratch.push(merge(sample, kernel.weight_unchecked(&site)));
                }
            }
        }
        reduce(&mut self.scratch)
    }

    /// Order-statistic reduction over a full, zero-padded slot buffer.
    fn rank_weighted(
        &mut self,
        weights: &dyn Kernel<T>,
        center: Point,
        offsets: Option<&dyn Kernel<T>>,
    ) -> T {
        let fp = weights.footprint();
        let size = fp.size();
        self.scratch.clear();
        self.scratch.resize(size, T::zero());

        for (i, slot) in self.scratch.iter_mut().enumerate() {
            let (dx, dy) = fp.offset_of(i);
            let site = center.site(dx, dy);
            if let Some(sample) = self.grid.fetch(site.x, site.y) {
                *slot = match offsets {
                    Some(offsets) => sample.add_wrapped(offsets.weight_unchecked(&site)),
                    None => sample,
                };
            }
        }

        reduce::sort_ascending(&mut self.scratch);

        let mut acc = T::zero();
        for (i, &sample) in self.scratch.iter().enumerate() {
            let (dx, dy) = fp.offset_of(i);
            acc = acc.add_wrapped(sample.mul_wrapped(weights.weight_unchecked(&center.site(dx, dy))));
        }
        acc
    }
}

fn check_offsets<T: Sample>(kernel: &dyn Kernel<T>, strategy: &Strategy<'_, T>) -> FilterResult<()> {
    if let Strategy::Sowa { offsets } = strategy {
        let expected = (kernel.width(), kernel.height());
        let actual = (offsets.width(), offsets.height());
        if expected != actual {
            return Err(FilterError::DimensionMismatch { expected, actual });
        }
    }
    Ok(())
}

impl<T: Sample> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.grid, other.grid) && self.x == other.x && self.y == other.y
    }
}

impl<T: Sample> PartialOrd for Cursor<'_, T> {
    /// Row-major order; cursors over different grids are unordered.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if !ptr::eq(self.grid, other.grid) {
            return None;
        }
        Some((self.y, self.x).cmp(&(other.y, other.x)))
    }
}

impl<T: Sample> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("grid", &self.grid.dimensions())
            .field("bound", &self.kernel.is_some())
            .field("strategy", &self.strategy)
            .field("x", &self.x)
            .field("y", &self.y)
            .finish()
    }
}

impl<T: Sample> Iterator for Cursor<'_, T> {
    type Item = FilterResult<T>;

    /// Yield the value at the current position, then advance. An error
    /// ends the walk.
    fn next(&mut self) -> Option<Self::Item> {
        if self.is_end() {
            return None;
        }
        let value = self.value();
        if value.is_err() {
            self.finish();
        } else {
            self.advance();
        }
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let width = self.grid.width() as usize;
        let done = self.y as usize * width + self.x as usize;
        let remaining = self.grid.len().saturating_sub(done);
        if self.kernel.is_some() {
            (remaining, Some(remaining))
        } else {
            (remaining.min(1), Some(remaining.min(1)))
        }
    }
}
