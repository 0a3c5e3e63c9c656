//! Neighbourhood kernels
//!
//! A kernel is a `Kw x Kh` weight mask applied around a centre position.
//! Its footprint reaches `(Kw - 1) / 2` samples left of the centre and
//! `Kw / 2` samples right of it (likewise vertically), so an even-sized
//! kernel leans toward the positive side.
//!
//! The centre is never stored on the kernel. Every access takes it as an
//! argument, which lets one kernel serve any number of cursors at once.
//!
//! Two implementations are provided:
//!
//! - [`DenseKernel`]: explicit weights in row-major storage
//! - [`ProceduralKernel`]: weights computed per access from a generator

pub mod dense;
pub mod procedural;

use imgalg_core::Sample;

use crate::{FilterError, FilterResult};

pub use dense::DenseKernel;
pub use procedural::{Generator, ProceduralKernel};

/// Absolute image-space coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    /// Create a point
    pub const fn new(x: i64, y: i64) -> Self {
        Point { x, y }
    }

    /// The tap at offset (dx, dy) from this centre
    #[inline]
    pub fn site(self, dx: i64, dy: i64) -> Site {
        Site {
            x: self.x + dx,
            y: self.y + dy,
            dx,
            dy,
        }
    }
}

/// One kernel tap: its absolute coordinate and its offset from the centre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Site {
    /// Absolute x
    pub x: i64,
    /// Absolute y
    pub y: i64,
    /// Offset from the centre along x
    pub dx: i64,
    /// Offset from the centre along y
    pub dy: i64,
}

/// Offsets a kernel visits around its centre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Footprint {
    /// Samples left of the centre, `(Kw - 1) / 2`
    pub neg_x: i64,
    /// Samples right of the centre, `Kw / 2`
    pub pos_x: i64,
    /// Samples above the centre, `(Kh - 1) / 2`
    pub neg_y: i64,
    /// Samples below the centre, `Kh / 2`
    pub pos_y: i64,
}

impl Footprint {
    /// Footprint of a `width x height` kernel
    pub fn new(width: u32, height: u32) -> Self {
        let (w, h) = (width.max(1) as i64, height.max(1) as i64);
        Footprint {
            neg_x: (w - 1) / 2,
            pos_x: w / 2,
            neg_y: (h - 1) / 2,
            pos_y: h / 2,
        }
    }

    /// Width covered, `neg_x + pos_x + 1`
    #[inline]
    pub fn width(&self) -> i64 {
        self.neg_x + self.pos_x + 1
    }

    /// Height covered, `neg_y + pos_y + 1`
    #[inline]
    pub fn height(&self) -> i64 {
        self.neg_y + self.pos_y + 1
    }

    /// Number of taps
    #[inline]
    pub fn size(&self) -> usize {
        (self.width() * self.height()) as usize
    }

    /// True when (dx, dy) is a tap of this footprint
    #[inline]
    pub fn contains(&self, dx: i64, dy: i64) -> bool {
        (-self.neg_x..=self.pos_x).contains(&dx) && (-self.neg_y..=self.pos_y).contains(&dy)
    }

    /// Row-major storage index of an offset
    #[inline]
    pub fn index_of(&self, dx: i64, dy: i64) -> Option<usize> {
        if !self.contains(dx, dy) {
            return None;
        }
        Some(((dy + self.neg_y) * self.width() + (dx + self.neg_x)) as usize)
    }

    /// Offset of a storage index (the index must be below `size()`)
    #[inline]
    pub fn offset_of(&self, index: usize) -> (i64, i64) {
        let w = self.width() as usize;
        (
            (index % w) as i64 - self.neg_x,
            (index / w) as i64 - self.neg_y,
        )
    }

    /// All offsets in storage (row-major) order
    pub fn offsets(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        (-self.neg_y..=self.pos_y)
            .flat_map(move |dy| (-self.neg_x..=self.pos_x).map(move |dx| (dx, dy)))
    }
}

/// A neighbourhood weight mask
///
/// Implementors supply the extent and [`weight_unchecked`]; the checked
/// accessors are provided.
///
/// [`weight_unchecked`]: Kernel::weight_unchecked
pub trait Kernel<T: Sample> {
    /// Kernel width
    fn width(&self) -> u32;

    /// Kernel height
    fn height(&self) -> u32;

    /// Number of weights, `width * height`
    fn size(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Offsets visited around the centre
    fn footprint(&self) -> Footprint {
        Footprint::new(self.width(), self.height())
    }

    /// Check that (dx, dy) lies in the footprint.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::KernelOutOfDomain` otherwise.
    fn verify(&self, dx: i64, dy: i64) -> FilterResult<()> {
        if self.footprint().contains(dx, dy) {
            Ok(())
        } else {
            Err(FilterError::KernelOutOfDomain {
                dx,
                dy,
                width: self.width(),
                height: self.height(),
            })
        }
    }

    /// Weight of a tap whose offset is known to lie in the footprint.
    fn weight_unchecked(&self, site: &Site) -> T;

    /// Weight at offset (dx, dy) from `center`, bounds-checked.
    fn weight(&self, center: Point, dx: i64, dy: i64) -> FilterResult<T> {
        self.verify(dx, dy)?;
        Ok(self.weight_unchecked(&center.site(dx, dy)))
    }

    /// Weight at a flat storage index around `center`.
    fn weight_at_index(&self, center: Point, index: usize) -> FilterResult<T> {
        let size = self.size();
        if index >= size {
            return Err(FilterError::KernelIndexOutOfRange { index, size });
        }
        let (dx, dy) = self.footprint().offset_of(index);
        Ok(self.weight_unchecked(&center.site(dx, dy)))
    }

    /// View of this kernel centred at image coordinate (x, y)
    fn centered_at(&self, x: i64, y: i64) -> Centered<'_, T>
    where
        Self: Sized,
    {
        Centered::new(self, Point::new(x, y))
    }
}

/// A kernel pinned to one centre, read by absolute image coordinate
pub struct Centered<'a, T: Sample> {
    kernel: &'a dyn Kernel<T>,
    center: Point,
}

impl<'a, T: Sample> Centered<'a, T> {
    /// Pin `kernel` at `center`
    pub fn new(kernel: &'a dyn Kernel<T>, center: Point) -> Self {
        Centered { kernel, center }
    }

    /// The pinned centre
    pub fn center(&self) -> Point {
        self.center
    }

    /// Weight at absolute image coordinate (x, y)
    ///
    /// # Errors
    ///
    /// Returns `FilterError::KernelOutOfDomain` if (x, y) falls outside
    /// the footprint around the centre.
    pub fn get(&self, x: i64, y: i64) -> FilterResult<T> {
        self.kernel
            .weight(self.center, x - self.center.x, y - self.center.y)
    }

    /// Weight at offset (dx, dy) from the centre
    pub fn get_offset(&self, dx: i64, dy: i64) -> FilterResult<T> {
        self.kernel.weight(self.center, dx, dy)
    }
}
