//! Numeric sample types
//!
//! A [`Sample`] is a copyable numeric type that supports ordering, bounds,
//! lossy conversion through `f64` and the arithmetic the grid algebra
//! needs. It is implemented for Rust's primitive integers (up to 64 bits)
//! and floats.
//!
//! # Overflow
//!
//! Integer arithmetic wraps modulo `2^bits`: sums, differences and
//! products that leave the type's range never panic, and `(a + b) - b`
//! recovers `a` exactly. Float arithmetic follows IEEE 754.

use std::fmt::Debug;

use num_traits::{Bounded, Num, NumCast, ToPrimitive, WrappingAdd, WrappingMul, WrappingSub};

/// Numeric type storable in a [`Grid`](crate::Grid).
pub trait Sample: Copy + Debug + PartialOrd + Num + NumCast + Bounded + 'static {
    /// `self + rhs`, wrapping for integers.
    fn add_wrapped(self, rhs: Self) -> Self;

    /// `self - rhs`, wrapping for integers.
    fn sub_wrapped(self, rhs: Self) -> Self;

    /// `self * rhs`, wrapping for integers.
    fn mul_wrapped(self, rhs: Self) -> Self;

    /// Division where a zero divisor yields zero instead of a fault.
    ///
    /// Signed `MIN / -1` wraps to `MIN`.
    fn div_or_zero(self, rhs: Self) -> Self;

    /// Value halfway between two samples, truncated toward zero for
    /// integers. Never overflows.
    fn midpoint(self, rhs: Self) -> Self;

    /// `0 - self`, wrapping for integers.
    #[inline]
    fn neg_wrapped(self) -> Self {
        Self::zero().sub_wrapped(self)
    }

    /// A count of samples in `T`, or `None` if it exceeds the type's range.
    #[inline]
    fn from_count(count: usize) -> Option<Self> {
        <Self as NumCast>::from(count)
    }

    /// `self / count` for an exact sample count.
    ///
    /// A count of zero gives zero. When the count does not fit in an
    /// integer `T`, it exceeds every representable magnitude and the
    /// truncated quotient is zero.
    #[inline]
    fn div_count(self, count: usize) -> Self {
        match Self::from_count(count) {
            Some(n) => self.div_or_zero(n),
            None => Self::zero(),
        }
    }

    /// Lowest representable value.
    ///
    /// For integers this is the type minimum, for floats it is `-MAX`.
    /// Used as the seed of every running maximum.
    #[inline]
    fn lowest() -> Self {
        Self::min_value()
    }

    /// Highest representable value, the seed of every running minimum.
    #[inline]
    fn highest() -> Self {
        Self::max_value()
    }

    /// Widen to `f64`. Values with no `f64` form map to zero.
    #[inline]
    fn to_f64_lossy(self) -> f64 {
        ToPrimitive::to_f64(&self).unwrap_or(0.0)
    }

    /// Narrow from `f64`, truncating toward zero for integers and
    /// saturating at the type bounds. NaN maps to zero.
    #[inline]
    fn from_f64_lossy(value: f64) -> Self {
        if value.is_nan() {
            return Self::zero();
        }
        match <Self as NumCast>::from(value) {
            Some(v) => v,
            None if value < 0.0 => Self::lowest(),
            None => Self::highest(),
        }
    }

    /// Larger of two samples (the lattice join, ∨).
    #[inline]
    fn join(self, rhs: Self) -> Self {
        if self < rhs { rhs } else { self }
    }

    /// Smaller of two samples (the lattice meet, ∧).
    #[inline]
    fn meet(self, rhs: Self) -> Self {
        if self > rhs { rhs } else { self }
    }
}

macro_rules! impl_sample_int {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                #[inline]
                fn add_wrapped(self, rhs: Self) -> Self {
                    WrappingAdd::wrapping_add(&self, &rhs)
                }

                #[inline]
                fn sub_wrapped(self, rhs: Self) -> Self {
                    WrappingSub::wrapping_sub(&self, &rhs)
                }

                #[inline]
                fn mul_wrapped(self, rhs: Self) -> Self {
                    WrappingMul::wrapping_mul(&self, &rhs)
                }

                #[inline]
                fn div_or_zero(self, rhs: Self) -> Self {
                    if rhs == 0 { 0 } else { self.wrapping_div(rhs) }
                }

                #[inline]
                fn midpoint(self, rhs: Self) -> Self {
                    // Every supported integer fits in i128.
                    ((self as i128 + rhs as i128) / 2) as $t
                }
            }
        )*
    };
}

macro_rules! impl_sample_float {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                #[inline]
                fn add_wrapped(self, rhs: Self) -> Self {
                    self + rhs
                }

                #[inline]
                fn sub_wrapped(self, rhs: Self) -> Self {
                    self - rhs
                }

                #[inline]
                fn mul_wrapped(self, rhs: Self) -> Self {
                    self * rhs
                }

                #[inline]
                fn div_or_zero(self, rhs: Self) -> Self {
                    if rhs == 0.0 { 0.0 } else { self / rhs }
                }

                #[inline]
                fn midpoint(self, rhs: Self) -> Self {
                    self / 2.0 + rhs / 2.0
                }
            }
        )*
    };
}

impl_sample_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);
impl_sample_float!(f32, f64);
