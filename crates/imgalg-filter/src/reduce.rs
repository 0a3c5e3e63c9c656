//! Built-in merge and reduce functions
//!
//! A convolution pass combines each fetched sample with its kernel weight
//! through a [`MergeFn`], collects the merged taps of one position, and
//! collapses them into the output sample through a [`ReduceFn`].
//!
//! Reductions receive exactly the merged taps of one position, in
//! footprint order. They may reorder the slice.

use std::cmp::Ordering;

use imgalg_core::Sample;

/// `merge(image_sample, kernel_weight) -> tap`
pub type MergeFn<T> = fn(T, T) -> T;

/// `reduce(taps) -> output_sample`
pub type ReduceFn<T> = fn(&mut [T]) -> T;

/// `sample * weight`
#[inline]
pub fn multiply<T: Sample>(sample: T, weight: T) -> T {
    sample.mul_wrapped(weight)
}

/// `sample + weight`
#[inline]
pub fn add<T: Sample>(sample: T, weight: T) -> T {
    sample.add_wrapped(weight)
}

/// `sample - weight`
#[inline]
pub fn subtract<T: Sample>(sample: T, weight: T) -> T {
    sample.sub_wrapped(weight)
}

/// Sum of the taps, zero when there are none
pub fn sum<T: Sample>(taps: &mut [T]) -> T {
    taps.iter().fold(T::zero(), |acc, &v| acc.add_wrapped(v))
}

/// Largest tap, seeded with the lowest value of `T`
pub fn max<T: Sample>(taps: &mut [T]) -> T {
    taps.iter().fold(T::lowest(), |acc, &v| acc.join(v))
}

/// Smallest tap, seeded with the highest value of `T`
pub fn min<T: Sample>(taps: &mut [T]) -> T {
    taps.iter().fold(T::highest(), |acc, &v| acc.meet(v))
}

/// Arithmetic mean of the taps, zero when there are none
pub fn mean<T: Sample>(taps: &mut [T]) -> T {
    sum(taps).div_count(taps.len())
}

/// Median of the taps
///
/// Sorts ascending; an odd count yields the middle tap, an even count the
/// average of the two central taps, and no taps yields zero.
pub fn median<T: Sample>(taps: &mut [T]) -> T {
    if taps.is_empty() {
        return T::zero();
    }
    sort_ascending(taps);
    let mid = taps.len() / 2;
    if taps.len() % 2 == 1 {
        taps[mid]
    } else {
        taps[mid - 1].midpoint(taps[mid])
    }
}

/// Sort samples ascending; incomparable pairs (NaN) keep their order.
pub(crate) fn sort_ascending<T: Sample>(values: &mut [T]) {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
}
