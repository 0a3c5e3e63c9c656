//! Convolution properties over random grids, kernels and edge policies.

use imgalg_core::{EdgePolicy, Grid};
use imgalg_filter::reduce;
use imgalg_filter::{
    Cursor, DenseKernel, Kernel, convolve_generic, convolve_linear, convolve_mul_max,
    convolve_mul_min, owa_filter,
};
use proptest::prelude::*;

fn arb_policy() -> impl Strategy<Value = EdgePolicy> {
    prop_oneof![
        Just(EdgePolicy::Skip),
        Just(EdgePolicy::Clamp),
        Just(EdgePolicy::Zero),
    ]
}

fn arb_grid() -> impl Strategy<Value = Grid<i64>> {
    (1u32..7, 1u32..7, arb_policy()).prop_flat_map(|(w, h, policy)| {
        prop::collection::vec(-50i64..50, (w * h) as usize).prop_map(move |data| {
            let mut grid = Grid::from_data(w, h, data).unwrap();
            grid.set_edge_policy(policy);
            grid
        })
    })
}

fn arb_kernel() -> impl Strategy<Value = DenseKernel<i64>> {
    (1u32..5, 1u32..5).prop_flat_map(|(w, h)| {
        prop::collection::vec(-5i64..5, (w * h) as usize)
            .prop_map(move |data| DenseKernel::from_slice(w, h, &data).unwrap())
    })
}

/// `u8` grid over the full sample range
fn arb_u8_grid() -> impl Strategy<Value = Grid<u8>> {
    (1u32..7, 1u32..7, arb_policy()).prop_flat_map(|(w, h, policy)| {
        prop::collection::vec(any::<u8>(), (w * h) as usize).prop_map(move |data| {
            let mut grid = Grid::from_data(w, h, data).unwrap();
            grid.set_edge_policy(policy);
            grid
        })
    })
}

fn arb_u8_kernel() -> impl Strategy<Value = DenseKernel<u8>> {
    (1u32..5, 1u32..5).prop_flat_map(|(w, h)| {
        prop::collection::vec(any::<u8>(), (w * h) as usize)
            .prop_map(move |data| DenseKernel::from_slice(w, h, &data).unwrap())
    })
}

proptest! {
    #[test]
    fn unit_kernel_scales(grid in arb_grid(), k in -10i64..10) {
        let unit = DenseKernel::new(1, 1, k).unwrap();
        let out = convolve_linear(&grid, &unit).unwrap();
        prop_assert_eq!(out, grid.mul_scalar(k));
    }

    #[test]
    fn specialisations_match_generic(grid in arb_grid(), kernel in arb_kernel()) {
        let linear = convolve_linear(&grid, &kernel).unwrap();
        let max = convolve_mul_max(&grid, &kernel).unwrap();
        let min = convolve_mul_min(&grid, &kernel).unwrap();
        prop_assert_eq!(linear, convolve_generic(&grid, &kernel, reduce::multiply, reduce::sum).unwrap());
        prop_assert_eq!(max, convolve_generic(&grid, &kernel, reduce::multiply, reduce::max).unwrap());
        prop_assert_eq!(min, convolve_generic(&grid, &kernel, reduce::multiply, reduce::min).unwrap());
    }

    #[test]
    fn output_keeps_shape_and_policy(grid in arb_grid(), kernel in arb_kernel()) {
        let out = convolve_linear(&grid, &kernel).unwrap();
        prop_assert_eq!(out.dimensions(), grid.dimensions());
        prop_assert_eq!(out.edge_policy(), grid.edge_policy());
    }

    #[test]
    fn cursor_yields_every_position_once(grid in arb_grid(), kernel in arb_kernel()) {
        let cursor = Cursor::mul_max(&grid, &kernel);
        prop_assert_eq!(cursor.size_hint(), (grid.len(), Some(grid.len())));
        let values: Vec<i64> = cursor.map(|v| v.unwrap()).collect();
        let expected = convolve_mul_max(&grid, &kernel).unwrap();
        prop_assert_eq!(values.as_slice(), expected.data());
    }

    #[test]
    fn owa_extreme_ranks_bracket_samples(grid in arb_grid(), w in 1u32..4, h in 1u32..4) {
        let mut grid = grid;
        grid.set_edge_policy(EdgePolicy::Clamp);
        let n = (w * h) as usize;
        let mut lo = DenseKernel::new(w, h, 0i64).unwrap();
        lo.set_index(0, 1).unwrap();
        let mut hi = DenseKernel::new(w, h, 0i64).unwrap();
        hi.set_index(n - 1, 1).unwrap();

        let lo = owa_filter(&grid, &lo).unwrap();
        let hi = owa_filter(&grid, &hi).unwrap();
        for i in 0..grid.len() {
            prop_assert!(lo.data()[i] <= grid.data()[i]);
            prop_assert!(grid.data()[i] <= hi.data()[i]);
        }
    }

    #[test]
    fn u8_specialisations_match_generic(grid in arb_u8_grid(), kernel in arb_u8_kernel()) {
        let linear = convolve_linear(&grid, &kernel).unwrap();
        let max = convolve_mul_max(&grid, &kernel).unwrap();
        let min = convolve_mul_min(&grid, &kernel).unwrap();
        prop_assert_eq!(linear, convolve_generic(&grid, &kernel, reduce::multiply, reduce::sum).unwrap());
        prop_assert_eq!(max, convolve_generic(&grid, &kernel, reduce::multiply, reduce::max).unwrap());
        prop_assert_eq!(min, convolve_generic(&grid, &kernel, reduce::multiply, reduce::min).unwrap());
    }

    #[test]
    fn u8_linear_is_the_wrapped_sum(grid in arb_u8_grid(), kernel in arb_u8_kernel()) {
        let mut grid = grid;
        grid.set_edge_policy(EdgePolicy::Clamp);
        let out = convolve_linear(&grid, &kernel).unwrap();
        let (w, h) = (grid.width() as i64, grid.height() as i64);
        let (kw, kh) = (kernel.width() as i64, kernel.height() as i64);
        let (nx, ny) = ((kw - 1) / 2, (kh - 1) / 2);
        for y in 0..h {
            for x in 0..w {
                let mut acc = 0u64;
                for j in 0..kh {
                    for i in 0..kw {
                        let s = grid.get_pixel(x + i - nx, y + j - ny).unwrap() as u64;
                        let k = kernel.get_index((j * kw + i) as usize).unwrap() as u64;
                        acc += s * k;
                    }
                }
                prop_assert_eq!(out.get_pixel(x, y).unwrap(), (acc % 256) as u8);
            }
        }
    }
}
