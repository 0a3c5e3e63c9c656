//! Convolution regression test
//!
//! Linear, multiplicative-max/min and generic passes over the standard
//! 4x4 ramp under each edge policy.

use imgalg_core::{EdgePolicy, Grid};
use imgalg_filter::reduce::{self, ReduceFn};
use imgalg_filter::{
    Cursor, DenseKernel, FilterError, Kernel, Point, ProceduralKernel, Site, Strategy, convolve,
    convolve_generic, convolve_linear, convolve_mul_max, convolve_mul_min, convolve_with,
};
use imgalg_test::{RegParams, impulse_grid, ramp_grid};

fn with_policy<T: imgalg_core::Sample>(mut grid: Grid<T>, policy: EdgePolicy) -> Grid<T> {
    grid.set_edge_policy(policy);
    grid
}

#[test]
fn convolve_reg() {
    let mut rp = RegParams::new("convolve");

    let moore = DenseKernel::<i32>::moore();

    // --- Test 1: Moore sum at an interior position under Zero ---
    let ramp = with_policy(ramp_grid::<i32>(4, 4).expect("ramp"), EdgePolicy::Zero);
    let out = convolve_linear(&ramp, &moore).expect("linear");
    rp.compare_values(54.0, out.get_pixel(1, 1).unwrap() as f64, 0.0);
    // Border positions see zeros beyond the edge.
    rp.compare_values(14.0, out.get_pixel(0, 0).unwrap() as f64, 0.0);
    rp.compare_values(22.0, out.get_pixel(3, 0).unwrap() as f64, 0.0);
    rp.compare_values(out.sum() as f64, out.data().iter().map(|&v| v as f64).sum(), 0.0);

    // --- Test 2: Skip omits border taps; Zero adds nothing for them ---
    let skip = with_policy(ramp.clone(), EdgePolicy::Skip);
    let out_skip = convolve_linear(&skip, &moore).expect("linear skip");
    rp.compare_grids(&out, &out_skip, 0.0);

    let mean_zero = convolve_generic(&ramp, &moore, reduce::multiply, reduce::mean).expect("mean");
    let mean_skip = convolve_generic(&skip, &moore, reduce::multiply, reduce::mean).expect("mean");
    // Zero averages over 9 taps, Skip over the 4 that exist.
    rp.compare_values(1.0, mean_zero.get_pixel(0, 0).unwrap() as f64, 0.0);
    rp.compare_values(3.0, mean_skip.get_pixel(0, 0).unwrap() as f64, 0.0);
    rp.compare_values(6.0, mean_skip.get_pixel(1, 1).unwrap() as f64, 0.0);

    // --- Test 3: Specialisations agree with the generic engine ---
    let kernel = DenseKernel::from_slice(3, 3, &[2, -1, 0, 1, 3, -2, 0, 1, 1]).expect("kernel");
    for policy in EdgePolicy::ALL {
        let grid = with_policy(ramp_grid::<i32>(5, 4).expect("ramp"), policy);
        let cases: [(Grid<i32>, ReduceFn<i32>); 3] = [
            (convolve_linear(&grid, &kernel).expect("linear"), reduce::sum),
            (convolve_mul_max(&grid, &kernel).expect("mul_max"), reduce::max),
            (convolve_mul_min(&grid, &kernel).expect("mul_min"), reduce::min),
        ];
        for (fast, red) in cases {
            let slow = convolve_generic(&grid, &kernel, reduce::multiply, red).expect("generic");
            rp.compare_grids(&slow, &fast, 0.0);
        }
    }

    // --- Test 4: Unit kernel equals the scalar product ---
    let rampf = ramp_grid::<f64>(3, 3).expect("ramp f64");
    for k in [0.0, 0.5, -2.0, 7.25] {
        let unit = DenseKernel::new(1, 1, k).expect("unit");
        let out = convolve_linear(&rampf, &unit).expect("linear");
        rp.compare_grids(&rampf.mul_scalar(k), &out, 0.0);
    }

    // --- Test 5: Morphology with mul-max / mul-min ---
    let dot = with_policy(impulse_grid(5, 5, 2, 2, 1.0f64).expect("impulse"), EdgePolicy::Zero);
    let cross = DenseKernel::von_neumann();
    let dilated = convolve_mul_max(&dot, &cross).expect("dilate");
    rp.compare_values(5.0, dilated.sum(), 0.0);
    let eroded = convolve_mul_min(&dilated, &DenseKernel::moore()).expect("erode");
    rp.compare_values(0.0, eroded.sum(), 0.0);

    // --- Test 6: Strategy dispatch through convolve() ---
    let via_strategy = convolve(&ramp, &moore, Strategy::Linear).expect("convolve");
    rp.compare_grids(&out, &via_strategy, 0.0);
    let via_generic = convolve(
        &ramp,
        &moore,
        Strategy::Generic {
            merge: reduce::add,
            reduce: reduce::max,
        },
    )
    .expect("convolve generic");
    // Max of (sample + 1) over the neighbourhood of (1, 1) is 11 + 1.
    rp.compare_values(12.0, via_generic.get_pixel(1, 1).unwrap() as f64, 0.0);

    assert!(rp.cleanup(), "convolve regression test failed");
}

#[test]
fn convolve_cursor_reg() {
    let mut rp = RegParams::new("convolve_cursor");

    let a = ramp_grid::<i32>(3, 2).expect("ramp");
    let b = ramp_grid::<i32>(2, 2).expect("ramp");
    let k = DenseKernel::new(1, 1, 10).expect("kernel");

    // --- Test 1: Lazy iteration matches the materialised pass ---
    let lazy: Vec<i32> = Cursor::linear(&a, &k).map(|v| v.expect("value")).collect();
    let eager = convolve_linear(&a, &k).expect("linear");
    rp.compare_values(lazy.len() as f64, eager.len() as f64, 0.0);
    for (i, &v) in lazy.iter().enumerate() {
        rp.compare_values(eager.data()[i] as f64, v as f64, 0.0);
    }

    // --- Test 2: End sentinel and equality ---
    let mut cursor = Cursor::linear(&a, &k);
    for _ in 0..a.len() {
        cursor.advance();
    }
    rp.compare_values(1.0, (cursor == Cursor::end(&a)) as i32 as f64, 0.0);
    rp.compare_values(1.0, (cursor != Cursor::end(&b)) as i32 as f64, 0.0);
    let (x, y) = cursor.position();
    rp.compare_values(0.0, x as f64, 0.0);
    rp.compare_values(2.0, y as f64, 0.0);

    // --- Test 3: convolve_with rebinds and restarts ---
    let out = convolve_with(&b, &mut cursor).expect("convolve_with");
    rp.compare_grids(&b.mul_scalar(10), &out, 0.0);

    // --- Test 4: Unbound cursor is a usage error ---
    let mut unbound = Cursor::unbound(&a, Strategy::MulMax);
    rp.expect_error(unbound.value());
    rp.compare_values(
        1.0,
        matches!(convolve_with(&a, &mut unbound), Err(FilterError::UnboundKernel)) as i32 as f64,
        0.0,
    );

    assert!(rp.cleanup(), "convolve cursor regression test failed");
}

/// Weight grows with the absolute column, scaled by the parameter.
fn column_ramp(site: &Site, scale: f64) -> f64 {
    scale * site.x as f64
}

#[test]
fn convolve_procedural_reg() {
    let mut rp = RegParams::new("convolve_procedural");

    let ones = Grid::new_with_value(4, 1, 1.0f64).expect("ones");
    let mut kernel = ProceduralKernel::new(1, 1, column_ramp, 1.0).expect("kernel");

    // --- Test 1: Weights follow the absolute tap coordinate ---
    let out = convolve_linear(&ones, &kernel).expect("pass 1");
    for x in 0..4 {
        rp.compare_values(x as f64, out.get_pixel(x, 0).unwrap(), 0.0);
    }

    // --- Test 2: Widen between passes ---
    kernel.set_width(3).expect("set_width");
    kernel.set_param(2.0);
    let zero_ones = with_policy(ones.clone(), EdgePolicy::Zero);
    let out = convolve_linear(&zero_ones, &kernel).expect("pass 2");
    // At x = 1: 2 * (0 + 1 + 2)
    rp.compare_values(6.0, out.get_pixel(1, 0).unwrap(), 0.0);
    // At x = 3: 2 * (2 + 3), the tap at x = 4 is zero
    rp.compare_values(10.0, out.get_pixel(3, 0).unwrap(), 0.0);

    // --- Test 3: Materialised kernel gives the same weights ---
    let dense = kernel.materialize(Point::new(1, 0)).expect("materialize");
    for i in 0..dense.size() {
        rp.compare_values(
            kernel.weight_at_index(Point::new(1, 0), i).unwrap(),
            dense.get_index(i).unwrap(),
            0.0,
        );
    }

    assert!(rp.cleanup(), "convolve procedural regression test failed");
}
