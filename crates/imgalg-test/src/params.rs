//! Regression test parameters and operations

use std::fmt::Display;

use imgalg_core::{Grid, Sample};

use crate::error::TestError;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Compare results against expected values (default)
    #[default]
    Compare,
    /// Compare, and also dump every grid checked to stderr
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("REGTEST_MODE").unwrap_or_default())
    }

    /// Parse mode from a string; anything unrecognised is `Compare`
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the test name, the running check index, the mode, and every
/// failure seen so far. Checks never panic; call [`cleanup`](Self::cleanup)
/// at the end and assert on its result.
pub struct RegParams {
    /// Name of the test (e.g., "convolve")
    pub test_name: String,
    /// Current check index (incremented before each check)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    /// Recorded failures
    failures: Vec<TestError>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// The mode comes from the `REGTEST_MODE` environment variable.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            failures: Vec::new(),
        }
    }

    /// Get the current check index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn record(&mut self, failure: TestError) {
        eprintln!("Failure in {}_reg: {}", self.test_name, failure);
        self.failures.push(failure);
    }

    /// Compare two floating-point values
    ///
    /// # Returns
    ///
    /// `true` if `|expected - actual| <= delta`, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta || diff.is_nan() {
            self.record(TestError::ValueMismatch {
                index: self.index,
                expected,
                actual,
                delta,
            });
            false
        } else {
            true
        }
    }

    /// Compare two grids sample by sample
    ///
    /// Shapes must match exactly; samples may differ by at most `delta`
    /// after widening to `f64`.
    pub fn compare_grids<T: Sample>(&mut self, expected: &Grid<T>, actual: &Grid<T>, delta: f64) -> bool {
        self.index += 1;

        if self.display() {
            dump_grid("expected", expected);
            dump_grid("actual", actual);
        }

        if expected.dimensions() != actual.dimensions() {
            eprintln!(
                "  dimension mismatch: {:?} vs {:?}",
                expected.dimensions(),
                actual.dimensions()
            );
            self.record(TestError::GridMismatch { index: self.index });
            return false;
        }

        let width = expected.width() as usize;
        for (i, (&e, &a)) in expected.data().iter().zip(actual.data()).enumerate() {
            let diff = (e.to_f64_lossy() - a.to_f64_lossy()).abs();
            if diff > delta || diff.is_nan() {
                eprintln!(
                    "  sample mismatch at ({}, {}): {:?} vs {:?}",
                    i % width,
                    i / width,
                    e,
                    a
                );
                self.record(TestError::GridMismatch { index: self.index });
                return false;
            }
        }

        true
    }

    /// Check that a fallible operation failed
    ///
    /// Records a failure if `result` is `Ok`.
    pub fn expect_error<V, E: Display>(&mut self, result: Result<V, E>) -> bool {
        self.index += 1;
        match result {
            Err(e) => {
                if self.display() {
                    eprintln!("  expected error: {}", e);
                }
                true
            }
            Ok(_) => {
                self.record(TestError::UnexpectedSuccess { index: self.index });
                false
            }
        }
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all checks passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        let success = self.failures.is_empty();
        if success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        success
    }

    /// Check if all checks have passed so far
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Get list of failures
    pub fn failures(&self) -> &[TestError] {
        &self.failures
    }
}

/// Print a grid row by row to stderr
fn dump_grid<T: Sample>(label: &str, grid: &Grid<T>) {
    eprintln!(
        "  {} ({}x{}, {}):",
        label,
        grid.width(),
        grid.height(),
        grid.edge_policy()
    );
    for y in 0..grid.height() {
        eprintln!("    {:?}", grid.row(y));
    }
}
