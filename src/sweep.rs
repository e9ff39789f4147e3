//! Parameter sweep over `k` and the per-step diagnostic line.
//!
//! ## Sweep grid
//!
//!   k_i = i / (steps + 1) · upper,   i = 1 … steps
//!
//! With the defaults (`steps = 99`, `upper = 0.1`) this is `i / 100 · 0.1`,
//! evaluated in the same operation order so the floats are bit-identical to
//! the reference run: 0.001, 0.002, …, 0.099, all strictly inside (0, 0.1).
//!
//! ## Output
//!
//! The sweep returns the two parallel sequences `x` (every `k`) and `y`
//! (every converged `n`). Nothing is kept between calls, so two sweeps with
//! the same config give identical results.

use std::fmt;

use tracing::{debug, info};

use crate::error::Result;
use crate::recurrence::{approximation, steps_to_converge, DEFAULT_MAX_ITERATIONS};

/// Number of swept `k` values in the reference experiment.
pub const DEFAULT_STEPS: u32 = 99;

/// Largest sweep the CLI accepts.
pub const MAX_STEPS: u32 = 1_000_000;

/// Exclusive upper bound of the swept interval.
pub const DEFAULT_UPPER: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepConfig {
    pub steps: u32,
    pub upper: f64,
    pub max_iterations: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STEPS,
            upper: DEFAULT_UPPER,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SweepConfig {
    /// `k` for sweep index `i` (1-based).
    pub fn k_at(&self, i: u32) -> f64 {
        i as f64 / (self.steps as f64 + 1.0) * self.upper
    }

    /// All swept `k`, in increasing order.
    pub fn parameters(&self) -> impl Iterator<Item = f64> + '_ {
        (1..=self.steps).map(move |i| self.k_at(i))
    }
}

/// One sweep step: parameter, converged count and the printed diagnostic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepRow {
    pub index: u32,
    pub k: f64,
    pub n: u64,
    pub approx: f64,
}

impl fmt::Display for SweepRow {
    /// `"<k> ; <approx>"`, six decimals each.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6} ; {:.6}", self.k, self.approx)
    }
}

/// Collected `(k, n)` pairs as two parallel sequences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepResult {
    pub x: Vec<f64>,
    pub y: Vec<u64>,
}

impl SweepResult {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Rebuild the per-step rows, including the approximation column.
    pub fn rows(&self) -> impl Iterator<Item = SweepRow> + '_ {
        self.x.iter().zip(&self.y).enumerate().map(|(i, (&k, &n))| SweepRow {
            index: i as u32 + 1,
            k,
            n,
            approx: approximation(n),
        })
    }

    /// `(k, n)` as plot coordinates.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.x.iter().zip(&self.y).map(|(&k, &n)| (k, n as f64)).collect()
    }
}

/// Run the sweep, collecting every `(k, n)`.
pub fn run_sweep(config: &SweepConfig) -> Result<SweepResult> {
    run_sweep_with(config, |_| {})
}

/// Run the sweep, handing each row to `on_row` as soon as it is computed.
///
/// Stops at the first `k` that fails to converge within
/// `config.max_iterations` and returns that error.
pub fn run_sweep_with<F>(config: &SweepConfig, mut on_row: F) -> Result<SweepResult>
where
    F: FnMut(&SweepRow),
{
    let cap = config.steps.min(MAX_STEPS) as usize;
    let mut result = SweepResult {
        x: Vec::with_capacity(cap),
        y: Vec::with_capacity(cap),
    };

    for i in 1..=config.steps {
        let k = config.k_at(i);
        let n = steps_to_converge(k, config.max_iterations)?;
        let row = SweepRow { index: i, k, n, approx: approximation(n) };
        debug!(index = i, k, n, approx = row.approx, "sweep step");

        result.x.push(k);
        result.y.push(n);
        on_row(&row);
    }

    info!(
        steps = result.len(),
        n_max = result.y.first().copied().unwrap_or(0),
        n_min = result.y.last().copied().unwrap_or(0),
        "sweep complete"
    );
    Ok(result)
}
