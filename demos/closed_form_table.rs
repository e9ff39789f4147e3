//! Closed-form vs iterated step counts across the sweep.
//!
//! Answers three questions about the printed approximation:
//!
//! 1. Does the rotation model reproduce every iterated count?
//! 2. How far is `n` from the `1/√k` and `(π/3)/√k` estimates?
//! 3. How close is `(π/(2n))²/2` to the `k` it was meant to recover?
//!
//! Run: `cargo run --example closed_form_table --release`

use std::f64::consts::PI;

use recurrence_explorer::oscillator::{crossing_time, frequency, predicted_steps};
use recurrence_explorer::recurrence::{approximation, DEFAULT_MAX_ITERATIONS};
use recurrence_explorer::spectrum::dominant_frequency;
use recurrence_explorer::{run_sweep, run_trace, SweepConfig, TraceConfig, TraceSeries};

const FFT_SAMPLES: u64 = 2048;

fn main() -> recurrence_explorer::Result<()> {
    let sweep = run_sweep(&SweepConfig::default())?;

    // ─── 1 + 2: counts ────────────────────────────────────────────────────────

    println!("\n══ Step counts ═══════════════════════════════════════════════════════");
    println!(
        "{:>8}  {:>4}  {:>6}  {:>8}  {:>8}  {:>10}",
        "k", "n", "model", "t*", "1/√k", "(π/3)/√k"
    );
    println!("{}", "─".repeat(54));

    let mut mismatches = 0;
    for row in sweep.rows() {
        let model = predicted_steps(row.k, DEFAULT_MAX_ITERATIONS)?;
        if model != row.n {
            mismatches += 1;
        }
        if row.index % 5 == 1 {
            println!(
                "{:>8.4}  {:>4}  {:>6}  {:>8.3}  {:>8.3}  {:>10.3}",
                row.k,
                row.n,
                model,
                crossing_time(row.k)?,
                1.0 / row.k.sqrt(),
                PI / 3.0 / row.k.sqrt(),
            );
        }
    }
    println!("model mismatches: {mismatches} / {}", sweep.len());

    // ─── 3: printed approximation ─────────────────────────────────────────────

    println!("\n══ (π/(2n))²/2 as an estimate of k ═══════════════════════════════════");
    let (mut worst_k, mut worst_rel) = (0.0, 0.0f64);
    for row in sweep.rows() {
        let rel = (approximation(row.n) - row.k).abs() / row.k;
        if rel > worst_rel {
            worst_rel = rel;
            worst_k = row.k;
        }
    }
    println!("worst relative error {:.1}% at k = {worst_k:.4}", worst_rel * 100.0);

    // ─── spectral cross-check ─────────────────────────────────────────────────

    println!("\n══ FFT peak vs θ/2π ({FFT_SAMPLES} samples) ══════════════════════════");
    for k in [0.002, 0.01, 0.05] {
        let converged = run_trace(&TraceConfig { k, ..TraceConfig::default() })?.converged_at;
        let trace = run_trace(&TraceConfig {
            k,
            series: TraceSeries::RunningSum,
            extra_steps: FFT_SAMPLES.saturating_sub(converged),
            ..TraceConfig::default()
        })?;
        let measured = dominant_frequency(&trace.sums()).unwrap_or(f64::NAN);
        println!("k = {k:.3}: FFT {measured:.5}  model {:.5}", frequency(k)?);
    }

    Ok(())
}
