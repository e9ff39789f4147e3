//! Spectral check of a recorded trace.
//!
//! The rotation model predicts that every state variable oscillates at
//! θ/2π cycles per step. Running a trace well past convergence and taking
//! its FFT recovers that frequency from the data alone, with no reference
//! to the closed form.
//!
//! ## Resolution
//!
//! For N samples the bin spacing is 1/N cycles per step, so the peak is only
//! located to within one bin. At k = 0.01 (θ/2π ≈ 0.0159) a 1024-step trace
//! puts the true frequency at bin ≈ 16.3.

use num_complex::Complex;
use rustfft::FftPlanner;

type Cx = Complex<f64>;

/// Magnitudes below this are treated as an empty spectrum.
const SILENCE: f64 = 1e-12;

/// One-sided magnitude spectrum of a real series, mean removed.
///
/// Returns bins `0 ..= N/2`; bin `j` is `j / N` cycles per step.
pub fn magnitude_spectrum(series: &[f64]) -> Vec<f64> {
    let n = series.len();
    if n == 0 {
        return Vec::new();
    }
    let mean = series.iter().sum::<f64>() / n as f64;

    let mut planner = FftPlanner::<f64>::new();
    let fwd = planner.plan_fft_forward(n);

    let mut buf: Vec<Cx> = series.iter().map(|&x| Cx::new(x - mean, 0.0)).collect();
    fwd.process(&mut buf);

    buf.iter().take(n / 2 + 1).map(|c| c.norm()).collect()
}

/// Peak frequency in cycles per step, ignoring DC.
///
/// `None` for series shorter than 4 samples or with no oscillating content.
pub fn dominant_frequency(series: &[f64]) -> Option<f64> {
    let n = series.len();
    if n < 4 {
        return None;
    }
    let spectrum = magnitude_spectrum(series);

    let (bin, &mag) = spectrum
        .iter()
        .enumerate()
        .skip(1)
        .max_by(|(_, a), (_, b)| a.total_cmp(b))?;
    if mag < SILENCE {
        return None;
    }
    Some(bin as f64 / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oscillator::frequency;
    use crate::trace::{run_trace, TraceConfig, TraceSeries};
    use std::f64::consts::PI;

    #[test]
    fn recovers_pure_tone_on_bin() {
        let n = 256;
        let f = 10.0 / n as f64;
        let tone: Vec<f64> = (0..n).map(|i| (2.0 * PI * f * i as f64).sin() + 3.0).collect();
        let got = dominant_frequency(&tone).unwrap();
        assert!((got - f).abs() < 1e-12, "got {got}, want {f}");
    }

    #[test]
    fn flat_and_short_series_have_no_peak() {
        assert_eq!(dominant_frequency(&[1.0; 64]), None);
        assert_eq!(dominant_frequency(&[0.0, 1.0, 0.0]), None);
        assert!(magnitude_spectrum(&[]).is_empty());
    }

    /// The FFT of a long running-sum trace lands within one bin of θ/2π.
    #[test]
    fn trace_frequency_matches_rotation_model() {
        let n_samples = 1024;
        for k in [0.005, 0.01, 0.05] {
            let trace = run_trace(&TraceConfig {
                k,
                series: TraceSeries::RunningSum,
                extra_steps: 0,
                ..TraceConfig::default()
            })
            .unwrap();
            let extra = n_samples - trace.converged_at;
            let trace = run_trace(&TraceConfig {
                k,
                series: TraceSeries::RunningSum,
                extra_steps: extra,
                ..TraceConfig::default()
            })
            .unwrap();
            let sums = trace.sums();
            assert_eq!(sums.len(), n_samples as usize);

            let measured = dominant_frequency(&sums).unwrap();
            let predicted = frequency(k).unwrap();
            let bin = 1.0 / n_samples as f64;
            assert!(
                (measured - predicted).abs() <= bin,
                "k={k}: FFT peak {measured:.5} vs θ/2π {predicted:.5} (bin {bin:.5})"
            );
        }
    }
}
