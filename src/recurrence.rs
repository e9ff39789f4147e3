//! The damped second-order recurrence and its stopping rule.
//!
//! ## Recurrence
//!
//! Starting from `d = −1`, `s = 0`, `n = 0`, one step is:
//!
//!   s ← s + k·(1 − d)
//!   d ← d + s
//!   n ← n + 1
//!
//! The loop runs while `d < 0` (checked at entry). Because `d` starts
//! negative the body always runs at least once, so a converged count is
//! `n ≥ 1`.
//!
//! ## Bounded loop
//!
//! Termination is not proven for arbitrary `k`, so [`run`] takes an explicit
//! iteration cap and reports [`Outcome::Unconverged`] when it is exhausted.
//! Callers that need a count use [`steps_to_converge`], which turns the
//! unconverged case into [`ExplorerError::NonConvergence`].

use std::f64::consts::PI;

use tracing::warn;

use crate::error::{ExplorerError, Result};

/// Default cap on recurrence steps. Far above anything the sweep needs
/// (n = 33 at k = 0.001).
pub const DEFAULT_MAX_ITERATIONS: u64 = 1_000_000;

/// `(d, s, n)` for one run of the recurrence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecurrenceState {
    pub d: f64,
    pub s: f64,
    pub n: u64,
}

impl RecurrenceState {
    /// `d = −1`, `s = 0`, `n = 0`.
    pub const fn initial() -> Self {
        Self { d: -1.0, s: 0.0, n: 0 }
    }

    /// Apply one update. Order matters: `s` uses the old `d`, `d` uses the new `s`.
    pub fn step(&mut self, k: f64) {
        self.s += k * (1.0 - self.d);
        self.d += self.s;
        self.n += 1;
    }

    pub fn is_converged(&self) -> bool {
        self.d >= 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.s.is_finite() && self.d.is_finite()
    }

    /// Step, failing if the update overflows.
    pub fn checked_step(&mut self, k: f64) -> Result<()> {
        self.step(k);
        if self.is_finite() {
            Ok(())
        } else {
            warn!(k, step = self.n, s = self.s, d = self.d, "trajectory overflowed");
            Err(ExplorerError::Diverged { k, step: self.n })
        }
    }
}

impl Default for RecurrenceState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Result of a bounded run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// `d ≥ 0` first held after `n` steps.
    Converged { n: u64, state: RecurrenceState },
    /// Cap reached with `d` still negative.
    Unconverged { iterations: u64, state: RecurrenceState },
}

impl Outcome {
    /// Iteration count if converged.
    pub fn steps(&self) -> Option<u64> {
        match self {
            Outcome::Converged { n, .. } => Some(*n),
            Outcome::Unconverged { .. } => None,
        }
    }

    pub fn state(&self) -> &RecurrenceState {
        match self {
            Outcome::Converged { state, .. } | Outcome::Unconverged { state, .. } => state,
        }
    }

    /// Convert into a count, mapping the unconverged case to an error for `k`.
    pub fn into_steps(self, k: f64) -> Result<u64> {
        match self {
            Outcome::Converged { n, .. } => Ok(n),
            Outcome::Unconverged { iterations, .. } => {
                Err(ExplorerError::NonConvergence { k, iterations })
            }
        }
    }
}

/// Reject `k` that is non-finite or not strictly positive.
pub fn validate_k(k: f64) -> Result<()> {
    if k.is_finite() && k > 0.0 {
        Ok(())
    } else {
        Err(ExplorerError::InvalidParameter { k })
    }
}

/// Run the recurrence for `k` until `d ≥ 0` or `max_iterations` steps.
pub fn run(k: f64, max_iterations: u64) -> Result<Outcome> {
    validate_k(k)?;

    let mut state = RecurrenceState::initial();
    while !state.is_converged() {
        if state.n >= max_iterations {
            warn!(k, iterations = state.n, d = state.d, "recurrence hit iteration cap");
            return Ok(Outcome::Unconverged { iterations: state.n, state });
        }
        state.checked_step(k)?;
    }
    Ok(Outcome::Converged { n: state.n, state })
}

/// Number of steps until `d ≥ 0`, or [`ExplorerError::NonConvergence`].
pub fn steps_to_converge(k: f64, max_iterations: u64) -> Result<u64> {
    run(k, max_iterations)?.into_steps(k)
}

/// Candidate closed form for `k` given `n`:
///
///   approx(n) = (π / (2n))² / 2
///
/// A diagnostic guess only. The exact relation is in [`crate::oscillator`].
pub fn approximation(n: u64) -> f64 {
    let q = PI / (2.0 * n as f64);
    q * q / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Regression fixture: k = 0.001 ────────────────────────────────────────

    /// Pinned from the reference run. The final state is bit-reproducible
    /// because every step is the same two IEEE additions and one multiply.
    #[test]
    fn k_0001_converges_in_33_steps() {
        let outcome = run(0.001, DEFAULT_MAX_ITERATIONS).unwrap();
        assert_eq!(outcome.steps(), Some(33));

        let st = outcome.state();
        assert!((st.d - 0.021_099_305_652_125_83).abs() < 1e-15, "d = {}", st.d);
        assert!((st.s - 0.054_664_815_056_760_14).abs() < 1e-15, "s = {}", st.s);
    }

    #[test]
    fn body_runs_at_least_once() {
        // k = 1: s = 2, d = 1 after the first step.
        let outcome = run(1.0, DEFAULT_MAX_ITERATIONS).unwrap();
        assert_eq!(outcome.steps(), Some(1));
        assert_eq!(outcome.state().s, 2.0);
        assert_eq!(outcome.state().d, 1.0);
    }

    #[test]
    fn converged_state_is_first_non_negative_d() {
        let k = 0.02;
        let n = steps_to_converge(k, DEFAULT_MAX_ITERATIONS).unwrap();

        let mut st = RecurrenceState::initial();
        for _ in 0..n - 1 {
            st.step(k);
            assert!(st.d < 0.0, "d became non-negative early at n={}", st.n);
        }
        st.step(k);
        assert!(st.d >= 0.0);
    }

    // ── Bounded loop ─────────────────────────────────────────────────────────

    #[test]
    fn cap_below_true_count_is_unconverged() {
        let outcome = run(0.001, 10).unwrap();
        match outcome {
            Outcome::Unconverged { iterations, state } => {
                assert_eq!(iterations, 10);
                assert!(state.d < 0.0);
            }
            other => panic!("expected Unconverged, got {other:?}"),
        }

        let err = steps_to_converge(0.001, 10).unwrap_err();
        assert!(
            matches!(err, ExplorerError::NonConvergence { iterations: 10, .. }),
            "unexpected error {err}"
        );
    }

    #[test]
    fn cap_equal_to_true_count_still_converges() {
        assert_eq!(steps_to_converge(0.001, 33).unwrap(), 33);
    }

    #[test]
    fn rejects_invalid_k() {
        for k in [0.0, -0.01, f64::NAN, f64::INFINITY] {
            let err = run(k, DEFAULT_MAX_ITERATIONS).unwrap_err();
            assert!(matches!(err, ExplorerError::InvalidParameter { .. }), "k={k}: {err}");
        }
    }

    /// k near f64::MAX makes `k·(1 − d)` overflow on the first step.
    #[test]
    fn overflowing_trajectory_is_diverged() {
        let err = run(1e308, DEFAULT_MAX_ITERATIONS).unwrap_err();
        assert!(
            matches!(err, ExplorerError::Diverged { step: 1, .. }),
            "unexpected error {err}"
        );
    }

    // ── Approximation diagnostic ─────────────────────────────────────────────

    #[test]
    fn approximation_matches_reference_values() {
        // (π/66)²/2 and (π/6)²/2
        assert!((approximation(33) - 0.001_132_875).abs() < 1e-9);
        assert!((approximation(3) - 0.137_077_838).abs() < 1e-9);
    }
}
