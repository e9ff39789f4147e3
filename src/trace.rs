//! Single-parameter trace: record the recurrence step by step at fixed `k`.
//!
//! Where the sweep keeps only the final count, a trace keeps the per-step
//! series:
//!
//!   - running sum:  (n, s_n)
//!   - decay:        (n, 0.5^(k/n))
//!
//! Both are recorded by default. A trace may continue past convergence for
//! `extra_steps` more steps, which exposes the full oscillation for
//! [`crate::spectrum`].

use tracing::{debug, warn};

use crate::error::{ExplorerError, Result};
use crate::recurrence::{validate_k, RecurrenceState, DEFAULT_MAX_ITERATIONS};

/// `k` used by the reference trace.
pub const DEFAULT_TRACE_K: f64 = 0.001;

/// Upper limit on steps recorded past convergence.
pub const MAX_EXTRA_STEPS: u64 = 1_000_000;

/// Which per-step series to record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceSeries {
    RunningSum,
    Decay,
    #[default]
    Both,
}

impl TraceSeries {
    fn running_sum(self) -> bool {
        matches!(self, TraceSeries::RunningSum | TraceSeries::Both)
    }

    fn decay(self) -> bool {
        matches!(self, TraceSeries::Decay | TraceSeries::Both)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceConfig {
    pub k: f64,
    pub series: TraceSeries,
    /// Steps to keep recording after `d ≥ 0`.
    pub extra_steps: u64,
    pub max_iterations: u64,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_TRACE_K,
            series: TraceSeries::default(),
            extra_steps: 0,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Recorded series for one `k`.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub k: f64,
    /// Step at which `d ≥ 0` first held.
    pub converged_at: u64,
    pub running_sum: Vec<(u64, f64)>,
    pub decay: Vec<(u64, f64)>,
}

impl Trace {
    /// `s` values in step order, for spectral analysis.
    pub fn sums(&self) -> Vec<f64> {
        self.running_sum.iter().map(|&(_, s)| s).collect()
    }
}

/// `0.5^(k/n)` for step `n ≥ 1`.
pub fn decay_value(k: f64, n: u64) -> f64 {
    0.5f64.powf(k / n as f64)
}

/// Run the recurrence at `config.k`, recording the selected series after
/// every step.
pub fn run_trace(config: &TraceConfig) -> Result<Trace> {
    let k = config.k;
    validate_k(k)?;

    let mut trace = Trace {
        k,
        converged_at: 0,
        running_sum: Vec::new(),
        decay: Vec::new(),
    };
    let mut state = RecurrenceState::initial();

    let record = |st: &RecurrenceState, trace: &mut Trace| {
        if config.series.running_sum() {
            trace.running_sum.push((st.n, st.s));
        }
        if config.series.decay() {
            trace.decay.push((st.n, decay_value(k, st.n)));
        }
    };

    while !state.is_converged() {
        if state.n >= config.max_iterations {
            warn!(k, iterations = state.n, "trace hit iteration cap");
            return Err(ExplorerError::NonConvergence { k, iterations: state.n });
        }
        state.checked_step(k)?;
        record(&state, &mut trace);
    }
    trace.converged_at = state.n;

    for _ in 0..config.extra_steps {
        state.checked_step(k)?;
        record(&state, &mut trace);
    }

    debug!(
        k,
        converged_at = trace.converged_at,
        recorded = state.n,
        "trace complete"
    );
    Ok(trace)
}
