//! Parameter sweep and analysis of a damped second-order recurrence.
//!
//! For each `k` in a sweep over (0, 0.1), iterate
//!
//!   s ← s + k·(1 − d),   d ← d + s
//!
//! from `d = −1`, `s = 0` and count the steps `n` until `d ≥ 0`. The sweep
//! prints `k ; (π/(2n))²/2` per step and plots `(k, n)`.
//!
//! # Modules
//!
//! - [`recurrence`]  the update rule, bounded run and stopping condition
//! - [`sweep`]       the 99-point parameter sweep and its printed rows
//! - [`trace`]       per-step series `(n, s)` and `(n, 0.5^(k/n))` at fixed k
//! - [`oscillator`]  closed form: the step map is a rotation by θ, cos θ = 1 − k/2
//! - [`spectrum`]    FFT of a long trace, checked against θ/2π
//! - [`plot`]        SVG scatter plots of sweeps and traces
//! - [`config`]      command-line flags for the `recurrence-explorer` binary
//!
//! # Running tests
//!
//! ```bash
//! cargo test -- --nocapture
//! ```
//!
//! The `*_print_*` tests emit diagnostic tables; they assert nothing beyond
//! the computations succeeding.

pub mod config;
pub mod error;
pub mod oscillator;
pub mod plot;
pub mod recurrence;
pub mod spectrum;
pub mod sweep;
pub mod trace;

pub use error::{ExplorerError, Result};
pub use recurrence::{Outcome, RecurrenceState};
pub use sweep::{run_sweep, SweepConfig, SweepResult, SweepRow};
pub use trace::{run_trace, Trace, TraceConfig, TraceSeries};
