//! Error types for the recurrence explorer.

/// Errors surfaced by sweeps, traces and plot rendering.
#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    /// `k` must be finite and strictly positive
    #[error("invalid parameter k = {k}: must be finite and > 0")]
    InvalidParameter { k: f64 },

    /// The recurrence hit its iteration cap with `d` still negative
    #[error("recurrence did not converge for k = {k} within {iterations} iterations")]
    NonConvergence { k: f64, iterations: u64 },

    /// `s` or `d` overflowed to a non-finite value
    #[error("trajectory for k = {k} left the finite range at step {step}")]
    Diverged { k: f64, step: u64 },

    /// Plot backend or layout failure
    #[error("plot rendering failed: {0}")]
    Plot(String),

    /// Filesystem failure while writing output
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for explorer operations.
pub type Result<T> = std::result::Result<T, ExplorerError>;
