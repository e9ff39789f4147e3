//! recurrence-explorer - sweep k and count steps until d >= 0
//!
//! Usage:
//!   recurrence-explorer                      # default 99-point sweep + plot
//!   recurrence-explorer sweep --steps 199    # finer sweep
//!   recurrence-explorer trace --k 0.001      # per-step series at one k
//!
//! Sweep rows go to stdout as `k ; approx`; logs go to stderr
//! (`RUST_LOG=recurrence_explorer=debug` for per-step detail).

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use recurrence_explorer::config::{
    Cli, Command, SweepArgs, TraceArgs, DEFAULT_SWEEP_PLOT, DEFAULT_TRACE_PLOT,
};
use recurrence_explorer::plot::{write_svg, Scatter};
use recurrence_explorer::spectrum::dominant_frequency;
use recurrence_explorer::sweep::run_sweep_with;
use recurrence_explorer::trace::run_trace;
use recurrence_explorer::{oscillator, SweepConfig, TraceConfig};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("recurrence_explorer=info".parse()?),
        )
        .with_writer(io::stderr)
        .init();

    match Cli::parse().into_command() {
        Command::Sweep(args) => sweep(&args),
        Command::Trace(args) => trace(&args),
    }
}

fn sweep(args: &SweepArgs) -> Result<()> {
    let config = SweepConfig::from(args);
    info!(steps = config.steps, max_iterations = config.max_iterations, "starting sweep");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut write_err = None;
    let result = run_sweep_with(&config, |row| {
        if write_err.is_none() {
            if let Err(e) = writeln!(out, "{row}") {
                write_err = Some(e);
            }
        }
    })
    .context("sweep failed")?;
    if let Some(e) = write_err {
        return Err(e).context("writing sweep rows");
    }
    out.flush()?;

    if let Some(path) = args.plot.target(DEFAULT_SWEEP_PLOT) {
        if result.is_empty() {
            info!("empty sweep, no plot written");
        } else {
            render(&Scatter::from_sweep(&result), &path)?;
        }
    }
    Ok(())
}

fn trace(args: &TraceArgs) -> Result<()> {
    let config = TraceConfig::from(args);
    let trace = run_trace(&config).with_context(|| format!("trace at k = {}", config.k))?;
    info!(k = trace.k, converged_at = trace.converged_at, "trace complete");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for &(n, s) in &trace.running_sum {
        writeln!(out, "{n} ; {s:.6}")?;
    }
    for &(n, v) in &trace.decay {
        writeln!(out, "{n} ; {v:.6}")?;
    }
    out.flush()?;

    if config.extra_steps > 0 && !trace.running_sum.is_empty() {
        if let (Some(measured), Ok(predicted)) =
            (dominant_frequency(&trace.sums()), oscillator::frequency(config.k))
        {
            info!(measured, predicted, "oscillation frequency (cycles/step)");
        }
    }

    if let Some(path) = args.plot.target(DEFAULT_TRACE_PLOT) {
        render(&Scatter::from_trace(&trace), &path)?;
    }
    Ok(())
}

fn render(scatter: &Scatter, path: &Path) -> Result<()> {
    write_svg(scatter, path).with_context(|| format!("writing plot to {}", path.display()))
}
