//! Command-line configuration.
//!
//! Parsed once in `main` and converted into the plain library configs
//! ([`SweepConfig`], [`TraceConfig`]) so nothing below the binary depends on
//! clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::recurrence::DEFAULT_MAX_ITERATIONS;
use crate::sweep::{SweepConfig, DEFAULT_STEPS, DEFAULT_UPPER, MAX_STEPS};
use crate::trace::{TraceConfig, TraceSeries, DEFAULT_TRACE_K, MAX_EXTRA_STEPS};

pub const DEFAULT_SWEEP_PLOT: &str = "target/plots/recurrence_sweep.svg";
pub const DEFAULT_TRACE_PLOT: &str = "target/plots/recurrence_trace.svg";

#[derive(Debug, Parser)]
#[command(name = "recurrence-explorer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sweep k and count recurrence steps until d >= 0", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Subcommand to run; a bare invocation is a default sweep.
    pub fn into_command(self) -> Command {
        self.command
            .unwrap_or_else(|| Command::Sweep(SweepArgs::default()))
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sweep k over (0, 0.1) and plot steps-to-converge
    Sweep(SweepArgs),
    /// Record per-step series for a single k
    Trace(TraceArgs),
}

/// Plot destination shared by both subcommands.
#[derive(Debug, Clone, Args)]
pub struct PlotArgs {
    /// Where to write the SVG scatter plot
    #[arg(long)]
    pub plot: Option<PathBuf>,

    /// Skip rendering the plot
    #[arg(long, conflicts_with = "plot")]
    pub no_plot: bool,
}

impl PlotArgs {
    /// Resolved plot path, or `None` when plotting is disabled.
    pub fn target(&self, default: &str) -> Option<PathBuf> {
        if self.no_plot {
            None
        } else {
            Some(self.plot.clone().unwrap_or_else(|| PathBuf::from(default)))
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct SweepArgs {
    /// Number of k values, evenly spaced in (0, 0.1)
    #[arg(
        long,
        default_value_t = DEFAULT_STEPS,
        value_parser = clap::value_parser!(u32).range(0..=MAX_STEPS as i64)
    )]
    pub steps: u32,

    /// Iteration cap per k before reporting non-convergence
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub max_iterations: u64,

    #[command(flatten)]
    pub plot: PlotArgs,
}

impl Default for SweepArgs {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STEPS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            plot: PlotArgs { plot: None, no_plot: false },
        }
    }
}

impl From<&SweepArgs> for SweepConfig {
    fn from(args: &SweepArgs) -> Self {
        SweepConfig {
            steps: args.steps,
            upper: DEFAULT_UPPER,
            max_iterations: args.max_iterations,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeriesArg {
    RunningSum,
    Decay,
    Both,
}

impl From<SeriesArg> for TraceSeries {
    fn from(arg: SeriesArg) -> Self {
        match arg {
            SeriesArg::RunningSum => TraceSeries::RunningSum,
            SeriesArg::Decay => TraceSeries::Decay,
            SeriesArg::Both => TraceSeries::Both,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct TraceArgs {
    /// Parameter k (must be > 0)
    #[arg(long, default_value_t = DEFAULT_TRACE_K)]
    pub k: f64,

    /// Which per-step series to record
    #[arg(long, value_enum, default_value_t = SeriesArg::Both)]
    pub series: SeriesArg,

    /// Extra steps to record after convergence
    #[arg(
        long,
        default_value_t = 0,
        value_parser = clap::value_parser!(u64).range(0..=MAX_EXTRA_STEPS)
    )]
    pub extra_steps: u64,

    /// Iteration cap before reporting non-convergence
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub max_iterations: u64,

    #[command(flatten)]
    pub plot: PlotArgs,
}

impl From<&TraceArgs> for TraceConfig {
    fn from(args: &TraceArgs) -> Self {
        TraceConfig {
            k: args.k,
            series: args.series.into(),
            extra_steps: args.extra_steps,
            max_iterations: args.max_iterations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_is_default_sweep() {
        let cli = Cli::try_parse_from(["recurrence-explorer"]).unwrap();
        match cli.into_command() {
            Command::Sweep(args) => {
                assert_eq!(SweepConfig::from(&args), SweepConfig::default());
                assert_eq!(
                    args.plot.target(DEFAULT_SWEEP_PLOT),
                    Some(PathBuf::from(DEFAULT_SWEEP_PLOT))
                );
            }
            other => panic!("expected sweep, got {other:?}"),
        }
    }

    #[test]
    fn sweep_flags_map_to_config() {
        let cli = Cli::try_parse_from([
            "recurrence-explorer",
            "sweep",
            "--steps",
            "9",
            "--max-iterations",
            "50",
            "--no-plot",
        ])
        .unwrap();
        let Command::Sweep(args) = cli.into_command() else {
            panic!("expected sweep");
        };
        let cfg = SweepConfig::from(&args);
        assert_eq!(cfg.steps, 9);
        assert_eq!(cfg.max_iterations, 50);
        assert_eq!(args.plot.target(DEFAULT_SWEEP_PLOT), None);
    }

    #[test]
    fn trace_flags_map_to_config() {
        let cli = Cli::try_parse_from([
            "recurrence-explorer",
            "trace",
            "--k",
            "0.02",
            "--series",
            "running-sum",
            "--extra-steps",
            "200",
            "--plot",
            "out/t.svg",
        ])
        .unwrap();
        let Command::Trace(args) = cli.into_command() else {
            panic!("expected trace");
        };
        let cfg = TraceConfig::from(&args);
        assert_eq!(cfg.k, 0.02);
        assert_eq!(cfg.series, TraceSeries::RunningSum);
        assert_eq!(cfg.extra_steps, 200);
        assert_eq!(args.plot.target(DEFAULT_TRACE_PLOT), Some(PathBuf::from("out/t.svg")));
    }

    #[test]
    fn trace_defaults_match_reference_experiment() {
        let cli = Cli::try_parse_from(["recurrence-explorer", "trace"]).unwrap();
        let Command::Trace(args) = cli.into_command() else {
            panic!("expected trace");
        };
        assert_eq!(TraceConfig::from(&args), TraceConfig::default());
    }

    #[test]
    fn steps_bounded_at_max() {
        let at_max = MAX_STEPS.to_string();
        let above = (MAX_STEPS as u64 + 1).to_string();
        let word_max = u32::MAX.to_string();

        let cli = Cli::try_parse_from(["recurrence-explorer", "sweep", "--steps", at_max.as_str()]).unwrap();
        let Command::Sweep(args) = cli.into_command() else {
            panic!("expected sweep");
        };
        assert_eq!(args.steps, MAX_STEPS);

        for v in [&above, &word_max] {
            let res = Cli::try_parse_from(["recurrence-explorer", "sweep", "--steps", v.as_str()]);
            assert!(res.is_err(), "--steps {v} accepted");
        }
    }

    #[test]
    fn extra_steps_bounded_at_max() {
        let at_max = MAX_EXTRA_STEPS.to_string();
        let above = (MAX_EXTRA_STEPS + 1).to_string();

        assert!(Cli::try_parse_from(["recurrence-explorer", "trace", "--extra-steps", at_max.as_str()]).is_ok());
        assert!(Cli::try_parse_from(["recurrence-explorer", "trace", "--extra-steps", above.as_str()]).is_err());
    }

    #[test]
    fn plot_and_no_plot_conflict() {
        let res = Cli::try_parse_from([
            "recurrence-explorer",
            "sweep",
            "--plot",
            "a.svg",
            "--no-plot",
        ]);
        assert!(res.is_err());
    }
}
