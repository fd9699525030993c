//! Argument definitions for the `scour` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "scour",
    version,
    about = "Plan-driven cleaning for tabular data",
    long_about = "Profile a CSV table, build a cleaning plan (rule-based or \
                  advisor-suggested), run the fixed cleaning pipeline, and \
                  write the cleaned table with a full run report."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,
}

#[derive(Subcommand)]
pub enum Command {
    /// Clean a CSV file and write the cleaned table plus a run report.
    Clean(CleanArgs),

    /// Profile a CSV file and print the profile as JSON.
    Profile(ProfileArgs),

    /// List the cleaning steps in canonical pipeline order.
    Steps,
}

#[derive(Parser)]
pub struct CleanArgs {
    /// Path to the input CSV file.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Output path for the cleaned CSV (default: <input>.cleaned.csv).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output path for the run report JSON (default: <input>.report.json).
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Ask the LLM advisor for the plan, falling back to the rule engine.
    #[arg(long = "use-llm")]
    pub use_llm: bool,

    /// Model name forwarded to the advisor client.
    #[arg(long = "llm-model", value_name = "NAME")]
    pub llm_model: Option<String>,

    /// Force the imputation step off regardless of what the plan decides.
    #[arg(long = "no-impute")]
    pub no_impute: bool,

    /// Use an externally produced plan JSON instead of building one.
    ///
    /// The file is validated against the plan schema and sanitized before
    /// use; out-of-range parameters reset to their defaults.
    #[arg(long = "plan", value_name = "PATH", conflicts_with = "use_llm")]
    pub plan: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ProfileArgs {
    /// Path to the input CSV file.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,
}
