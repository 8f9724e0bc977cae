use clap::{Args, Parser, Subcommand};

use crate::digits::common::{DEFAULT_CONTEXT_RADIUS, DEFAULT_MAX_ITERATIONS, DEFAULT_OUTPUT_PATH};

#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct RootTwoDigitsArgs {
    #[command(subcommand)]
    pub command: Option<CommandsEnum>,
}

#[derive(Debug, Subcommand)]
pub enum CommandsEnum {
    /// Compute the digits and write them to a file.
    Compute(ComputeArgs),
    /// Check a persisted digit file against an independent reference.
    Verify(VerifyArgs),
    /// Compute, persist and verify, driven by a JSON parameter file.
    Run(ParameterFilePath),
}

#[derive(Debug, Args)]
pub struct ComputeArgs {
    /// Number of fractional digits. Negative values are rejected.
    #[clap(allow_negative_numbers = true)]
    pub decimal_places: i64,

    #[clap(long, short, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: String,

    #[clap(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub max_iterations: usize,

    /// Log solver progress every this many iterations.
    #[clap(long, default_value_t = 1)]
    pub progress_every: usize,

    /// Also echo the digits to stdout.
    #[clap(long, short)]
    pub print: bool,
}

#[derive(Debug, Args)]
pub struct VerifyArgs {
    pub digits_path: String,

    #[clap(allow_negative_numbers = true)]
    pub decimal_places: i64,

    #[clap(long, default_value_t = DEFAULT_CONTEXT_RADIUS)]
    pub context_radius: usize,
}

#[derive(Debug, Args)]
pub struct ParameterFilePath {
    pub params_path: String,

    #[clap(long, short)]
    pub date_time_out: bool,
}
