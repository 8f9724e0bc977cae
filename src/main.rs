use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use root_two_digits::cli::args::{CommandsEnum, RootTwoDigitsArgs};
use root_two_digits::cli::compute::compute_to_file;
use root_two_digits::cli::run::run_from_params_file;
use root_two_digits::cli::verify::verify_persisted;
use root_two_digits::Result;

fn main() -> ExitCode {
    // Log to stderr so that `compute --print` output stays clean.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: RootTwoDigitsArgs = RootTwoDigitsArgs::parse();

    let outcome: Result<()> = match &args.command {
        Some(CommandsEnum::Compute(params)) => compute_to_file(params).map(|_| ()),
        Some(CommandsEnum::Verify(params)) => verify_persisted(params).map(|_| ()),
        Some(CommandsEnum::Run(params)) => {
            run_from_params_file(params).and_then(|summary| summary.verification.into_result().map(|_| ()))
        }
        None => {
            info!("Default command (nothing specified!)");
            Ok(())
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::from(err.exit_code())
        }
    }
}
