use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::file_io::{
    build_output_path_with_date_time, compute_file_hash, extract_base_name,
    maybe_date_time_string, serialize_to_json, write_digit_string, FilePrefix,
};
use crate::core::stopwatch::Stopwatch;
use crate::digits::common::RunParams;
use crate::digits::verifier::{verify_file, VerificationReport};
use crate::error::Result;

use super::args::ParameterFilePath;
use super::compute::compute_digits;

/// Written next to the digits as `<base>_report.json`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub decimal_places: u64,
    pub iterations: usize,
    pub total_characters: usize,
    pub sha256: String,
    pub verification: VerificationReport,
}

/// Output directory is `out/sqrt2/<params base name>[/<date time>]`.
pub fn run_from_params_file(args: &ParameterFilePath) -> Result<RunSummary> {
    let params: RunParams = serde_json::from_str(&std::fs::read_to_string(&args.params_path)?)?;

    let file_prefix = FilePrefix {
        directory_path: build_output_path_with_date_time(
            &args.params_path,
            "sqrt2",
            &maybe_date_time_string(args.date_time_out),
        )?,
        file_base: extract_base_name(&args.params_path).to_owned(),
    };

    run_pipeline(&params, &file_prefix)
}

/// Compute, persist, then verify what was persisted. A mismatch is recorded
/// in the summary rather than returned as an error.
pub fn run_pipeline(params: &RunParams, file_prefix: &FilePrefix) -> Result<RunSummary> {
    let decimal_places = params.decimal_places()?;
    let mut stopwatch = Stopwatch::new("Digits Stopwatch");

    serialize_to_json(&file_prefix.with_suffix(".json"), params)?;
    stopwatch.record_split("basic setup");

    let (solution, digits) =
        compute_digits(decimal_places, params.max_iterations, params.progress_every)?;
    stopwatch.record_split("solve and format");

    let digits_path = file_prefix.with_suffix(".txt");
    write_digit_string(&digits_path, &digits)?;
    stopwatch.record_split("write digits");

    let verification = verify_file(&digits_path, decimal_places, params.context_radius)?;
    stopwatch.record_split("verify");

    let summary = RunSummary {
        decimal_places: decimal_places.get(),
        iterations: solution.iterations,
        total_characters: digits.char_count(),
        sha256: compute_file_hash(&digits_path)?,
        verification,
    };
    serialize_to_json(&file_prefix.with_suffix("_report.json"), &summary)?;

    let mut diagnostics_file = file_prefix.create_file_with_suffix("_diagnostics.txt")?;
    stopwatch.display(&mut diagnostics_file)?;

    info!(
        path = %digits_path.display(),
        total_characters = summary.total_characters,
        "{}",
        summary.verification
    );
    Ok(summary)
}
