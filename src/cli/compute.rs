use std::path::Path;

use tracing::info;

use crate::core::file_io::{sha256_hex, write_digit_string};
use crate::core::precision::ContextStack;
use crate::digits::common::DecimalPlaces;
use crate::digits::formatter::{format_fixed, DigitString};
use crate::digits::solver::{solve_in, Solution, TracingProgress};
use crate::error::Result;

use super::args::ComputeArgs;

/// Solve and format, logging progress every `progress_every` iterations.
pub fn compute_digits(
    decimal_places: DecimalPlaces,
    max_iterations: usize,
    progress_every: usize,
) -> Result<(Solution, DigitString)> {
    info!(
        decimal_places = decimal_places.get(),
        "Calculating the square root of 2"
    );
    let solution = solve_in(
        &mut ContextStack::default(),
        decimal_places,
        max_iterations,
        &mut TracingProgress::new(progress_every),
    )?;
    let digits = format_fixed(&solution.value, decimal_places);
    Ok((solution, digits))
}

pub fn compute_to_file(args: &ComputeArgs) -> Result<DigitString> {
    let decimal_places = DecimalPlaces::new(args.decimal_places)?;
    let (solution, digits) =
        compute_digits(decimal_places, args.max_iterations, args.progress_every)?;

    let output = Path::new(&args.output);
    write_digit_string(output, &digits)?;

    if args.print {
        println!("{}", digits);
    }
    info!(
        path = %output.display(),
        iterations = solution.iterations,
        total_characters = digits.char_count(),
        sha256 = %sha256_hex(digits.as_str().as_bytes()),
        "Wrote digits"
    );
    Ok(digits)
}
