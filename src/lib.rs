//! Square root of two to an arbitrary number of decimal places.
//!
//! A Newton solver running under a scoped precision context, a truncating
//! fixed-point formatter, and a verifier that re-derives the digits along an
//! independent path and compares them exactly.

pub mod cli;
pub mod core;
pub mod digits;
pub mod error;

pub use digits::common::DecimalPlaces;
pub use digits::formatter::{format_fixed, DigitString};
pub use digits::solver::{solve, Solution};
pub use digits::verifier::{verify, VerificationReport};
pub use error::{DigitsError, Result};
