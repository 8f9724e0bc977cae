//! Independent re-derivation and exact comparison of persisted digits.
//!
//! The reference comes from the library square root at
//! `decimal_places + REFERENCE_EXTRA_DIGITS` significant digits, rounded
//! toward zero, and never touches the Newton solver. Comparison is exact,
//! character by character; nothing is ever repaired.

use std::fmt;
use std::path::Path;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::file_io::read_persisted_digits;
use crate::core::precision::PrecisionContext;
use crate::digits::common::{DecimalPlaces, DEFAULT_CONTEXT_RADIUS, REFERENCE_EXTRA_DIGITS};
use crate::digits::formatter::{format_fixed, DigitString};
use crate::error::{DigitsError, Result};

/// A window of both strings around the first mismatch.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MismatchContext {
    /// Character index at which both excerpts start.
    pub start: usize,
    pub persisted: String,
    pub reference: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    pub matched: bool,
    pub persisted_len: usize,
    pub reference_len: usize,
    /// Index of the first differing character, or of the end of the shorter
    /// string when one is a strict prefix of the other.
    pub first_mismatch: Option<usize>,
    pub context: Option<MismatchContext>,
}

impl VerificationReport {
    /// A mismatch becomes `DigitsError::VerificationMismatch`, carrying the report.
    pub fn into_result(self) -> Result<VerificationReport> {
        if self.matched {
            Ok(self)
        } else {
            Err(DigitsError::VerificationMismatch(Box::new(self)))
        }
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.matched {
            return write!(
                f,
                "verification passed: all {} characters match the reference",
                self.persisted_len
            );
        }
        write!(
            f,
            "verification failed: persisted length {}, reference length {}",
            self.persisted_len, self.reference_len
        )?;
        if let Some(index) = self.first_mismatch {
            write!(f, ", first mismatch at position {}", index)?;
        }
        if let Some(context) = &self.context {
            write!(
                f,
                " (from position {}: persisted '{}', reference '{}')",
                context.start, context.persisted, context.reference
            )?;
        }
        Ok(())
    }
}

/// The reference digit string, computed without the Newton solver.
pub fn reference_digits(decimal_places: DecimalPlaces) -> Result<DigitString> {
    let precision = decimal_places.get() + REFERENCE_EXTRA_DIGITS;
    let context = PrecisionContext::truncating(precision);
    let reference = context
        .sqrt(&BigDecimal::from(2))
        .ok_or(DigitsError::ReferenceUnavailable { precision })?;
    Ok(format_fixed(&reference, decimal_places))
}

fn excerpt(chars: &[char], start: usize, end: usize) -> String {
    chars[start.min(chars.len())..end.min(chars.len())]
        .iter()
        .collect()
}

/// Exact comparison of two digit strings, each trimmed of surrounding
/// whitespace. `context_radius` characters are kept on each side of the
/// first mismatch.
pub fn compare(persisted: &str, reference: &str, context_radius: usize) -> VerificationReport {
    let persisted: Vec<char> = persisted.trim().chars().collect();
    let reference: Vec<char> = reference.trim().chars().collect();

    let first_mismatch = persisted
        .iter()
        .zip(reference.iter())
        .position(|(ours, theirs)| ours != theirs)
        .or_else(|| {
            (persisted.len() != reference.len()).then(|| persisted.len().min(reference.len()))
        });

    let context = first_mismatch.map(|index| {
        let start = index.saturating_sub(context_radius);
        let end = index + context_radius + 1;
        MismatchContext {
            start,
            persisted: excerpt(&persisted, start, end),
            reference: excerpt(&reference, start, end),
        }
    });

    VerificationReport {
        matched: first_mismatch.is_none(),
        persisted_len: persisted.len(),
        reference_len: reference.len(),
        first_mismatch,
        context,
    }
}

/// Recompute the reference and compare it against `persisted`.
pub fn verify(persisted: &str, decimal_places: DecimalPlaces) -> Result<VerificationReport> {
    verify_with_radius(persisted, decimal_places, DEFAULT_CONTEXT_RADIUS)
}

pub fn verify_with_radius(
    persisted: &str,
    decimal_places: DecimalPlaces,
    context_radius: usize,
) -> Result<VerificationReport> {
    let reference = reference_digits(decimal_places)?;
    let report = compare(persisted, reference.as_str(), context_radius);
    if report.matched {
        info!(characters = report.persisted_len, "digits match the reference");
    } else {
        warn!(
            first_mismatch = ?report.first_mismatch,
            persisted_len = report.persisted_len,
            reference_len = report.reference_len,
            "digits differ from the reference"
        );
    }
    Ok(report)
}

/// Read a persisted artifact and verify it. An unreadable file is
/// `MissingArtifact`, reported before any computation.
pub fn verify_file(
    path: &Path,
    decimal_places: DecimalPlaces,
    context_radius: usize,
) -> Result<VerificationReport> {
    let persisted = read_persisted_digits(path)?;
    verify_with_radius(&persisted, decimal_places, context_radius)
}
