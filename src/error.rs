//! Error types shared by the solver, formatter, verifier and the CLI driver.

use std::path::PathBuf;

use thiserror::Error;

use crate::digits::verifier::VerificationReport;

/// Everything that can go wrong between reading a digit count and reporting
/// a verification outcome.
#[derive(Error, Debug)]
pub enum DigitsError {
    /// Rejected at the boundary, before any arithmetic.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The Newton iteration hit its cap. Always an internal defect.
    #[error(
        "Newton iteration did not converge to {decimal_places} decimal places within {max_iterations} iterations"
    )]
    NonConvergence {
        decimal_places: u64,
        max_iterations: usize,
    },

    /// An iterate became zero, so the next Newton step is undefined.
    #[error("Newton iterate collapsed to zero at iteration {iteration}")]
    DegenerateIterate { iteration: usize },

    /// The direct square-root primitive produced no value.
    #[error("unable to compute the reference square root at precision {precision}")]
    ReferenceUnavailable { precision: u64 },

    #[error("{0}")]
    VerificationMismatch(Box<VerificationReport>),

    #[error("unable to read persisted digits from {}: {source}", .path.display())]
    MissingArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DigitsError {
    /// Process exit status for the driver:
    /// 1 = digit mismatch, 2 = bad input or artifact, 3 = computation defect.
    pub fn exit_code(&self) -> u8 {
        match self {
            DigitsError::VerificationMismatch(_) => 1,
            DigitsError::InvalidInput(_)
            | DigitsError::MissingArtifact { .. }
            | DigitsError::Io(_)
            | DigitsError::Json(_) => 2,
            DigitsError::NonConvergence { .. }
            | DigitsError::DegenerateIterate { .. }
            | DigitsError::ReferenceUnavailable { .. } => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, DigitsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DigitsError::NonConvergence {
            decimal_places: 12,
            max_iterations: 3,
        };
        assert_eq!(
            err.to_string(),
            "Newton iteration did not converge to 12 decimal places within 3 iterations"
        );

        let err = DigitsError::InvalidInput("digit count must be non-negative, got -1".to_owned());
        assert_eq!(
            err.to_string(),
            "invalid input: digit count must be non-negative, got -1"
        );
    }

    #[test]
    fn test_exit_codes_are_distinct_per_outcome() {
        let missing = DigitsError::MissingArtifact {
            path: PathBuf::from("nowhere.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let defect = DigitsError::DegenerateIterate { iteration: 4 };
        let bad_input = DigitsError::InvalidInput("nope".to_owned());

        assert_eq!(missing.exit_code(), 2);
        assert_eq!(bad_input.exit_code(), 2);
        assert_eq!(defect.exit_code(), 3);
    }
}
