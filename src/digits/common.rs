use serde::{Deserialize, Serialize};

use crate::error::{DigitsError, Result};

/// Significant digits of margin the solver carries beyond the requested count.
pub const GUARD_DIGITS: u64 = 30;

/// Successive iterates must agree to this many digits past the requested count.
pub const CONVERGENCE_EXTRA_DIGITS: u64 = 10;

/// Margin used by the verifier's independent reference computation.
pub const REFERENCE_EXTRA_DIGITS: u64 = 40;

/// Each Newton step roughly doubles the number of correct digits, so this is
/// far beyond what any reachable digit count needs.
pub const DEFAULT_MAX_ITERATIONS: usize = 200;

/// Characters shown on each side of a verification mismatch.
pub const DEFAULT_CONTEXT_RADIUS: usize = 10;

/// Default file written by the `compute` command.
pub const DEFAULT_OUTPUT_PATH: &str = "sqrt_2_result.txt";

/// A validated, non-negative count of fractional digits.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct DecimalPlaces(u64);

impl DecimalPlaces {
    /// Rejects negative counts; nothing downstream ever sees one.
    pub fn new(requested: i64) -> Result<DecimalPlaces> {
        u64::try_from(requested).map(DecimalPlaces).map_err(|_| {
            DigitsError::InvalidInput(format!(
                "digit count must be non-negative, got {requested}"
            ))
        })
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for DecimalPlaces {
    fn from(value: u64) -> Self {
        DecimalPlaces(value)
    }
}

impl std::fmt::Display for DecimalPlaces {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

fn default_progress_every() -> usize {
    1
}

fn default_context_radius() -> usize {
    DEFAULT_CONTEXT_RADIUS
}

/// Parameters for a full compute, persist and verify run, read from JSON.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RunParams {
    /// Signed so that a negative request is reported as invalid input rather
    /// than as a JSON type error.
    pub decimal_places: i64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Log solver progress every this many iterations.
    #[serde(default = "default_progress_every")]
    pub progress_every: usize,
    #[serde(default = "default_context_radius")]
    pub context_radius: usize,
}

impl RunParams {
    pub fn decimal_places(&self) -> Result<DecimalPlaces> {
        DecimalPlaces::new(self.decimal_places)
    }
}
