//! Newton iteration for the square root of two.
//!
//! For f(x) = x^2 - 2 the Newton step x - f(x) / f'(x) simplifies to
//! (x + 2/x) / 2. The iteration runs under a half-even context carrying
//! `GUARD_DIGITS` extra significant digits, and stops once two successive
//! iterates agree to `CONVERGENCE_EXTRA_DIGITS` digits past the request.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use num::BigInt;
use num_traits::{One, Zero};
use tracing::{debug, info};

use crate::core::precision::{ContextStack, PrecisionContext};
use crate::digits::common::{DecimalPlaces, CONVERGENCE_EXTRA_DIGITS, GUARD_DIGITS};
use crate::error::{DigitsError, Result};

/// Initial guess for the iteration, parsed from its exact decimal text.
pub const INITIAL_GUESS: &str = "1.5";

/// What the solver tells its observer after each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationReport {
    /// 1-based.
    pub iteration: usize,
    /// Fractional digits on which the last two iterates agree.
    pub settled_digits: u64,
    pub target_digits: u64,
}

/// Observer for long-running solves. Never affects the returned value.
pub trait SolverProgress {
    fn on_iteration(&mut self, report: &IterationReport);
}

pub struct NoProgress;

impl SolverProgress for NoProgress {
    fn on_iteration(&mut self, _report: &IterationReport) {}
}

/// Logs every `every` iterations (and always once the target is reached).
pub struct TracingProgress {
    every: usize,
}

impl TracingProgress {
    pub fn new(every: usize) -> TracingProgress {
        TracingProgress {
            every: every.max(1),
        }
    }
}

impl SolverProgress for TracingProgress {
    fn on_iteration(&mut self, report: &IterationReport) {
        if report.iteration % self.every == 0 || report.settled_digits >= report.target_digits {
            info!(
                iteration = report.iteration,
                settled_digits = report.settled_digits,
                target_digits = report.target_digits,
                "Newton iteration"
            );
        }
    }
}

/// The converged approximation plus how many steps it took.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub value: BigDecimal,
    pub iterations: usize,
}

struct ConvergenceState {
    previous: BigDecimal,
    current: BigDecimal,
    iteration: usize,
}

impl ConvergenceState {
    fn new(initial_guess: BigDecimal) -> ConvergenceState {
        ConvergenceState {
            previous: BigDecimal::zero(),
            current: initial_guess,
            iteration: 0,
        }
    }

    /// Take one Newton step and return |x_{n+1} - x_n|.
    fn advance(&mut self, context: &PrecisionContext, two: &BigDecimal) -> Result<BigDecimal> {
        self.iteration += 1;
        let quotient = context
            .div(two, &self.current)
            .ok_or(DigitsError::DegenerateIterate {
                iteration: self.iteration,
            })?;
        let sum = context.add(&self.current, &quotient);
        let next = context.mul(&sum, &one_half());
        self.previous = std::mem::replace(&mut self.current, next);
        Ok(context.sub(&self.current, &self.previous).abs())
    }
}

fn one_half() -> BigDecimal {
    BigDecimal::new(BigInt::from(5), 1)
}

/// Fractional digits on which two iterates differing by `step` agree.
fn settled_digits(step: &BigDecimal, working_precision: u64) -> u64 {
    if step.is_zero() {
        return working_precision;
    }
    let (_, scale) = step.as_bigint_and_exponent();
    // |step| < 10^(digits - scale), so the iterates agree on at least
    // `scale - digits` fractional places.
    (scale - step.digits() as i64).max(0) as u64
}

/// 10^-(decimal_places + CONVERGENCE_EXTRA_DIGITS), exactly.
pub fn convergence_threshold(decimal_places: DecimalPlaces) -> BigDecimal {
    let exponent = decimal_places.get() + CONVERGENCE_EXTRA_DIGITS;
    BigDecimal::new(BigInt::one(), exponent as i64)
}

/// Approximate the square root of two to at least `decimal_places` correct
/// fractional digits, under a fresh context stack and without progress output.
pub fn solve(decimal_places: DecimalPlaces, max_iterations: usize) -> Result<Solution> {
    solve_in(
        &mut ContextStack::default(),
        decimal_places,
        max_iterations,
        &mut NoProgress,
    )
}

/// As [`solve`], but pushing the working context onto the caller's stack
/// (restored before returning, on success and failure alike) and reporting
/// each step to `progress`.
pub fn solve_in<P: SolverProgress>(
    contexts: &mut ContextStack,
    decimal_places: DecimalPlaces,
    max_iterations: usize,
    progress: &mut P,
) -> Result<Solution> {
    if max_iterations == 0 {
        return Err(DigitsError::InvalidInput(
            "the iteration cap must be positive".to_owned(),
        ));
    }

    let working_precision = decimal_places.get() + GUARD_DIGITS;
    let context = contexts.scoped(PrecisionContext::half_even(working_precision));

    let two = BigDecimal::from(2);
    let threshold = convergence_threshold(decimal_places);
    let initial_guess = BigDecimal::from_str(INITIAL_GUESS)
        .map_err(|err| DigitsError::InvalidInput(format!("initial guess: {err}")))?;
    let mut state = ConvergenceState::new(initial_guess);

    debug!(
        decimal_places = decimal_places.get(),
        working_precision, max_iterations, "starting Newton iteration"
    );

    while state.iteration < max_iterations {
        let step = state.advance(&context, &two)?;
        progress.on_iteration(&IterationReport {
            iteration: state.iteration,
            settled_digits: settled_digits(&step, working_precision),
            target_digits: decimal_places.get(),
        });
        if step <= threshold {
            debug!(iterations = state.iteration, "Newton iteration converged");
            return Ok(Solution {
                value: state.current,
                iterations: state.iteration,
            });
        }
    }

    Err(DigitsError::NonConvergence {
        decimal_places: decimal_places.get(),
        max_iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::precision::DEFAULT_PRECISION;
    use more_asserts::{assert_ge, assert_le, assert_lt};

    struct RecordingProgress {
        reports: Vec<IterationReport>,
    }

    impl SolverProgress for RecordingProgress {
        fn on_iteration(&mut self, report: &IterationReport) {
            self.reports.push(*report);
        }
    }

    fn places(n: u64) -> DecimalPlaces {
        DecimalPlaces::from(n)
    }

    #[test]
    fn test_converges_close_to_root() {
        let solution = solve(places(50), 100).unwrap();
        let square = &solution.value * &solution.value;
        let error = (square - BigDecimal::from(2)).abs();
        assert_lt!(error, BigDecimal::new(BigInt::one(), 55));
        // quadratic convergence from 1.5 needs only a handful of steps
        assert_le!(solution.iterations, 10);
    }

    #[test]
    fn test_iteration_cap_is_a_hard_failure() {
        match solve(places(1000), 3) {
            Err(DigitsError::NonConvergence {
                decimal_places,
                max_iterations,
            }) => {
                assert_eq!(decimal_places, 1000);
                assert_eq!(max_iterations, 3);
            }
            other => panic!("expected NonConvergence, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_iteration_cap_is_rejected() {
        assert!(matches!(
            solve(places(10), 0),
            Err(DigitsError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_zero_places_still_accurate() {
        let solution = solve(places(0), 50).unwrap();
        let lower = BigDecimal::from_str("1.4142135623").unwrap();
        let upper = BigDecimal::from_str("1.4142135624").unwrap();
        assert_ge!(solution.value, lower);
        assert_le!(solution.value, upper);
    }

    #[test]
    fn test_progress_reports_every_step() {
        let mut progress = RecordingProgress {
            reports: Vec::new(),
        };
        let mut contexts = ContextStack::default();
        let solution = solve_in(&mut contexts, places(200), 100, &mut progress).unwrap();

        assert_eq!(progress.reports.len(), solution.iterations);
        for (index, report) in progress.reports.iter().enumerate() {
            assert_eq!(report.iteration, index + 1);
            assert_eq!(report.target_digits, 200);
        }
        let last = progress.reports.last().unwrap();
        assert_ge!(last.settled_digits, 200);
    }

    #[test]
    fn test_progress_does_not_change_the_result() {
        let mut progress = RecordingProgress {
            reports: Vec::new(),
        };
        let observed = solve_in(&mut ContextStack::default(), places(120), 100, &mut progress).unwrap();
        let quiet = solve(places(120), 100).unwrap();
        assert_eq!(observed, quiet);
    }

    #[test]
    fn test_context_is_restored_after_success_and_failure() {
        let mut contexts = ContextStack::default();
        solve_in(&mut contexts, places(40), 100, &mut NoProgress).unwrap();
        assert_eq!(contexts.depth(), 1);
        assert_eq!(contexts.active().precision(), DEFAULT_PRECISION);

        assert!(solve_in(&mut contexts, places(400), 2, &mut NoProgress).is_err());
        assert_eq!(contexts.depth(), 1);
        assert_eq!(contexts.active().precision(), DEFAULT_PRECISION);
    }

    #[test]
    fn test_settled_digits_estimate() {
        assert_eq!(settled_digits(&BigDecimal::zero(), 77), 77);
        assert_eq!(
            settled_digits(&BigDecimal::from_str("0.000042").unwrap(), 77),
            4
        );
        assert_eq!(settled_digits(&BigDecimal::from_str("0.5").unwrap(), 77), 0);
    }

    #[test]
    fn test_convergence_threshold() {
        assert_eq!(
            convergence_threshold(places(5)),
            BigDecimal::from_str("0.000000000000001").unwrap()
        );
    }
}
