//! Bounded-precision decimal arithmetic.
//!
//! `BigDecimal` arithmetic is exact (or, for division and square roots, runs
//! at a crate-wide default precision). A `PrecisionContext` makes every
//! operation explicit about how many significant digits survive and how the
//! discarded tail is rounded, and a `ContextStack` scopes those contexts so a
//! precision chosen for one phase can never leak into the next.

use std::num::NonZeroU64;
use std::ops::Deref;

use bigdecimal::{BigDecimal, RoundingMode};
use num::bigint::Sign;
use num::{BigInt, BigUint, Integer};
use num_traits::Zero;

/// Precision used by a `ContextStack` that was not given an explicit base.
pub const DEFAULT_PRECISION: u64 = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecisionContext {
    precision: NonZeroU64,
    rounding: RoundingMode,
}

impl Default for PrecisionContext {
    fn default() -> Self {
        PrecisionContext::half_even(DEFAULT_PRECISION)
    }
}

impl PrecisionContext {
    pub fn new(precision: NonZeroU64, rounding: RoundingMode) -> PrecisionContext {
        PrecisionContext {
            precision,
            rounding,
        }
    }

    /// A request for zero significant digits is clamped to one.
    pub fn with_digits(digits: u64, rounding: RoundingMode) -> PrecisionContext {
        PrecisionContext::new(NonZeroU64::new(digits).unwrap_or(NonZeroU64::MIN), rounding)
    }

    /// Round-half-to-even, used while iterating.
    pub fn half_even(digits: u64) -> PrecisionContext {
        PrecisionContext::with_digits(digits, RoundingMode::HalfEven)
    }

    /// Round-toward-zero, used when emitting a fixed digit count.
    pub fn truncating(digits: u64) -> PrecisionContext {
        PrecisionContext::with_digits(digits, RoundingMode::Down)
    }

    pub fn precision(&self) -> u64 {
        self.precision.get()
    }

    pub fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    pub fn round(&self, value: &BigDecimal) -> BigDecimal {
        value.with_precision_round(self.precision, self.rounding)
    }

    pub fn add(&self, lhs: &BigDecimal, rhs: &BigDecimal) -> BigDecimal {
        self.round(&(lhs + rhs))
    }

    pub fn sub(&self, lhs: &BigDecimal, rhs: &BigDecimal) -> BigDecimal {
        self.round(&(lhs - rhs))
    }

    pub fn mul(&self, lhs: &BigDecimal, rhs: &BigDecimal) -> BigDecimal {
        self.round(&(lhs * rhs))
    }

    /// Correctly rounded quotient, or `None` when dividing by zero.
    ///
    /// The quotient is computed by integer long division with two digits
    /// beyond the context precision, followed by a sticky digit that records
    /// whether the remainder was non-zero. That is enough information for
    /// every rounding mode to see the exact quotient's position relative to
    /// the rounding boundary.
    pub fn div(&self, numerator: &BigDecimal, denominator: &BigDecimal) -> Option<BigDecimal> {
        if denominator.is_zero() {
            return None;
        }
        if numerator.is_zero() {
            return Some(BigDecimal::zero());
        }

        let (num_int, num_scale) = numerator.as_bigint_and_exponent();
        let (den_int, den_scale) = denominator.as_bigint_and_exponent();
        let sign = if num_int.sign() == den_int.sign() {
            Sign::Plus
        } else {
            Sign::Minus
        };

        // The shifted numerator has at least `wanted` more digits than the
        // denominator, so the integer quotient carries `wanted` digits.
        let wanted = self.precision() as i64 + 2;
        let shift = (wanted + denominator.digits() as i64 - numerator.digits() as i64).max(0);

        let shifted = num_int.magnitude() * num::pow(BigUint::from(10u8), shift as usize);
        let (quotient, remainder) = shifted.div_rem(den_int.magnitude());
        let sticky = if remainder.is_zero() { 0u8 } else { 1u8 };
        let digits = quotient * 10u8 + sticky;

        let scale = num_scale - den_scale + shift + 1;
        Some(self.round(&BigDecimal::new(
            BigInt::from_biguint(sign, digits),
            scale,
        )))
    }

    /// Square root through the library primitive, rounded to this context.
    /// `None` for negative input.
    pub fn sqrt(&self, value: &BigDecimal) -> Option<BigDecimal> {
        value.sqrt_with_context(&bigdecimal::Context::new(self.precision, self.rounding))
    }
}

/// A base context plus the contexts pushed on top of it.
///
/// Only the top of the stack is ever used for arithmetic. Contexts are pushed
/// with [`ContextStack::scoped`] and popped when the returned guard drops.
#[derive(Debug)]
pub struct ContextStack {
    contexts: Vec<PrecisionContext>,
}

impl Default for ContextStack {
    fn default() -> Self {
        ContextStack::new(PrecisionContext::default())
    }
}

impl ContextStack {
    pub fn new(base: PrecisionContext) -> ContextStack {
        ContextStack {
            contexts: vec![base],
        }
    }

    pub fn active(&self) -> &PrecisionContext {
        // The base context is never popped.
        &self.contexts[self.contexts.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.contexts.len()
    }

    pub fn scoped(&mut self, context: PrecisionContext) -> ScopedContext<'_> {
        self.contexts.push(context);
        ScopedContext { stack: self }
    }
}

/// Guard for a pushed context. Dereferences to the active context and
/// restores the previous one on drop.
#[derive(Debug)]
pub struct ScopedContext<'a> {
    stack: &'a mut ContextStack,
}

impl ScopedContext<'_> {
    /// Push a further context for a nested phase.
    pub fn scoped(&mut self, context: PrecisionContext) -> ScopedContext<'_> {
        self.stack.scoped(context)
    }
}

impl Deref for ScopedContext<'_> {
    type Target = PrecisionContext;

    fn deref(&self) -> &PrecisionContext {
        self.stack.active()
    }
}

impl Drop for ScopedContext<'_> {
    fn drop(&mut self) {
        self.stack.contexts.pop();
    }
}
