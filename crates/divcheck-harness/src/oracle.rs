//! The reference oracle.
//!
//! The expected result of a case is computed with exact integer arithmetic:
//! double-precision floating point can't tell apart adjacent integers (nor
//! exact half-ties) once dividends grow large enough.

use std::num::NonZeroU64;

/// Returns `dividend / divisor` rounded to the nearest integer, with exact
/// ties (`.5`) rounded away from zero (half-up).
pub fn expected(dividend: u64, divisor: NonZeroU64) -> u64 {
    let dividend = u128::from(dividend);
    let divisor = u128::from(divisor.get());

    let quotient = dividend / divisor;
    let remainder = dividend % divisor;

    let rounded = if 2 * remainder >= divisor {
        quotient + 1
    } else {
        quotient
    };

    // a rounded-up quotient only exists for divisors above 1, so it never
    // exceeds `u64::MAX`
    rounded as u64
}
