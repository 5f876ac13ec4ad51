//! Discounts
//!
//! Rate arithmetic shared by the pricing policy and the promotion engine.

use decimal_percentage::Percentage;
use num_traits::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was out of range")]
    PercentConversion,
}

/// Return the rate as a plain fraction (e.g. `0.25`).
pub fn fraction(rate: Percentage) -> Decimal {
    rate * Decimal::ONE
}

/// Return the rate in percent points with trailing zeros removed (e.g. `20`).
pub fn percent_points(rate: Percentage) -> Decimal {
    (fraction(rate) * Decimal::ONE_HUNDRED).normalize()
}

/// Round half away from zero to a whole number of minor units.
pub fn round_minor(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Calculate `round(minor * (1 - rate))` in minor units.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the rate is outside `0..=1`
/// or the result cannot be represented in minor units.
pub fn discounted_minor(rate: Percentage, minor: i64) -> Result<i64, DiscountError> {
    let rate = fraction(rate);

    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(DiscountError::PercentConversion);
    }

    let Some(applied) = Decimal::from(minor).checked_mul(Decimal::ONE - rate) else {
        return Err(DiscountError::PercentConversion);
    };

    round_minor(applied)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}
