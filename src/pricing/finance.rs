//! Loan, deposit and inflation helpers for quoting deferred payment.
//!
//! Rates are annual percentages compounded monthly. Results are unrounded;
//! callers round with `round_money` when presenting them.

use rust_decimal::prelude::*;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

const MONTHS_PER_YEAR: i64 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FinanceError {
    #[error("Loan term must be at least one year")]
    EmptyTerm,

    #[error("Rate must be above -100%")]
    RateTooLow,

    #[error("Amount out of range")]
    OutOfRange,
}

fn monthly_rate(annual_rate_pct: Decimal) -> Decimal {
    annual_rate_pct / dec!(100) / Decimal::from(MONTHS_PER_YEAR)
}

/// `(1 + rate)^months`, the growth factor over the whole term.
fn growth(rate: Decimal, months: i64) -> Result<Decimal, FinanceError> {
    let base = Decimal::ONE + rate;
    if base <= Decimal::ZERO {
        return Err(FinanceError::RateTooLow);
    }
    base.checked_powi(months).ok_or(FinanceError::OutOfRange)
}

/// Monthly annuity payment on a loan of `principal` over `years`.
///
/// `P * r / (1 - (1 + r)^-n)` with `r` the monthly rate and `n` the number of
/// months. A zero rate splits the principal evenly.
pub fn annuity_payment(
    principal: Decimal,
    annual_rate_pct: Decimal,
    years: u32,
) -> Result<Decimal, FinanceError> {
    let months = i64::from(years) * MONTHS_PER_YEAR;
    if months == 0 {
        return Err(FinanceError::EmptyTerm);
    }

    let rate = monthly_rate(annual_rate_pct);
    if rate.is_zero() {
        return Ok(principal / Decimal::from(months));
    }

    // P * r / (1 - g^-1) == P * r * g / (g - 1)
    let g = growth(rate, months)?;
    let denominator = g - Decimal::ONE;
    if denominator.is_zero() {
        return Err(FinanceError::OutOfRange);
    }
    principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(g))
        .and_then(|v| v.checked_div(denominator))
        .ok_or(FinanceError::OutOfRange)
}

/// Balance after paying `monthly` into a deposit every month for `years`.
pub fn accumulate_deposit(
    monthly: Decimal,
    annual_rate_pct: Decimal,
    years: u32,
) -> Result<Decimal, FinanceError> {
    let months = i64::from(years) * MONTHS_PER_YEAR;
    let rate = monthly_rate(annual_rate_pct);
    if rate.is_zero() {
        return monthly
            .checked_mul(Decimal::from(months))
            .ok_or(FinanceError::OutOfRange);
    }

    let g = growth(rate, months)?;
    monthly
        .checked_mul(g - Decimal::ONE)
        .and_then(|v| v.checked_div(rate))
        .ok_or(FinanceError::OutOfRange)
}

/// Present value of `amount` received after `years` of `inflation_pct`
/// yearly inflation. Fractional years are allowed.
pub fn adjust_inflation(
    amount: Decimal,
    years: Decimal,
    inflation_pct: Decimal,
) -> Result<Decimal, FinanceError> {
    let base = Decimal::ONE + inflation_pct / dec!(100);
    if base <= Decimal::ZERO {
        return Err(FinanceError::RateTooLow);
    }

    let factor = match years.fract().is_zero().then(|| years.to_i64()).flatten() {
        Some(whole) => base.checked_powi(whole),
        None => base.checked_powd(years),
    };
    factor
        .and_then(|f| amount.checked_div(f))
        .ok_or(FinanceError::OutOfRange)
}
