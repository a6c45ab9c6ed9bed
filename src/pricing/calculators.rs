//! Core pricing calculation functions.
//!
//! Pure functions for the individual pipeline steps - no table ownership,
//! no I/O. The engine in `services` strings them together.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::tables::{ThicknessBand, VolumeMarkups};

/// Length of one credit period in days.
pub const CREDIT_PERIOD_DAYS: u32 = 15;

/// Markup fraction charged per credit period (0.5%).
pub const CREDIT_RATE_PER_PERIOD: Decimal = dec!(0.005);

/// Round a money amount to `places` decimals, ties to even.
///
/// Applied once, at the end: to the price per ton, the total and the credit
/// percent. Intermediate steps keep full precision.
///
/// ```
/// use rust_decimal_macros::dec;
/// use metal_pricing_web::pricing::round_money;
///
/// assert_eq!(round_money(dec!(65356.613079), 2), dec!(65356.61));
/// assert_eq!(round_money(dec!(39213967.845), 2), dec!(39213967.84));
/// assert_eq!(round_money(dec!(39213967.855), 2), dec!(39213967.86));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Foreign-currency surcharge of the first band containing `thickness`.
///
/// Bands are scanned in definition order and the first inclusive match wins,
/// even if a later band would also match. No match means no surcharge.
pub fn thickness_surcharge(bands: &[ThicknessBand], thickness: Decimal) -> Decimal {
    bands
        .iter()
        .find(|band| band.contains(thickness))
        .map(|band| band.surcharge)
        .unwrap_or(Decimal::ZERO)
}

/// Parse a submitted width as whole millimeters, defaulting to 0.
///
/// Accepts surrounding whitespace, a leading sign and single `_` separators
/// between digits ("1_250"). Digit strings too long for `i64` saturate, so an
/// absurdly wide sheet still prices as wide. Anything else (empty, "abc",
/// "1200.5", "_1000") prices as width 0 instead of failing the request.
pub fn parse_width_or_default(raw: &str) -> i64 {
    let text = raw.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let well_formed = !digits.is_empty()
        && !digits.starts_with('_')
        && !digits.ends_with('_')
        && !digits.contains("__")
        && digits.chars().all(|c| c.is_ascii_digit() || c == '_');
    if !well_formed {
        return 0;
    }

    let digits: String = digits.chars().filter(|c| *c != '_').collect();
    match (digits.parse::<i64>(), negative) {
        (Ok(width), false) => width,
        (Ok(width), true) => -width,
        (Err(_), false) => i64::MAX,
        (Err(_), true) => i64::MIN,
    }
}

/// Foreign-currency width surcharge from the fixed step function.
///
/// ```text
/// < 1000       -> 10
/// 1000..1250   -> 15
/// 1250..1500   -> 20
/// == 1500      -> 25
/// otherwise    -> 0
/// ```
pub fn stepped_width_surcharge(width: i64) -> Decimal {
    match width {
        w if w < 1000 => dec!(10),
        1000..=1249 => dec!(15),
        1250..=1499 => dec!(20),
        1500 => dec!(25),
        _ => Decimal::ZERO,
    }
}

/// Markup fraction for the volume bracket `volume` falls into.
pub fn volume_markup(markups: &VolumeMarkups, volume: Decimal) -> Decimal {
    if volume < dec!(500) {
        markups.under_500
    } else if volume <= dec!(1000) {
        markups.from_500_to_1000
    } else {
        markups.over_1000
    }
}

/// Credit markup fraction for a deferral of `credit_days`.
///
/// Periods are not floored: 7 days is 7/15 of a period.
pub fn credit_markup(credit_days: u32) -> Decimal {
    let periods = Decimal::from(credit_days) / Decimal::from(CREDIT_PERIOD_DAYS);
    periods * CREDIT_RATE_PER_PERIOD
}

/// Credit markup expressed in percent, rounded to 2 places.
pub fn credit_markup_pct(markup: Decimal) -> Decimal {
    round_money(markup * dec!(100), 2)
}
