//! Response DTOs for the JSON API.

use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::round_money;
use super::models::{PriceBreakdown, PricingResult};
use super::tables::ReferenceTables;

/// Response for a priced request
#[derive(Debug, Serialize)]
pub struct PriceResponse {
    pub region: String,
    pub metal: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub thickness: Decimal,
    pub grade: String,
    pub width: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub volume: Decimal,
    pub sort: String,
    pub station: Option<String>,
    pub credit_days: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_per_ton: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub credit_markup_pct: Decimal,
    pub breakdown: BreakdownResponse,
    pub profile: String,
}

/// Local-currency amounts per step and the multipliers applied after them
#[derive(Debug, Serialize)]
pub struct BreakdownResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub base_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub thickness_surcharge: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub grade_surcharge: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub width_surcharge: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub weight_surcharge: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub station_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub sort_coefficient: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub region_tariff: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub volume_markup: Decimal,
}

impl From<PriceBreakdown> for BreakdownResponse {
    fn from(b: PriceBreakdown) -> Self {
        Self {
            base_price: b.base_price,
            thickness_surcharge: b.thickness_surcharge,
            grade_surcharge: b.grade_surcharge,
            width_surcharge: b.width_surcharge,
            weight_surcharge: b.weight_surcharge,
            station_fee: b.station_fee,
            subtotal: b.subtotal,
            sort_coefficient: b.sort_coefficient,
            region_tariff: b.region_tariff,
            volume_markup: b.volume_markup,
        }
    }
}

impl PriceResponse {
    pub fn new(result: PricingResult, profile: &str) -> Self {
        let input = result.input;
        Self {
            region: input.region,
            metal: input.metal,
            thickness: input.thickness,
            grade: input.grade,
            width: input.width,
            volume: input.volume,
            sort: input.sort,
            station: input.station,
            credit_days: input.credit_days,
            price_per_ton: result.price_per_ton,
            total_price: result.total_price,
            credit_markup_pct: result.credit_markup_pct,
            breakdown: result.breakdown.into(),
            profile: profile.to_string(),
        }
    }
}

/// Valid choices for each lookup, for building a client-side form
#[derive(Debug, Serialize)]
pub struct ReferenceResponse {
    pub regions: Vec<String>,
    pub metals: Vec<String>,
    pub grades: Vec<String>,
    pub stations: Vec<String>,
    pub sort_tiers: Vec<String>,
    pub profile: String,
}

impl ReferenceResponse {
    pub fn new(tables: &ReferenceTables, profile: &str) -> Self {
        Self {
            regions: tables.regions(),
            metals: tables.metal_names(),
            grades: tables.grades(),
            stations: tables.stations(),
            sort_tiers: tables.sort_tiers(),
            profile: profile.to_string(),
        }
    }
}

/// A finance helper result, rounded to kopecks
#[derive(Debug, Serialize)]
pub struct FinanceResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

impl FinanceResponse {
    pub fn new(amount: Decimal) -> Self {
        Self {
            amount: round_money(amount, 2),
        }
    }
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
}
