//! Domain records for the pricing pipeline.
//!
//! `PricingInput` is created per request and `PricingResult` is what the
//! engine hands back. Neither is persisted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product shape used by the weight surcharge rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetalShape {
    /// Shipped as coils (рулон)
    Coil,
    /// Shipped as sheets in packs (лист / пачка)
    Sheet,
    /// No weight surcharge applies
    None,
}

impl MetalShape {
    /// Infer a shape from the legacy naming convention (`*_рулон`, `*_лист`).
    ///
    /// Only used by the loader when a tables file omits the explicit shape.
    pub fn from_name_suffix(metal: &str) -> Self {
        if metal.ends_with("рулон") {
            MetalShape::Coil
        } else if metal.ends_with("лист") {
            MetalShape::Sheet
        } else {
            MetalShape::None
        }
    }
}

/// A validated pricing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingInput {
    pub region: String,
    pub metal: String,
    /// Thickness in millimeters
    pub thickness: Decimal,
    pub grade: String,
    /// Raw width as submitted; parsed permissively by the engine
    pub width: String,
    /// Volume in tons
    pub volume: Decimal,
    pub sort: String,
    pub credit_days: u32,
    pub station: Option<String>,
}

/// Local-currency contribution of each pipeline step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub base_price: Decimal,
    pub thickness_surcharge: Decimal,
    pub grade_surcharge: Decimal,
    pub width_surcharge: Decimal,
    pub weight_surcharge: Decimal,
    pub station_fee: Decimal,
    /// Sum of all of the above, before any multiplier
    pub subtotal: Decimal,
    pub sort_coefficient: Decimal,
    pub region_tariff: Decimal,
    pub volume_markup: Decimal,
    pub credit_markup: Decimal,
}

/// Priced result, echoing the input for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingResult {
    pub input: PricingInput,
    /// Price per ton, rounded to 2 places
    pub price_per_ton: Decimal,
    /// `price_per_ton * volume`, computed before rounding, then rounded to 2 places
    pub total_price: Decimal,
    /// Credit markup in percent, rounded to 2 places
    pub credit_markup_pct: Decimal,
    pub breakdown: PriceBreakdown,
}
