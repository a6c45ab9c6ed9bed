//! Request DTOs for the calculator form and the JSON API.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use crate::error::AppError;

use super::models::PricingInput;

/// A pricing request, as submitted by the HTML form or the JSON API.
///
/// Optional lookups (grade, sort, station) default to empty and simply match
/// nothing in the tables. Width is kept as raw text; the engine parses it.
#[derive(Debug, Deserialize)]
pub struct PriceRequest {
    pub region: String,
    pub metal: String,
    pub thickness: Decimal,
    #[serde(default)]
    pub grade: String,
    #[serde(default, deserialize_with = "width_as_text")]
    pub width: String,
    pub volume: Decimal,
    #[serde(default)]
    pub sort: String,
    pub credit_days: u32,
    #[serde(default)]
    pub station: Option<String>,
}

impl PriceRequest {
    /// Check transport-level constraints and build the engine input.
    pub fn into_input(self) -> Result<PricingInput, AppError> {
        if self.thickness < Decimal::ZERO {
            return Err(AppError::Validation(format!(
                "thickness must not be negative, got {}",
                self.thickness
            )));
        }
        if self.volume <= Decimal::ZERO {
            return Err(AppError::Validation(format!(
                "volume must be positive, got {}",
                self.volume
            )));
        }

        let station = self
            .station
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(PricingInput {
            region: self.region,
            metal: self.metal,
            thickness: self.thickness,
            grade: self.grade,
            width: self.width,
            volume: self.volume,
            sort: self.sort,
            credit_days: self.credit_days,
            station,
        })
    }
}

/// Query for `/api/finance/annuity`
#[derive(Debug, Deserialize)]
pub struct AnnuityQuery {
    pub principal: Decimal,
    /// Percent per year
    pub annual_rate: Decimal,
    pub years: u32,
}

/// Query for `/api/finance/deposit`
#[derive(Debug, Deserialize)]
pub struct DepositQuery {
    pub monthly: Decimal,
    /// Percent per year
    pub annual_rate: Decimal,
    pub years: u32,
}

/// Query for `/api/finance/inflation`
#[derive(Debug, Deserialize)]
pub struct InflationQuery {
    pub amount: Decimal,
    pub years: Decimal,
    /// Percent per year
    pub inflation: Decimal,
}

/// Accept width as either a string or a JSON number.
fn width_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawWidth {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawWidth::deserialize(deserializer)? {
        RawWidth::Text(text) => text,
        RawWidth::Number(number) => number.to_string(),
    })
}
