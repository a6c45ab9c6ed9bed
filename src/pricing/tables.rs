//! Reference tables consumed by the pricing engine.
//!
//! Built once by the loader and shared read-only afterwards. Surcharges
//! marked "foreign" are in USD and converted with `exchange_rate`; all other
//! amounts are already in RUB.
//!
//! Tables that feed the form's choice lists keep the order of the file.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::models::MetalShape;

/// Closed thickness interval `[lo, hi]` with a foreign-currency surcharge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThicknessBand {
    pub lo: Decimal,
    pub hi: Decimal,
    pub surcharge: Decimal,
}

impl ThicknessBand {
    pub fn contains(&self, thickness: Decimal) -> bool {
        self.lo <= thickness && thickness <= self.hi
    }

    pub fn overlaps(&self, other: &ThicknessBand) -> bool {
        self.lo <= other.hi && other.lo <= self.hi
    }
}

impl std::fmt::Display for ThicknessBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.lo, self.hi)
    }
}

/// Per-unit weight cost and the volume below which it counts as "light".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightSurcharge {
    /// Foreign currency
    pub surcharge: Decimal,
    /// Tons
    pub min_volume: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightSurcharges {
    pub coil: WeightSurcharge,
    pub sheet: WeightSurcharge,
}

impl WeightSurcharges {
    pub fn for_shape(&self, shape: MetalShape) -> Option<&WeightSurcharge> {
        match shape {
            MetalShape::Coil => Some(&self.coil),
            MetalShape::Sheet => Some(&self.sheet),
            MetalShape::None => None,
        }
    }
}

/// Additive markup fractions for the three volume brackets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeMarkups {
    pub under_500: Decimal,
    pub from_500_to_1000: Decimal,
    pub over_1000: Decimal,
}

/// Complete reference data set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceTables {
    /// USD -> RUB multiplier
    pub exchange_rate: Decimal,
    /// region -> metal -> RUB per ton
    pub base_prices: IndexMap<String, IndexMap<String, Decimal>>,
    /// metal -> shape; the loader fills gaps from the name suffix
    #[serde(default)]
    pub metals: BTreeMap<String, MetalShape>,
    /// metal -> bands in definition order
    #[serde(default)]
    pub thickness_bands: BTreeMap<String, Vec<ThicknessBand>>,
    #[serde(default)]
    pub grade_surcharges: IndexMap<String, Decimal>,
    /// raw width string -> USD (legacy profile only)
    #[serde(default)]
    pub legacy_width_surcharges: BTreeMap<String, Decimal>,
    pub weight_surcharges: WeightSurcharges,
    #[serde(default)]
    pub station_fees: IndexMap<String, Decimal>,
    #[serde(default)]
    pub sort_coefficients: IndexMap<String, Decimal>,
    pub region_tariffs: BTreeMap<String, Decimal>,
    pub volume_markups: VolumeMarkups,
}

impl ReferenceTables {
    /// Convert a foreign-currency amount to local currency. `None` when the
    /// product does not fit a `Decimal`.
    pub fn to_local(&self, foreign: Decimal) -> Option<Decimal> {
        foreign.checked_mul(self.exchange_rate)
    }

    pub fn base_price(&self, region: &str, metal: &str) -> Option<Decimal> {
        self.base_prices.get(region)?.get(metal).copied()
    }

    pub fn shape_of(&self, metal: &str) -> MetalShape {
        self.metals.get(metal).copied().unwrap_or(MetalShape::None)
    }

    /// Regions in the order the tables file lists them.
    pub fn regions(&self) -> Vec<String> {
        self.base_prices.keys().cloned().collect()
    }

    /// Metal names in the first region's order; every region carries the
    /// same set once validated.
    pub fn metal_names(&self) -> Vec<String> {
        self.base_prices
            .values()
            .next()
            .map(|metals| metals.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn grades(&self) -> Vec<String> {
        self.grade_surcharges.keys().cloned().collect()
    }

    pub fn stations(&self) -> Vec<String> {
        self.station_fees.keys().cloned().collect()
    }

    pub fn sort_tiers(&self) -> Vec<String> {
        self.sort_coefficients.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn band(lo: Decimal, hi: Decimal) -> ThicknessBand {
        ThicknessBand {
            lo,
            hi,
            surcharge: dec!(1),
        }
    }

    #[test]
    fn test_band_contains_is_inclusive() {
        let b = band(dec!(1.0), dec!(1.24));
        assert!(b.contains(dec!(1.0)));
        assert!(b.contains(dec!(1.24)));
        assert!(b.contains(dec!(1.1)));
        assert!(!b.contains(dec!(1.245)));
        assert!(!b.contains(dec!(0.99)));
    }

    #[test]
    fn test_point_band() {
        let b = band(dec!(0.5), dec!(0.5));
        assert!(b.contains(dec!(0.50)));
        assert!(!b.contains(dec!(0.51)));
    }

    #[test]
    fn test_band_overlaps() {
        assert!(band(dec!(1.0), dec!(1.3)).overlaps(&band(dec!(1.25), dec!(1.29))));
        assert!(band(dec!(1.0), dec!(1.25)).overlaps(&band(dec!(1.25), dec!(1.29))));
        assert!(!band(dec!(1.0), dec!(1.24)).overlaps(&band(dec!(1.25), dec!(1.29))));
    }

    #[test]
    fn test_band_display() {
        assert_eq!(band(dec!(4.0), dec!(12.0)).to_string(), "4.0-12.0");
    }

    #[test]
    fn test_weight_surcharge_for_shape() {
        let w = WeightSurcharges {
            coil: WeightSurcharge {
                surcharge: dec!(15),
                min_volume: dec!(10),
            },
            sheet: WeightSurcharge {
                surcharge: dec!(5),
                min_volume: dec!(6),
            },
        };
        assert_eq!(w.for_shape(MetalShape::Coil).map(|s| s.surcharge), Some(dec!(15)));
        assert_eq!(w.for_shape(MetalShape::Sheet).map(|s| s.min_volume), Some(dec!(6)));
        assert!(w.for_shape(MetalShape::None).is_none());
    }
}
