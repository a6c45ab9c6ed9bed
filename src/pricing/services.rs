//! The pricing engine.
//!
//! `PricingEngine::price` is a pure function of its input and the reference
//! tables it owns: no I/O, no interior mutability. Share it behind an `Arc`.

use std::sync::Arc;

use rust_decimal::Decimal;

use super::calculators::{
    credit_markup, credit_markup_pct, parse_width_or_default, round_money,
    stepped_width_surcharge, thickness_surcharge, volume_markup,
};
use super::models::{PriceBreakdown, PricingInput, PricingResult};
use super::profile::{PipelineProfile, WeightSurchargePolicy, WidthSurchargePolicy};
use super::tables::ReferenceTables;

/// Pricing calculation error types
///
/// Unknown region/metal combinations are the only fatal lookup. Every other
/// missing lookup resolves to a neutral value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("No price for metal '{metal}' in region '{region}'")]
    UnknownCombination { region: String, metal: String },

    /// An intermediate amount no longer fits a `Decimal` (about 7.9e28).
    #[error("Amount out of range while computing {step}")]
    AmountOutOfRange { step: &'static str },
}

fn in_range(value: Option<Decimal>, step: &'static str) -> Result<Decimal, PricingError> {
    value.ok_or(PricingError::AmountOutOfRange { step })
}

pub struct PricingEngine {
    tables: Arc<ReferenceTables>,
    profile: PipelineProfile,
}

impl PricingEngine {
    pub fn new(tables: Arc<ReferenceTables>, profile: PipelineProfile) -> Self {
        Self { tables, profile }
    }

    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    pub fn profile(&self) -> PipelineProfile {
        self.profile
    }

    /// Price a request.
    ///
    /// Surcharges are summed in local currency, then the sort coefficient,
    /// region tariff, volume markup and credit markup are applied in that
    /// order. The total uses the unrounded price per ton.
    pub fn price(&self, input: &PricingInput) -> Result<PricingResult, PricingError> {
        let tables = &*self.tables;
        let unknown = || PricingError::UnknownCombination {
            region: input.region.clone(),
            metal: input.metal.clone(),
        };

        let base_price = tables
            .base_price(&input.region, &input.metal)
            .ok_or_else(unknown)?;

        let thickness = tables
            .thickness_bands
            .get(&input.metal)
            .map(|bands| thickness_surcharge(bands, input.thickness))
            .unwrap_or(Decimal::ZERO);
        let thickness_surcharge = in_range(tables.to_local(thickness), "thickness surcharge")?;

        let grade = tables
            .grade_surcharges
            .get(&input.grade)
            .copied()
            .unwrap_or(Decimal::ZERO);
        let grade_surcharge = in_range(tables.to_local(grade), "grade surcharge")?;

        let width_surcharge = in_range(
            tables.to_local(self.width_surcharge(&input.width)),
            "width surcharge",
        )?;
        let weight_surcharge = in_range(
            tables.to_local(self.weight_surcharge(input)),
            "weight surcharge",
        )?;

        let station_fee = if self.profile.station_fees() {
            input
                .station
                .as_deref()
                .and_then(|station| tables.station_fees.get(station))
                .copied()
                .unwrap_or(Decimal::ZERO)
        } else {
            Decimal::ZERO
        };

        let subtotal = [
            thickness_surcharge,
            grade_surcharge,
            width_surcharge,
            weight_surcharge,
            station_fee,
        ]
        .into_iter()
        .try_fold(base_price, |sum, amount| sum.checked_add(amount));
        let subtotal = in_range(subtotal, "subtotal")?;

        let sort_coefficient = tables
            .sort_coefficients
            .get(&input.sort)
            .copied()
            .unwrap_or(Decimal::ONE);
        let region_tariff = tables
            .region_tariffs
            .get(&input.region)
            .copied()
            .ok_or_else(unknown)?;
        let volume_markup = volume_markup(&tables.volume_markups, input.volume);
        let credit_markup = credit_markup(input.credit_days);

        let price_per_ton = [
            sort_coefficient,
            Decimal::ONE + region_tariff,
            Decimal::ONE + volume_markup,
            Decimal::ONE + credit_markup,
        ]
        .into_iter()
        .try_fold(subtotal, |price, factor| price.checked_mul(factor));
        let price_per_ton = in_range(price_per_ton, "price per ton")?;
        let total_price = in_range(price_per_ton.checked_mul(input.volume), "total price")?;

        tracing::debug!(
            region = %input.region,
            metal = %input.metal,
            profile = %self.profile,
            %subtotal,
            %price_per_ton,
            "priced request"
        );

        Ok(PricingResult {
            input: input.clone(),
            price_per_ton: round_money(price_per_ton, 2),
            total_price: round_money(total_price, 2),
            credit_markup_pct: credit_markup_pct(credit_markup),
            breakdown: PriceBreakdown {
                base_price,
                thickness_surcharge,
                grade_surcharge,
                width_surcharge,
                weight_surcharge,
                station_fee,
                subtotal,
                sort_coefficient,
                region_tariff,
                volume_markup,
                credit_markup,
            },
        })
    }

    /// Foreign-currency width surcharge under the active policy.
    fn width_surcharge(&self, raw_width: &str) -> Decimal {
        match self.profile.width_policy() {
            WidthSurchargePolicy::Stepped => {
                stepped_width_surcharge(parse_width_or_default(raw_width))
            }
            WidthSurchargePolicy::Keyed => self
                .tables
                .legacy_width_surcharges
                .get(raw_width)
                .copied()
                .unwrap_or(Decimal::ZERO),
        }
    }

    /// Foreign-currency weight surcharge under the active policy.
    fn weight_surcharge(&self, input: &PricingInput) -> Decimal {
        let shape = self.tables.shape_of(&input.metal);
        let Some(weight) = self.tables.weight_surcharges.for_shape(shape) else {
            return Decimal::ZERO;
        };

        match self.profile.weight_policy() {
            WeightSurchargePolicy::LightWeight if input.volume < weight.min_volume => {
                weight.surcharge
            }
            WeightSurchargePolicy::LightWeight => Decimal::ZERO,
            WeightSurchargePolicy::Flat => weight.surcharge,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::loader::load_default_tables;
    use rust_decimal_macros::dec;

    fn engine(profile: PipelineProfile) -> PricingEngine {
        let tables = load_default_tables().expect("embedded tables load");
        PricingEngine::new(Arc::new(tables), profile)
    }

    fn scenario_input() -> PricingInput {
        PricingInput {
            region: "Урал".to_string(),
            metal: "ГК_лист".to_string(),
            thickness: dec!(1.2),
            grade: "рифлёнка".to_string(),
            width: "1200".to_string(),
            volume: dec!(600),
            sort: "беззаказка".to_string(),
            credit_days: 15,
            station: Some("АБАКАН".to_string()),
        }
    }

    #[test]
    fn test_reference_scenario() {
        let result = engine(PipelineProfile::Standard)
            .price(&scenario_input())
            .unwrap();

        let b = &result.breakdown;
        assert_eq!(b.base_price, dec!(44167));
        assert_eq!(b.thickness_surcharge, dec!(11500));
        assert_eq!(b.grade_surcharge, dec!(2500));
        assert_eq!(b.width_surcharge, dec!(1500));
        assert_eq!(b.weight_surcharge, dec!(0));
        assert_eq!(b.station_fee, dec!(4273));
        assert_eq!(b.subtotal, dec!(63940));

        // 63940 * 1.007 * 1.01 * 1.005 = 65356.613079
        assert_eq!(result.price_per_ton, dec!(65356.61));
        // 65356.613079 * 600 = 39213967.8474
        assert_eq!(result.total_price, dec!(39213967.85));
        assert_eq!(result.credit_markup_pct, dec!(0.5));
        assert_eq!(result.input, scenario_input());
    }

    #[test]
    fn test_unknown_region_is_fatal() {
        let mut input = scenario_input();
        input.region = "Марс".to_string();
        let err = engine(PipelineProfile::Standard).price(&input).unwrap_err();
        assert_eq!(
            err,
            PricingError::UnknownCombination {
                region: "Марс".to_string(),
                metal: "ГК_лист".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_metal_is_fatal() {
        let mut input = scenario_input();
        input.metal = "Чугун".to_string();
        let err = engine(PipelineProfile::Standard).price(&input).unwrap_err();
        assert!(err.to_string().contains("Чугун"));
    }

    #[test]
    fn test_missing_tariff_is_fatal() {
        let mut tables = load_default_tables().unwrap();
        tables.region_tariffs.remove("Урал");
        let engine = PricingEngine::new(Arc::new(tables), PipelineProfile::Standard);
        assert!(matches!(
            engine.price(&scenario_input()),
            Err(PricingError::UnknownCombination { .. })
        ));
    }

    #[test]
    fn test_price_is_idempotent() {
        let engine = engine(PipelineProfile::Standard);
        let first = engine.price(&scenario_input()).unwrap();
        let second = engine.price(&scenario_input()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_lookups_degrade_to_neutral() {
        let engine = engine(PipelineProfile::Standard);

        let mut baseline = scenario_input();
        baseline.grade = String::new();
        baseline.sort = "беззаказка".to_string();
        baseline.station = None;
        let expected = engine.price(&baseline).unwrap();

        let mut unknown = baseline.clone();
        unknown.grade = "золото".to_string();
        unknown.sort = "пятый".to_string();
        unknown.station = Some("НЕТ ТАКОЙ".to_string());
        let actual = engine.price(&unknown).unwrap();

        assert_eq!(actual.price_per_ton, expected.price_per_ton);
        assert_eq!(actual.total_price, expected.total_price);
        assert_eq!(actual.breakdown.grade_surcharge, Decimal::ZERO);
        assert_eq!(actual.breakdown.station_fee, Decimal::ZERO);
        assert_eq!(actual.breakdown.sort_coefficient, Decimal::ONE);
    }

    #[test]
    fn test_sort_coefficient_discounts() {
        let engine = engine(PipelineProfile::Standard);
        let mut input = scenario_input();
        input.sort = "второй".to_string();
        let result = engine.price(&input).unwrap();
        assert_eq!(result.breakdown.sort_coefficient, dec!(0.9));
        assert!(result.price_per_ton < dec!(65356.61));
    }

    #[test]
    fn test_malformed_width_prices_as_narrow() {
        let engine = engine(PipelineProfile::Standard);
        let mut input = scenario_input();
        input.width = "abc".to_string();
        let result = engine.price(&input).unwrap();
        assert_eq!(result.breakdown.width_surcharge, dec!(1000));
    }

    #[test]
    fn test_oversized_and_separated_widths() {
        let engine = engine(PipelineProfile::Standard);
        let mut input = scenario_input();

        input.width = "99999999999999999999".to_string();
        let oversized = engine.price(&input).unwrap();
        assert_eq!(oversized.breakdown.width_surcharge, Decimal::ZERO);

        input.width = "1_000".to_string();
        let separated = engine.price(&input).unwrap();
        assert_eq!(separated.breakdown.width_surcharge, dec!(1500));
    }

    #[test]
    fn test_width_1500_boundary() {
        let engine = engine(PipelineProfile::Standard);
        let mut input = scenario_input();

        input.width = "1500".to_string();
        let at = engine.price(&input).unwrap();
        assert_eq!(at.breakdown.width_surcharge, dec!(2500));

        input.width = "1501".to_string();
        let above = engine.price(&input).unwrap();
        assert_eq!(above.breakdown.width_surcharge, Decimal::ZERO);
    }

    #[test]
    fn test_negative_thickness_band() {
        let engine = engine(PipelineProfile::Standard);
        let mut input = scenario_input();
        input.thickness = dec!(6.0);
        let result = engine.price(&input).unwrap();
        assert_eq!(result.breakdown.thickness_surcharge, dec!(-500));
        assert!(result.price_per_ton > Decimal::ZERO);
    }

    #[test]
    fn test_light_weight_sheet_below_threshold() {
        let engine = engine(PipelineProfile::Standard);
        let mut input = scenario_input();

        input.volume = dec!(5.9);
        let light = engine.price(&input).unwrap();
        assert_eq!(light.breakdown.weight_surcharge, dec!(500));

        input.volume = dec!(6);
        let normal = engine.price(&input).unwrap();
        assert_eq!(normal.breakdown.weight_surcharge, Decimal::ZERO);
    }

    #[test]
    fn test_light_weight_coil_below_threshold() {
        let engine = engine(PipelineProfile::Standard);
        let mut input = scenario_input();
        input.metal = "ГК_рулон".to_string();

        input.volume = dec!(9.5);
        let light = engine.price(&input).unwrap();
        assert_eq!(light.breakdown.weight_surcharge, dec!(1500));

        input.volume = dec!(10);
        let normal = engine.price(&input).unwrap();
        assert_eq!(normal.breakdown.weight_surcharge, Decimal::ZERO);
    }

    #[test]
    fn test_light_weight_not_applied_to_shapeless_metal() {
        let engine = engine(PipelineProfile::Standard);
        let mut input = scenario_input();
        input.metal = "Оцинк".to_string();
        input.volume = dec!(1);
        let result = engine.price(&input).unwrap();
        assert_eq!(result.breakdown.weight_surcharge, Decimal::ZERO);
    }

    #[test]
    fn test_credit_days_scale_price() {
        let engine = engine(PipelineProfile::Standard);
        let mut input = scenario_input();

        input.credit_days = 0;
        let cash = engine.price(&input).unwrap();
        assert_eq!(cash.credit_markup_pct, dec!(0));

        input.credit_days = 30;
        let deferred = engine.price(&input).unwrap();
        assert_eq!(deferred.credit_markup_pct, dec!(1.0));
        assert!(deferred.price_per_ton > cash.price_per_ton);
    }

    #[test]
    fn test_result_is_rounded_to_cents() {
        let engine = engine(PipelineProfile::Standard);
        let mut input = scenario_input();
        input.volume = dec!(123.457);
        input.credit_days = 7;
        let result = engine.price(&input).unwrap();
        assert!(result.price_per_ton.scale() <= 2);
        assert!(result.total_price.scale() <= 2);
        assert!(result.credit_markup_pct.scale() <= 2);
    }

    #[test]
    fn test_huge_volume_is_out_of_range() {
        let engine = engine(PipelineProfile::Standard);
        let mut input = scenario_input();
        input.volume = Decimal::MAX;
        assert_eq!(
            engine.price(&input).unwrap_err(),
            PricingError::AmountOutOfRange {
                step: "total price"
            }
        );
    }

    #[test]
    fn test_huge_surcharge_is_out_of_range() {
        let mut tables = load_default_tables().unwrap();
        tables
            .grade_surcharges
            .insert("рифлёнка".to_string(), Decimal::MAX);
        let engine = PricingEngine::new(Arc::new(tables), PipelineProfile::Standard);
        let err = engine.price(&scenario_input()).unwrap_err();
        assert!(err.to_string().contains("grade surcharge"));
    }

    #[test]
    fn test_large_volume_within_range_still_prices() {
        let engine = engine(PipelineProfile::Standard);
        let mut input = scenario_input();
        input.volume = dec!(1000000000);
        let result = engine.price(&input).unwrap();
        // over 1000 t carries no volume markup: 63940 * 1.007 * 1.005
        assert_eq!(result.price_per_ton, dec!(64709.52));
        assert_eq!(result.total_price, dec!(64709517900000));
    }

    #[test]
    fn test_price_not_below_base_for_all_combinations() {
        let engine = engine(PipelineProfile::Standard);
        let tables = engine.tables().clone();
        for region in tables.regions() {
            for metal in tables.metal_names() {
                let input = PricingInput {
                    region: region.clone(),
                    metal: metal.clone(),
                    thickness: dec!(2.0),
                    grade: String::new(),
                    width: "1600".to_string(),
                    volume: dec!(2000),
                    sort: "беззаказка".to_string(),
                    credit_days: 0,
                    station: None,
                };
                let result = engine.price(&input).unwrap();
                let base = tables.base_price(&region, &metal).unwrap();
                assert!(result.price_per_ton >= base, "{} / {}", region, metal);
            }
        }
    }

    // ==================== legacy profile ====================

    #[test]
    fn test_legacy_keyed_width_lookup() {
        let engine = engine(PipelineProfile::Legacy);
        let mut input = scenario_input();

        input.width = "1250".to_string();
        let keyed = engine.price(&input).unwrap();
        assert_eq!(keyed.breakdown.width_surcharge, dec!(2000));

        // 1200 is not a key in the legacy table
        input.width = "1200".to_string();
        let missing = engine.price(&input).unwrap();
        assert_eq!(missing.breakdown.width_surcharge, Decimal::ZERO);

        input.width = "abc".to_string();
        let malformed = engine.price(&input).unwrap();
        assert_eq!(malformed.breakdown.width_surcharge, Decimal::ZERO);
    }

    #[test]
    fn test_legacy_flat_weight_cost_ignores_volume() {
        let engine = engine(PipelineProfile::Legacy);
        let mut input = scenario_input();
        input.volume = dec!(600);
        let sheet = engine.price(&input).unwrap();
        assert_eq!(sheet.breakdown.weight_surcharge, dec!(500));

        input.metal = "ХК_рулон".to_string();
        let coil = engine.price(&input).unwrap();
        assert_eq!(coil.breakdown.weight_surcharge, dec!(1500));
    }

    #[test]
    fn test_legacy_skips_station_fee() {
        let engine = engine(PipelineProfile::Legacy);
        let result = engine.price(&scenario_input()).unwrap();
        assert_eq!(result.breakdown.station_fee, Decimal::ZERO);
    }
}
