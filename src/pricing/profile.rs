//! Pipeline profiles.
//!
//! Two historical variants of the calculator exist. They share every step
//! except how width and weight surcharges are computed and whether the
//! station fee is applied, so a profile is just that choice of policies.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the width surcharge is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthSurchargePolicy {
    /// Fixed step function over the parsed integer width
    Stepped,
    /// Flat lookup of the raw width string in `legacy_width_surcharges`
    Keyed,
}

/// How the per-unit weight cost is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightSurchargePolicy {
    /// Only when volume is below the shape's minimum
    LightWeight,
    /// Always, regardless of volume
    Flat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineProfile {
    #[default]
    Standard,
    Legacy,
}

impl PipelineProfile {
    pub fn width_policy(self) -> WidthSurchargePolicy {
        match self {
            PipelineProfile::Standard => WidthSurchargePolicy::Stepped,
            PipelineProfile::Legacy => WidthSurchargePolicy::Keyed,
        }
    }

    pub fn weight_policy(self) -> WeightSurchargePolicy {
        match self {
            PipelineProfile::Standard => WeightSurchargePolicy::LightWeight,
            PipelineProfile::Legacy => WeightSurchargePolicy::Flat,
        }
    }

    pub fn station_fees(self) -> bool {
        matches!(self, PipelineProfile::Standard)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PipelineProfile::Standard => "standard",
            PipelineProfile::Legacy => "legacy",
        }
    }
}

impl std::fmt::Display for PipelineProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PipelineProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(PipelineProfile::Standard),
            "legacy" => Ok(PipelineProfile::Legacy),
            other => Err(format!("unknown pricing profile '{}'", other)),
        }
    }
}
