//! Reference table loader.
//!
//! Tables come from a JSON file when `PRICING_TABLES_PATH` is set and from the
//! data embedded at build time otherwise. Either way they are validated once,
//! before the engine exists, and never touched again.

use std::collections::BTreeSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn};

use super::models::MetalShape;
use super::profile::PipelineProfile;
use super::tables::ReferenceTables;

const EMBEDDED_TABLES: &str = include_str!("../../data/reference_tables.json");

/// Reference table loading errors
#[derive(Debug, thiserror::Error)]
pub enum TablesError {
    #[error("Failed to read tables file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed tables: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid tables: {0}")]
    Invalid(String),
}

/// On-disk shape of a tables file: the tables plus an optional profile hint.
#[derive(Debug, Deserialize)]
struct TablesFile {
    #[serde(default)]
    profile: Option<PipelineProfile>,
    #[serde(flatten)]
    tables: ReferenceTables,
}

/// Loaded and validated tables.
#[derive(Debug, Clone)]
pub struct LoadedTables {
    pub tables: ReferenceTables,
    /// Profile named in the file, if any
    pub profile: Option<PipelineProfile>,
}

/// Load the tables shipped with the binary.
pub fn load_default_tables() -> Result<ReferenceTables, TablesError> {
    parse_tables(EMBEDDED_TABLES).map(|loaded| loaded.tables)
}

/// Load tables from `path`, or the embedded set when `path` is `None`.
pub fn load_tables(path: Option<&Path>) -> Result<LoadedTables, TablesError> {
    let loaded = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path).map_err(|source| TablesError::Io {
                path: path.display().to_string(),
                source,
            })?;
            info!("Loading reference tables from {}", path.display());
            parse_tables(&raw)?
        }
        None => {
            info!("Loading embedded reference tables");
            parse_tables(EMBEDDED_TABLES)?
        }
    };

    info!(
        regions = loaded.tables.base_prices.len(),
        metals = loaded.tables.metals.len(),
        stations = loaded.tables.station_fees.len(),
        "Reference tables loaded"
    );

    Ok(loaded)
}

/// Parse and validate a JSON tables document.
pub fn parse_tables(raw: &str) -> Result<LoadedTables, TablesError> {
    let file: TablesFile = serde_json::from_str(raw)?;
    let mut tables = file.tables;

    fill_missing_shapes(&mut tables);
    validate(&tables)?;
    flag_overlapping_bands(&tables);

    Ok(LoadedTables {
        tables,
        profile: file.profile,
    })
}

/// Older tables files carry no explicit shape; derive it from the name.
fn fill_missing_shapes(tables: &mut ReferenceTables) {
    let names: BTreeSet<String> = tables
        .base_prices
        .values()
        .flat_map(|metals| metals.keys().cloned())
        .collect();

    for name in names {
        tables
            .metals
            .entry(name)
            .or_insert_with_key(|name| MetalShape::from_name_suffix(name));
    }
}

fn validate(tables: &ReferenceTables) -> Result<(), TablesError> {
    if tables.exchange_rate <= Decimal::ZERO {
        return Err(TablesError::Invalid(format!(
            "exchange rate must be positive, got {}",
            tables.exchange_rate
        )));
    }

    let mut regions = tables.base_prices.iter();
    let Some((first_region, first_metals)) = regions.next() else {
        return Err(TablesError::Invalid("base price table is empty".to_string()));
    };
    let expected: BTreeSet<&String> = first_metals.keys().collect();
    if expected.is_empty() {
        return Err(TablesError::Invalid(format!(
            "region '{}' has no metals",
            first_region
        )));
    }
    for (region, metals) in regions {
        let actual: BTreeSet<&String> = metals.keys().collect();
        if actual != expected {
            return Err(TablesError::Invalid(format!(
                "region '{}' lists different metals than region '{}'",
                region, first_region
            )));
        }
    }

    let price_regions: BTreeSet<&String> = tables.base_prices.keys().collect();
    let tariff_regions: BTreeSet<&String> = tables.region_tariffs.keys().collect();
    if price_regions != tariff_regions {
        let missing: Vec<&str> = price_regions
            .symmetric_difference(&tariff_regions)
            .map(|r| r.as_str())
            .collect();
        return Err(TablesError::Invalid(format!(
            "base price and tariff tables disagree on regions: {}",
            missing.join(", ")
        )));
    }

    for (metal, bands) in &tables.thickness_bands {
        if let Some(band) = bands.iter().find(|band| band.lo > band.hi) {
            return Err(TablesError::Invalid(format!(
                "thickness band {} for '{}' has lo > hi",
                band, metal
            )));
        }
    }

    Ok(())
}

/// Overlapping bands make the first-match lookup order-dependent. They are
/// kept as defined; this only reports them.
fn flag_overlapping_bands(tables: &ReferenceTables) {
    for (metal, bands) in &tables.thickness_bands {
        for (i, a) in bands.iter().enumerate() {
            for b in &bands[i + 1..] {
                if a.overlaps(b) {
                    warn!(
                        metal = %metal,
                        first = %a,
                        second = %b,
                        "Overlapping thickness bands; first in definition order wins"
                    );
                }
            }
        }
    }
}
