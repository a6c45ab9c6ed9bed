//! Calculator page route handlers

use askama::Template;
use axum::{
    extract::{Form, State},
    response::Html,
};
use rust_decimal::Decimal;

use crate::error::{AppError, Result};
use crate::pricing::requests::PriceRequest;
use crate::pricing::PriceBreakdown;
use crate::AppState;

/// Input form template
#[derive(Template)]
#[template(path = "metal_form.html")]
pub struct MetalFormTemplate {
    regions: Vec<String>,
    metals: Vec<String>,
    grades: Vec<String>,
    stations: Vec<String>,
    sort_tiers: Vec<String>,
    profile: String,
}

/// Priced report template
#[derive(Template)]
#[template(path = "metal_report.html")]
struct MetalReportTemplate {
    region: String,
    metal: String,
    thickness: Decimal,
    grade: String,
    width: String,
    volume: Decimal,
    sort: String,
    station: String,
    credit_days: u32,
    price_per_ton: Decimal,
    total_price: Decimal,
    credit_markup_pct: Decimal,
    breakdown: PriceBreakdown,
    profile: String,
}

/// Form page listing every valid choice from the reference tables
pub async fn form(State(state): State<AppState>) -> MetalFormTemplate {
    let tables = state.engine.tables();
    MetalFormTemplate {
        regions: tables.regions(),
        metals: tables.metal_names(),
        grades: tables.grades(),
        stations: tables.stations(),
        sort_tiers: tables.sort_tiers(),
        profile: state.engine.profile().to_string(),
    }
}

/// Price a submitted form and render the report
pub async fn calculate(
    State(state): State<AppState>,
    Form(request): Form<PriceRequest>,
) -> Result<Html<String>> {
    let input = request.into_input()?;
    let result = state.engine.price(&input)?;

    tracing::info!(
        region = %result.input.region,
        metal = %result.input.metal,
        price_per_ton = %result.price_per_ton,
        total_price = %result.total_price,
        "Calculated metal price"
    );

    let input = result.input;
    let template = MetalReportTemplate {
        region: input.region,
        metal: input.metal,
        thickness: input.thickness,
        grade: input.grade,
        width: input.width,
        volume: input.volume,
        sort: input.sort,
        station: input.station.unwrap_or_else(|| "-".to_string()),
        credit_days: input.credit_days,
        price_per_ton: result.price_per_ton,
        total_price: result.total_price,
        credit_markup_pct: result.credit_markup_pct,
        breakdown: result.breakdown,
        profile: state.engine.profile().to_string(),
    };

    Ok(Html(template.render()?))
}

/// Liveness check
pub async fn health() -> &'static str {
    "ok"
}

/// Any path the router does not know
pub async fn not_found() -> AppError {
    AppError::NotFound
}
