//! JSON API for the pricing engine.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use crate::error::AppError;
use crate::AppState;

use super::finance;
use super::requests::{AnnuityQuery, DepositQuery, InflationQuery, PriceRequest};
use super::responses::{FinanceResponse, PriceResponse, PricingErrorResponse, ReferenceResponse};

/// API routes, mounted under `/api`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/price", post(price))
        .route("/reference", get(reference))
        .route("/finance/annuity", get(annuity))
        .route("/finance/deposit", get(deposit))
        .route("/finance/inflation", get(inflation))
}

/// Errors rendered as `PricingErrorResponse` JSON instead of an HTML page
pub struct ApiError(AppError);

impl<E: Into<AppError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = PricingErrorResponse {
            error_type: self.0.error_type().to_string(),
            message: self.0.public_message(),
        };
        (self.0.status(), Json(body)).into_response()
    }
}

async fn price(
    State(state): State<AppState>,
    Json(request): Json<PriceRequest>,
) -> Result<Json<PriceResponse>, ApiError> {
    let input = request.into_input()?;
    let result = state.engine.price(&input)?;
    Ok(Json(PriceResponse::new(
        result,
        state.engine.profile().as_str(),
    )))
}

async fn reference(State(state): State<AppState>) -> Json<ReferenceResponse> {
    Json(ReferenceResponse::new(
        state.engine.tables(),
        state.engine.profile().as_str(),
    ))
}

async fn annuity(Query(query): Query<AnnuityQuery>) -> Result<Json<FinanceResponse>, ApiError> {
    let payment = finance::annuity_payment(query.principal, query.annual_rate, query.years)?;
    Ok(Json(FinanceResponse::new(payment)))
}

async fn deposit(Query(query): Query<DepositQuery>) -> Result<Json<FinanceResponse>, ApiError> {
    let balance = finance::accumulate_deposit(query.monthly, query.annual_rate, query.years)?;
    Ok(Json(FinanceResponse::new(balance)))
}

async fn inflation(
    Query(query): Query<InflationQuery>,
) -> Result<Json<FinanceResponse>, ApiError> {
    let present = finance::adjust_inflation(query.amount, query.years, query.inflation)?;
    Ok(Json(FinanceResponse::new(present)))
}
