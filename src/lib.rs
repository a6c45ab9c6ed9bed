//! Sheet and coil metal price calculator.
//!
//! The `pricing` module holds the engine and its reference tables; `routes`
//! maps an HTML form onto it. `app` assembles both into one router.

pub mod config;
pub mod error;
pub mod pricing;
pub mod routes;

use std::path::Path;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::pricing::PricingEngine;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<PricingEngine>,
}

impl AppState {
    pub fn new(engine: PricingEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

/// Build the full application router
pub fn app(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(routes::calculator::form))
        .route("/calculate", post(routes::calculator::calculate))
        .route("/health", get(routes::calculator::health))
        .nest("/api", pricing::router().layer(CorsLayer::permissive()))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(routes::calculator::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}
