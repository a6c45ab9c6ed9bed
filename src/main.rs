use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use metal_pricing_web::config::Config;
use metal_pricing_web::pricing::{load_tables, PricingEngine};
use metal_pricing_web::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "metal_pricing_web=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let loaded = load_tables(config.tables_path.as_deref())
        .context("failed to load reference tables")?;
    let profile = config.profile.or(loaded.profile).unwrap_or_default();
    info!("Pricing profile: {}", profile);

    let state = AppState::new(PricingEngine::new(loaded.tables.into(), profile));
    let router = app(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, router).await?;

    Ok(())
}
