//! Stockcast Server - stock forecast HTTP service
//!
//! Loads the trained model artifact once at startup, then serves forecasts
//! over `POST /predict`.
//!
//! # Usage
//! ```sh
//! PORT=8080 cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `HOST` / `PORT` - bind address (default 0.0.0.0:8080)
//! - `MODEL_PATH` - trained model artifact (default data/model/stock_dense_model.json)
//! - `DATA_BASE_URL` - market data endpoint override

use anyhow::{Context, Result};
use std::sync::Arc;
use stockcast::application::forecast::forecaster::IterativeForecaster;
use stockcast::application::forecast::service::PredictionService;
use stockcast::application::ml::dense_net::DenseNet;
use stockcast::application::ml::predictor::SequenceModel;
use stockcast::config::Config;
use stockcast::infrastructure::yahoo::YahooMarketDataService;
use stockcast::interfaces::http::{AppState, router};
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Stockcast Server {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    // The artifact is required: without it every forecast would fail, so a
    // missing or unreadable file is a startup error rather than a degraded
    // service.
    let model = DenseNet::load(&config.model_path)
        .with_context(|| format!("loading model artifact from {:?}", config.model_path))?;
    info!(
        "Model ready: {} {} (window {})",
        model.name(),
        model.version(),
        model.window_size()
    );

    let model: Arc<dyn SequenceModel> = Arc::new(model);
    let market_data = Arc::new(YahooMarketDataService::new(config.data_base_url.clone()));
    let service = PredictionService::new(market_data, IterativeForecaster::new(model));

    let app = router(AppState {
        service: Arc::new(service),
    });

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on {}. Press Ctrl+C to shutdown.", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received. Exiting...");
        })
        .await?;

    Ok(())
}
