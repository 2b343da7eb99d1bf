use super::forecaster::IterativeForecaster;
use crate::domain::errors::ForecastError;
use crate::domain::ports::MarketDataService;
use crate::domain::series::DateRange;
use crate::domain::trend::{self, TrendLabel};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::info;

/// Result of one prediction pass.
#[derive(Debug, Clone)]
pub struct Prediction {
    /// Future prices, chronological.
    pub predicted: Vec<f64>,
    /// Every historical close that was fetched for the request.
    pub historical: Vec<f64>,
    pub sentiment: TrendLabel,
}

/// Orchestrates one request: fetch history, run the rollout, label the trend.
///
/// Holds no per-request state; the model behind the forecaster is shared
/// read-only, everything else lives on the stack of `predict`.
pub struct PredictionService {
    market_data: Arc<dyn MarketDataService>,
    forecaster: IterativeForecaster,
}

impl PredictionService {
    pub fn new(market_data: Arc<dyn MarketDataService>, forecaster: IterativeForecaster) -> Self {
        Self {
            market_data,
            forecaster,
        }
    }

    pub async fn predict(
        &self,
        symbol: &str,
        range: DateRange,
    ) -> Result<Prediction, ForecastError> {
        let end = Utc::now();
        let start = end - Duration::days(i64::from(range.days()));

        let series = self.market_data.daily_closes(symbol, start, end).await?;
        if series.is_empty() {
            return Err(ForecastError::NoData);
        }

        let closes = series.closes();
        let predicted = self.forecaster.forecast(&closes)?;
        let sentiment = trend::classify(&closes);

        info!(
            "{}: {} historical closes, {} forecast steps, {:?}",
            symbol,
            closes.len(),
            predicted.len(),
            sentiment
        );

        Ok(Prediction {
            predicted,
            historical: closes,
            sentiment,
        })
    }
}
