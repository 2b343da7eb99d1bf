//! Yahoo Finance Market Data Service
//!
//! Fetches historical daily close prices for a ticker via the v8 chart API.
//! An unknown ticker or an empty window yields an empty series; only the
//! provider itself failing is an error.

use crate::domain::errors::MarketDataError;
use crate::domain::ports::MarketDataService;
use crate::domain::series::{PricePoint, PriceSeries};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

// The chart endpoint rejects requests without a browser-looking agent.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";

pub struct YahooMarketDataService {
    client: reqwest::Client,
    base_url: String,
}

impl YahooMarketDataService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for YahooMarketDataService {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize)]
struct QuoteBlock {
    close: Option<Vec<Option<f64>>>,
}

fn series_from_chart(result: ChartResult) -> PriceSeries {
    let timestamps = result.timestamp.unwrap_or_default();
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .and_then(|q| q.close)
        .unwrap_or_default();

    // Null closes (halted or partial days) are dropped.
    let points: Vec<PricePoint> = timestamps
        .iter()
        .zip(closes)
        .filter_map(|(&ts, close)| {
            let close = close?;
            let date = DateTime::<Utc>::from_timestamp(ts, 0)?.date_naive();
            Some(PricePoint { date, close })
        })
        .collect();

    PriceSeries::new(points)
}

#[async_trait]
impl MarketDataService for YahooMarketDataService {
    async fn daily_closes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries, MarketDataError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        debug!("Fetching {} daily bars from {}", symbol, url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", start.timestamp().to_string()),
                ("period2", end.timestamp().to_string()),
                ("interval", "1d".to_string()),
            ])
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| MarketDataError::Upstream {
                reason: e.to_string(),
            })?;

        // Unknown tickers come back as a chart-level error object (with a
        // non-2xx status); both that and a missing result mean "no data".
        let status = response.status();
        let body: ChartResponse = response.json().await.map_err(|e| {
            if status.is_success() {
                MarketDataError::MalformedResponse {
                    reason: e.to_string(),
                }
            } else {
                MarketDataError::Upstream {
                    reason: format!("provider returned status {}", status),
                }
            }
        })?;

        if let Some(err) = body.chart.error {
            info!("{}: provider reported {}: {}", symbol, err.code, err.description);
            return Ok(PriceSeries::empty());
        }

        let Some(result) = body.chart.result.and_then(|r| r.into_iter().next()) else {
            return Ok(PriceSeries::empty());
        };

        let series = series_from_chart(result);
        info!("{}: fetched {} daily closes", symbol, series.len());
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_payload_decodes_to_series() {
        let payload = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1704153600, 1704240000, 1704326400],
                    "indicators": {
                        "quote": [{ "close": [185.64, null, 184.25] }]
                    }
                }],
                "error": null
            }
        }"#;

        let body: ChartResponse = serde_json::from_str(payload).unwrap();
        let result = body.chart.result.unwrap().into_iter().next().unwrap();
        let series = series_from_chart(result);

        // The null close is skipped.
        assert_eq!(series.closes(), vec![185.64, 184.25]);
    }

    #[test]
    fn test_unknown_ticker_payload_decodes_to_error_object() {
        let payload = r#"{
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        }"#;

        let body: ChartResponse = serde_json::from_str(payload).unwrap();
        assert!(body.chart.result.is_none());
        assert_eq!(body.chart.error.unwrap().code, "Not Found");
    }

    #[test]
    fn test_missing_quote_block_yields_empty_series() {
        let payload = r#"{
            "chart": {
                "result": [{
                    "timestamp": null,
                    "indicators": { "quote": [{}] }
                }],
                "error": null
            }
        }"#;

        let body: ChartResponse = serde_json::from_str(payload).unwrap();
        let result = body.chart.result.unwrap().into_iter().next().unwrap();
        assert!(series_from_chart(result).is_empty());
    }
}
