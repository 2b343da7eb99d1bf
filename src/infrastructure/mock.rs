//! Mock market data for tests.

use crate::domain::errors::MarketDataError;
use crate::domain::ports::MarketDataService;
use crate::domain::series::{PricePoint, PriceSeries};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::sync::Mutex;

/// Returns a canned series regardless of symbol and records every requested
/// window so tests can assert on range handling.
pub struct MockMarketDataService {
    series: PriceSeries,
    requests: Mutex<Vec<(DateTime<Utc>, DateTime<Utc>)>>,
}

impl MockMarketDataService {
    pub fn with_series(series: PriceSeries) -> Self {
        Self {
            series,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fabricates consecutive calendar dates for the given closes.
    pub fn with_closes(closes: &[f64]) -> Self {
        let first = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                date: first + Duration::days(i as i64),
                close,
            })
            .collect();
        Self::with_series(PriceSeries::new(points))
    }

    pub fn empty() -> Self {
        Self::with_series(PriceSeries::empty())
    }

    /// The (start, end) windows requested so far.
    pub fn requested_windows(&self) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MarketDataService for MockMarketDataService {
    async fn daily_closes(
        &self,
        _symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries, MarketDataError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((start, end));
        }
        Ok(self.series.clone())
    }
}

/// Always fails, for exercising upstream-error paths.
pub struct FailingMarketDataService {
    pub reason: String,
}

#[async_trait]
impl MarketDataService for FailingMarketDataService {
    async fn daily_closes(
        &self,
        _symbol: &str,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<PriceSeries, MarketDataError> {
        Err(MarketDataError::Upstream {
            reason: self.reason.clone(),
        })
    }
}
