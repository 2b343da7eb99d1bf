use crate::domain::errors::MarketDataError;
use crate::domain::series::PriceSeries;
use async_trait::async_trait;

/// Boundary to the market data provider.
///
/// Implementations return chronological daily closes for the window. An
/// unknown ticker, or a window containing no bars, yields an empty series
/// rather than an error; errors are reserved for the provider itself failing.
#[async_trait]
pub trait MarketDataService: Send + Sync {
    async fn daily_closes(
        &self,
        symbol: &str,
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    ) -> Result<PriceSeries, MarketDataError>;
}
