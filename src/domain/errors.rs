use thiserror::Error;

/// Errors raised by the market data adapter.
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("upstream request failed: {reason}")]
    Upstream { reason: String },

    #[error("malformed response from data provider: {reason}")]
    MalformedResponse { reason: String },
}

/// Errors raised inside the prediction pipeline.
///
/// All of these surface to the client as a structured 400 carrying the
/// Display message; none may terminate the request with a raw fault.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("No data found for ticker.")]
    NoData,

    #[error("insufficient history: {got} daily closes, need at least {required}")]
    InsufficientData { got: usize, required: usize },

    #[error("model inference failed: {reason}")]
    Inference { reason: String },

    #[error("invalid date range {input:?}: {reason}")]
    InvalidRange { input: String, reason: String },

    #[error(transparent)]
    MarketData(#[from] MarketDataError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_message_is_stable() {
        // Clients match on this string; it must not drift.
        assert_eq!(ForecastError::NoData.to_string(), "No data found for ticker.");
    }

    #[test]
    fn test_insufficient_data_names_required_length() {
        let err = ForecastError::InsufficientData {
            got: 30,
            required: 60,
        };

        let msg = err.to_string();
        assert!(msg.contains("30"));
        assert!(msg.contains("60"));
    }

    #[test]
    fn test_upstream_error_carries_reason_through_conversion() {
        let err: ForecastError = MarketDataError::Upstream {
            reason: "connection refused".to_string(),
        }
        .into();

        assert!(err.to_string().contains("connection refused"));
    }
}
