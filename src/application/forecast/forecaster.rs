use crate::application::ml::predictor::SequenceModel;
use crate::domain::errors::ForecastError;
use crate::domain::scaling::MinMaxNormalizer;
use std::collections::VecDeque;
use std::sync::Arc;

/// Number of future steps produced per forecast.
pub const FORECAST_HORIZON: usize = 7;

/// Drives a one-step model across multiple future steps.
///
/// Classic autoregressive rollout: each prediction is appended (still
/// normalized) to the input window for the next step, so uncertainty
/// compounds and no correction is applied.
pub struct IterativeForecaster {
    model: Arc<dyn SequenceModel>,
    horizon: usize,
}

impl IterativeForecaster {
    pub fn new(model: Arc<dyn SequenceModel>) -> Self {
        Self {
            model,
            horizon: FORECAST_HORIZON,
        }
    }

    pub fn with_horizon(model: Arc<dyn SequenceModel>, horizon: usize) -> Self {
        Self { model, horizon }
    }

    /// Produce the denormalized forecast for a chronological close series.
    ///
    /// The normalizer is fit over the entire series, and that one instance
    /// both scales the seed window and unscales every prediction.
    pub fn forecast(&self, closes: &[f64]) -> Result<Vec<f64>, ForecastError> {
        let required = self.model.window_size();
        if closes.len() < required {
            return Err(ForecastError::InsufficientData {
                got: closes.len(),
                required,
            });
        }

        let normalizer = MinMaxNormalizer::fit(closes).ok_or(ForecastError::NoData)?;
        let scaled = normalizer.transform(closes);

        let mut window: VecDeque<f64> = scaled[scaled.len() - required..].iter().copied().collect();
        let mut forecast = Vec::with_capacity(self.horizon);

        for _ in 0..self.horizon {
            let input: Vec<f64> = window.iter().copied().collect();
            let predicted = self.model.predict_next(&input)?;

            forecast.push(normalizer.inverse_one(predicted));

            // Advance: drop the oldest element, append the normalized
            // prediction (not the denormalized price).
            window.pop_front();
            window.push_back(predicted);
        }

        Ok(forecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Echoes the newest window element; rollout output stays flat.
    struct PersistenceModel {
        window: usize,
    }

    impl SequenceModel for PersistenceModel {
        fn predict_next(&self, window: &[f64]) -> Result<f64, ForecastError> {
            Ok(window[window.len() - 1])
        }

        fn window_size(&self) -> usize {
            self.window
        }

        fn name(&self) -> &str {
            "persistence"
        }

        fn version(&self) -> &str {
            "test"
        }
    }

    fn forecaster() -> IterativeForecaster {
        IterativeForecaster::new(Arc::new(PersistenceModel { window: 60 }))
    }

    #[test]
    fn test_forecast_has_exactly_horizon_steps() {
        let closes: Vec<f64> = (0..90).map(|i| 100.0 + i as f64).collect();
        let forecast = forecaster().forecast(&closes).unwrap();
        assert_eq!(forecast.len(), FORECAST_HORIZON);
    }

    #[test]
    fn test_short_series_is_an_input_error() {
        let closes: Vec<f64> = (0..59).map(|i| 100.0 + i as f64).collect();
        let err = forecaster().forecast(&closes).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::InsufficientData {
                got: 59,
                required: 60
            }
        ));
    }

    #[test]
    fn test_exactly_window_length_is_accepted() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        assert!(forecaster().forecast(&closes).is_ok());
    }

    #[test]
    fn test_predictions_are_denormalized() {
        // Persistence on the max of an increasing series: every step echoes
        // the newest element, which the normalizer maps back to the last raw
        // close.
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let forecast = forecaster().forecast(&closes).unwrap();
        for step in forecast {
            assert!((step - 159.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_constant_series_stays_finite() {
        let closes = vec![42.0; 60];
        let forecast = forecaster().forecast(&closes).unwrap();
        assert_eq!(forecast.len(), FORECAST_HORIZON);
        for step in forecast {
            assert_eq!(step, 42.0);
        }
    }

    #[test]
    fn test_custom_horizon_is_honored() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let forecaster =
            IterativeForecaster::with_horizon(Arc::new(PersistenceModel { window: 60 }), 3);
        assert_eq!(forecaster.forecast(&closes).unwrap().len(), 3);
    }
}
