use crate::domain::errors::ForecastError;

/// Interface for sequence-to-one forecast models.
///
/// Implementations map a fixed-length window of normalized prices to the
/// next normalized price. Inference takes `&self` only, so a loaded model is
/// safe to share read-only across concurrent requests.
pub trait SequenceModel: Send + Sync {
    /// Predict the next normalized value from a window of exactly
    /// `window_size()` normalized values.
    fn predict_next(&self, window: &[f64]) -> Result<f64, ForecastError>;

    /// Length of the input window the model was trained on.
    fn window_size(&self) -> usize;

    /// Get model name/type
    fn name(&self) -> &str;

    /// Get model version/id
    fn version(&self) -> &str;
}
