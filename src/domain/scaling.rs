use serde::{Deserialize, Serialize};

/// Affine map of raw prices onto [0, 1], fit once and immutable afterwards.
///
/// The same instance must scale model inputs and unscale model outputs within
/// one prediction pass; mixing instances silently corrupts results. The
/// training pipeline persists its instance next to the model artifact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxNormalizer {
    min: f64,
    max: f64,
}

impl MinMaxNormalizer {
    /// Fit bounds over the given values. Returns `None` for an empty slice.
    pub fn fit(values: &[f64]) -> Option<Self> {
        let first = *values.first()?;
        let (min, max) = values.iter().fold((first, first), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
        Some(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Map one raw value into [0, 1]. A constant series (max == min) maps
    /// everything to 0 instead of dividing by zero.
    pub fn transform_one(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span == 0.0 {
            0.0
        } else {
            (value - self.min) / span
        }
    }

    /// Exact algebraic inverse of [`Self::transform_one`].
    pub fn inverse_one(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span == 0.0 {
            self.min
        } else {
            value * span + self.min
        }
    }

    pub fn transform(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.transform_one(v)).collect()
    }

    pub fn inverse(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.inverse_one(v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_finds_bounds() {
        let state = MinMaxNormalizer::fit(&[3.0, 1.0, 2.0, 5.0, 4.0]).unwrap();
        assert_eq!(state.min(), 1.0);
        assert_eq!(state.max(), 5.0);
    }

    #[test]
    fn test_fit_on_empty_slice_returns_none() {
        assert!(MinMaxNormalizer::fit(&[]).is_none());
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let values = [100.0, 120.5, 99.25, 150.75, 133.0];
        let state = MinMaxNormalizer::fit(&values).unwrap();

        for v in values {
            let back = state.inverse_one(state.transform_one(v));
            assert!((back - v).abs() < 1e-9, "{v} round-tripped to {back}");
        }
    }

    #[test]
    fn test_transform_is_bounded() {
        let values = [10.0, 20.0, 30.0];
        let state = MinMaxNormalizer::fit(&values).unwrap();
        let scaled = state.transform(&values);

        assert_eq!(scaled, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_constant_series_does_not_produce_nan() {
        let state = MinMaxNormalizer::fit(&[42.0, 42.0, 42.0]).unwrap();

        let scaled = state.transform_one(42.0);
        assert_eq!(scaled, 0.0);
        assert_eq!(state.inverse_one(scaled), 42.0);
        assert!(!state.transform_one(7.0).is_nan());
    }

    #[test]
    fn test_serde_round_trip() {
        let state = MinMaxNormalizer::fit(&[1.0, 9.0]).unwrap();
        let json = serde_json::to_string(&state).unwrap();
        let back: MinMaxNormalizer = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }
}
