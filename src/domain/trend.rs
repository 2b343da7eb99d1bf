use std::fmt;

/// Number of trailing observations inspected for the trend label.
pub const TREND_LOOKBACK: usize = 14;

/// Coarse directional classification of a recent price window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendLabel {
    Bullish,
    Bearish,
    Neutral,
}

impl TrendLabel {
    /// Human-readable sentiment string used in the HTTP response.
    pub fn as_sentiment(&self) -> &'static str {
        match self {
            TrendLabel::Bullish => "Bullish Trend (Expected growth)",
            TrendLabel::Bearish => "Bearish Trend (Expected fall)",
            TrendLabel::Neutral => "Neutral Trend (No significant change)",
        }
    }
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sentiment())
    }
}

/// Classify the direction of the most recent prices.
///
/// Compares the last close against the first of the trailing
/// [`TREND_LOOKBACK`] closes (the whole series when it is shorter). The zero
/// case is an exact comparison.
pub fn classify(closes: &[f64]) -> TrendLabel {
    let tail = &closes[closes.len().saturating_sub(TREND_LOOKBACK)..];
    let (Some(first), Some(last)) = (tail.first(), tail.last()) else {
        return TrendLabel::Neutral;
    };

    let delta = last - first;
    if delta > 0.0 {
        TrendLabel::Bullish
    } else if delta < 0.0 {
        TrendLabel::Bearish
    } else {
        TrendLabel::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_delta_is_bullish() {
        let closes: Vec<f64> = (0..TREND_LOOKBACK).map(|i| 100.0 + i as f64).collect();
        assert_eq!(classify(&closes), TrendLabel::Bullish);
    }

    #[test]
    fn test_negative_delta_is_bearish() {
        let closes: Vec<f64> = (0..TREND_LOOKBACK).map(|i| 100.0 - i as f64).collect();
        assert_eq!(classify(&closes), TrendLabel::Bearish);
    }

    #[test]
    fn test_zero_delta_is_exactly_neutral() {
        // Flat endpoints with movement in between still count as neutral.
        let closes = [100.0, 105.0, 95.0, 100.0];
        assert_eq!(classify(&closes), TrendLabel::Neutral);
    }

    #[test]
    fn test_only_trailing_window_is_considered() {
        // Steep rise long ago, gentle decline across the trailing window.
        let mut closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        for i in 0..TREND_LOOKBACK {
            closes.push(129.0 - i as f64);
        }
        assert_eq!(classify(&closes), TrendLabel::Bearish);
    }

    #[test]
    fn test_short_series_uses_whole_series() {
        assert_eq!(classify(&[100.0, 101.0]), TrendLabel::Bullish);
        assert_eq!(classify(&[]), TrendLabel::Neutral);
    }

    #[test]
    fn test_sentiment_strings() {
        assert_eq!(
            TrendLabel::Bullish.to_string(),
            "Bullish Trend (Expected growth)"
        );
        assert_eq!(
            TrendLabel::Bearish.to_string(),
            "Bearish Trend (Expected fall)"
        );
        assert_eq!(
            TrendLabel::Neutral.to_string(),
            "Neutral Trend (No significant change)"
        );
    }
}
