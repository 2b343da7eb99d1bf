use crate::domain::errors::ForecastError;
use chrono::NaiveDate;
use std::str::FromStr;

/// A single daily observation for one ticker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Chronological daily close prices for one ticker.
///
/// Built per request by the data source adapter and discarded afterwards;
/// nothing about a series is shared across requests.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    pub fn empty() -> Self {
        Self { points: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Close prices in chronological order.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }
}

/// Requested historical window, parsed from strings like "60d", "3mo", "5y".
///
/// Months and years are approximated as 30 and 365 days; the provider is
/// queried with an absolute timestamp pair derived from this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    days: u32,
}

impl DateRange {
    pub fn from_days(days: u32) -> Self {
        Self { days }
    }

    pub fn days(&self) -> u32 {
        self.days
    }
}

impl Default for DateRange {
    fn default() -> Self {
        // 60 daily bars of history unless the request says otherwise
        Self { days: 60 }
    }
}

impl FromStr for DateRange {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ForecastError::InvalidRange {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = s.trim();
        let (number, unit_days) = if let Some(n) = trimmed.strip_suffix("mo") {
            (n, 30)
        } else if let Some(n) = trimmed.strip_suffix('d') {
            (n, 1)
        } else if let Some(n) = trimmed.strip_suffix('w') {
            (n, 7)
        } else if let Some(n) = trimmed.strip_suffix('y') {
            (n, 365)
        } else {
            return Err(invalid("expected a suffix of d, w, mo or y"));
        };

        let count: u32 = number
            .parse()
            .map_err(|_| invalid("expected a positive whole number before the suffix"))?;
        if count == 0 {
            return Err(invalid("window must cover at least one day"));
        }

        Ok(Self {
            days: count * unit_days,
        })
    }
}
