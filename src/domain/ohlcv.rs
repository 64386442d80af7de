//! Daily OHLCV bars and the immutable price series built from them.

use chrono::NaiveDate;

use super::error::GymError;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl OhlcvBar {
    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}

/// Ordered daily bars indexed by zero-based day.
///
/// Every price is finite and every close is strictly positive, so the
/// environment can size trades by dividing by the close.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    bars: Vec<OhlcvBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<OhlcvBar>) -> Result<Self, GymError> {
        for (index, bar) in bars.iter().enumerate() {
            let prices = [bar.open, bar.high, bar.low, bar.close];
            if prices.iter().any(|p| !p.is_finite()) {
                return Err(GymError::InvalidBar {
                    index,
                    reason: "non-finite price".into(),
                });
            }
            if bar.close <= 0.0 {
                return Err(GymError::InvalidBar {
                    index,
                    reason: format!("close must be positive, got {}", bar.close),
                });
            }
        }
        Ok(Self { bars })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn bar(&self, day: usize) -> Result<&OhlcvBar, GymError> {
        self.bars.get(day).ok_or(GymError::DayOutOfRange {
            day,
            len: self.bars.len(),
        })
    }

    pub fn close(&self, day: usize) -> Result<f64, GymError> {
        self.bar(day).map(|b| b.close)
    }

    /// First and last date with the bar count, or `None` when empty.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate, usize)> {
        let first = self.bars.first()?;
        let last = self.bars.last()?;
        Some((first.date, last.date, self.bars.len()))
    }
}
