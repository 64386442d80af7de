//! Technical indicator implementations.
//!
//! This module provides types for representing indicator output:
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorSeries`: one value per day, zero-filled through the warm-up window
//! - `IndicatorSet`: the six aligned series the environment observes

pub mod sma;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod cci;

pub use cci::calculate_cci;
pub use ema::calculate_ema;
pub use macd::calculate_macd;
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;

use std::fmt;

use crate::domain::error::GymError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Macd { fast: usize, slow: usize },
    Rsi(usize),
    Cci(usize),
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Macd { fast, slow } => write!(f, "MACD({},{})", fast, slow),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Cci(period) => write!(f, "CCI({})", period),
        }
    }
}

/// Values aligned by day index. Indices below `warmup` hold the `0.0`
/// placeholder and carry no signal.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub warmup: usize,
    pub values: Vec<f64>,
}

impl IndicatorSeries {
    /// A series of `len` placeholders that never warms up.
    pub fn placeholder(indicator_type: IndicatorType, len: usize) -> Self {
        Self {
            indicator_type,
            warmup: len,
            values: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_warm(&self, day: usize) -> bool {
        day >= self.warmup && day < self.values.len()
    }

    pub fn value(&self, day: usize) -> Result<f64, GymError> {
        self.values.get(day).copied().ok_or(GymError::DayOutOfRange {
            day,
            len: self.values.len(),
        })
    }
}

/// Canonical names, in observation order.
pub const INDICATOR_NAMES: [&str; 6] = ["sma_20", "sma_50", "sma_200", "macd", "rsi", "cci"];

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    pub sma_20: IndicatorSeries,
    pub sma_50: IndicatorSeries,
    pub sma_200: IndicatorSeries,
    pub macd: IndicatorSeries,
    pub rsi: IndicatorSeries,
    pub cci: IndicatorSeries,
}

impl IndicatorSet {
    pub fn len(&self) -> usize {
        self.sma_20.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sma_20.is_empty()
    }

    pub fn get(&self, name: &str) -> Result<&IndicatorSeries, GymError> {
        match name {
            "sma_20" => Ok(&self.sma_20),
            "sma_50" => Ok(&self.sma_50),
            "sma_200" => Ok(&self.sma_200),
            "macd" => Ok(&self.macd),
            "rsi" => Ok(&self.rsi),
            "cci" => Ok(&self.cci),
            other => Err(GymError::UnknownIndicator(other.to_string())),
        }
    }

    pub fn by_type(&self, indicator_type: IndicatorType) -> Option<&IndicatorSeries> {
        self.iter()
            .map(|(_, s)| s)
            .find(|s| s.indicator_type == indicator_type)
    }

    /// Series paired with their canonical names, in observation order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &IndicatorSeries)> {
        INDICATOR_NAMES.into_iter().zip([
            &self.sma_20,
            &self.sma_50,
            &self.sma_200,
            &self.macd,
            &self.rsi,
            &self.cci,
        ])
    }

    /// The six indicator values at `day`, in observation order.
    pub fn row(&self, day: usize) -> Result<[f64; 6], GymError> {
        Ok([
            self.sma_20.value(day)?,
            self.sma_50.value(day)?,
            self.sma_200.value(day)?,
            self.macd.value(day)?,
            self.rsi.value(day)?,
            self.cci.value(day)?,
        ])
    }
}
