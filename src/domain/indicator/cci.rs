//! CCI (Commodity Channel Index) indicator.
//!
//! TP[i] = (H + L + C) / 3. Against the closing-price SMA(n) at the window's end,
//! MD[i] = sum(|TP[k] - SMA[i]| for k in i-n+1..=i) / n and
//! CCI[i] = (TP[i] - SMA[i]) / (0.015 * MD[i]).
//! A mean deviation within float rounding of zero yields 0.
//!
//! Warmup: first (n-1) bars are placeholders.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 20;
pub const LAMBERT_CONSTANT: f64 = 0.015;

/// `sma` must be the closing-price SMA over the same `period` and bars.
pub fn calculate_cci(bars: &[OhlcvBar], sma: &IndicatorSeries, period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Cci(period);
    if period == 0 || bars.len() < period || sma.len() != bars.len() {
        return IndicatorSeries::placeholder(indicator_type, bars.len());
    }

    let typical: Vec<f64> = bars.iter().map(OhlcvBar::typical_price).collect();

    let mut values = vec![0.0; period - 1];
    values.reserve(bars.len() + 1 - period);
    for i in (period - 1)..bars.len() {
        let mean = sma.values[i];
        let window = &typical[i + 1 - period..=i];
        let mean_deviation =
            window.iter().map(|tp| (tp - mean).abs()).sum::<f64>() / period as f64;
        let tolerance = f64::EPSILON * mean.abs().max(1.0) * period as f64;

        let cci = if mean_deviation <= tolerance {
            0.0
        } else {
            (typical[i] - mean) / (LAMBERT_CONSTANT * mean_deviation)
        };
        values.push(cci);
    }

    IndicatorSeries {
        indicator_type,
        warmup: period - 1,
        values,
    }
}
