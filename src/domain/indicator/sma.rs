//! Simple Moving Average indicator.
//!
//! Running sum over the last n closes: SMA[i] = sum(C[i-n+1..=i]) / n.
//! Warmup: first (n-1) bars are placeholders.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Sma(period);
    if period == 0 || bars.len() < period {
        return IndicatorSeries::placeholder(indicator_type, bars.len());
    }

    let mut values = Vec::with_capacity(bars.len());
    let mut sum = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        if i >= period {
            sum += bar.close - bars[i - period].close;
        } else {
            sum += bar.close;
        }

        if i + 1 < period {
            values.push(0.0);
        } else {
            values.push(sum / period as f64);
        }
    }

    IndicatorSeries {
        indicator_type,
        warmup: period - 1,
        values,
    }
}
