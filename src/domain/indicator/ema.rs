//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1). The seed is the mean of the first n closes; the first emitted
//! value is EMA[n] = C[n]*k + seed*(1-k), then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! Warmup: first n bars are placeholders.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_ema(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Ema(period);
    if period == 0 || bars.len() <= period {
        return IndicatorSeries::placeholder(indicator_type, bars.len());
    }

    let k = 2.0 / (period as f64 + 1.0);
    let decay = (period as f64 - 1.0) / (period as f64 + 1.0);
    let mut ema = bars[..period].iter().map(|b| b.close).sum::<f64>() / period as f64;

    let mut values = vec![0.0; period];
    values.reserve(bars.len() - period);
    for bar in &bars[period..] {
        ema = bar.close * k + ema * decay;
        values.push(ema);
    }

    IndicatorSeries {
        indicator_type,
        warmup: period,
        values,
    }
}
