//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow), element by element over every bar.
//!
//! Both EMAs are zero through their own warm-up, so for fast <= i < slow the
//! line equals EMA(fast) alone. Those values are kept as computed; `warmup`
//! is reported as `slow` so callers can tell them apart.

use crate::domain::indicator::{calculate_ema, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;

pub fn calculate_macd(bars: &[OhlcvBar], fast: usize, slow: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Macd { fast, slow };
    if fast == 0 || slow == 0 {
        return IndicatorSeries::placeholder(indicator_type, bars.len());
    }

    let ema_fast = calculate_ema(bars, fast);
    let ema_slow = calculate_ema(bars, slow);

    let values = ema_fast
        .values
        .iter()
        .zip(&ema_slow.values)
        .map(|(f, s)| f - s)
        .collect();

    IndicatorSeries {
        indicator_type,
        warmup: fast.max(slow).min(bars.len()),
        values,
    }
}

pub fn calculate_macd_default(bars: &[OhlcvBar]) -> IndicatorSeries {
    calculate_macd(bars, DEFAULT_FAST, DEFAULT_SLOW)
}
