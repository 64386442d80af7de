//! Aggregate entry point computing the full observation indicator set.

use tracing::debug;

use crate::domain::error::GymError;
use crate::domain::indicator::{
    calculate_cci, calculate_macd, calculate_rsi, calculate_sma, cci, macd, rsi, IndicatorSet,
};
use crate::domain::ohlcv::PriceSeries;

/// Bars needed before the slowest indicator (SMA(200)) produces a value.
pub const MIN_INDICATOR_BARS: usize = 200;

/// Compute SMA(20/50/200), MACD(12,26), RSI(14) and CCI(20) over `prices`.
///
/// SMA(20) is computed first because CCI consumes it.
pub fn compute_indicators(prices: &PriceSeries) -> Result<IndicatorSet, GymError> {
    if prices.len() < MIN_INDICATOR_BARS {
        return Err(GymError::InsufficientData {
            bars: prices.len(),
            minimum: MIN_INDICATOR_BARS,
        });
    }

    let bars = prices.bars();
    let sma_20 = calculate_sma(bars, 20);
    let sma_50 = calculate_sma(bars, 50);
    let sma_200 = calculate_sma(bars, 200);
    let macd = calculate_macd(bars, macd::DEFAULT_FAST, macd::DEFAULT_SLOW);
    let rsi = calculate_rsi(bars, rsi::DEFAULT_PERIOD);
    let cci = calculate_cci(bars, &sma_20, cci::DEFAULT_PERIOD);

    debug!(bars = bars.len(), "computed indicator set");

    Ok(IndicatorSet {
        sma_20,
        sma_50,
        sma_200,
        macd,
        rsi,
        cci,
    })
}
