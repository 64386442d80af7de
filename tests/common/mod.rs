#![allow(dead_code)]

use chrono::NaiveDate;
pub use stockgym::domain::ohlcv::{OhlcvBar, PriceSeries};
use stockgym::domain::error::GymError;
use stockgym::ports::data_port::DataPort;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(&self, symbol: &str) -> Result<PriceSeries, GymError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(GymError::Data {
                reason: reason.clone(),
            });
        }
        PriceSeries::new(self.data.get(symbol).cloned().unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, GymError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date: NaiveDate, close: f64) -> OhlcvBar {
    OhlcvBar {
        date,
        open: close,
        high: close + 1.0,
        low: (close - 1.0).max(0.01),
        close,
        volume: 1000,
    }
}

/// One bar per calendar day starting 2015-01-01, closing at `closes[i]`.
pub fn bars_from_closes(closes: &[f64]) -> Vec<OhlcvBar> {
    let start = date(2015, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_bar(start + chrono::Duration::days(i as i64), c))
        .collect()
}

pub fn constant_bars(count: usize, close: f64) -> Vec<OhlcvBar> {
    bars_from_closes(&vec![close; count])
}

/// Deterministic oscillating walk that stays well above zero.
pub fn wavy_bars(count: usize, start_price: f64) -> Vec<OhlcvBar> {
    let closes: Vec<f64> = (0..count)
        .map(|i| {
            let t = i as f64;
            start_price + 0.02 * t + 3.0 * (t / 7.0).sin() + 1.5 * (t / 3.0).cos()
        })
        .collect();
    bars_from_closes(&closes)
}

pub fn series(bars: Vec<OhlcvBar>) -> PriceSeries {
    PriceSeries::new(bars).unwrap()
}

pub fn write_csv(dir: &Path, symbol: &str, bars: &[OhlcvBar]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.volume
        ));
    }
    fs::write(dir.join(format!("{}.csv", symbol)), content).unwrap();
}
