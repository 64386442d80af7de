//! CSV file data adapter.
//!
//! One file per symbol at `<base_path>/<SYMBOL>.csv`; the file name is matched
//! case-insensitively when no exact match exists. Columns are located by
//! header name (case-insensitive): `date`, `open`, `high`, `low`, `close`
//! and an optional `volume`. Extra columns such as `adj close` are ignored.

use crate::domain::error::GymError;
use crate::domain::ohlcv::{OhlcvBar, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, GymError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| GymError::Data {
                reason: format!("missing {} column", name),
            })
        };

        Ok(Self {
            date: require("date")?,
            open: require("open")?,
            high: require("high")?,
            low: require("low")?,
            close: require("close")?,
            volume: find("volume"),
        })
    }
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        let exact = self.base_path.join(format!("{}.csv", symbol));
        if exact.is_file() {
            return exact;
        }
        fs::read_dir(&self.base_path)
            .ok()
            .and_then(|entries| {
                entries.filter_map(Result::ok).map(|e| e.path()).find(|path| {
                    path.extension().is_some_and(|ext| ext == "csv")
                        && path
                            .file_stem()
                            .and_then(|stem| stem.to_str())
                            .is_some_and(|stem| stem.eq_ignore_ascii_case(symbol))
                })
            })
            .unwrap_or(exact)
    }
}

fn parse_field<T: std::str::FromStr>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<T, GymError>
where
    T::Err: std::fmt::Display,
{
    record
        .get(index)
        .ok_or_else(|| GymError::Data {
            reason: format!("missing {} value", name),
        })?
        .trim()
        .parse()
        .map_err(|e| GymError::Data {
            reason: format!("invalid {} value: {}", name, e),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_prices(&self, symbol: &str) -> Result<PriceSeries, GymError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| GymError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| GymError::Data {
            reason: format!("CSV header error: {}", e),
        })?;
        let columns = Columns::from_headers(headers)?;
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| GymError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(columns.date).ok_or_else(|| GymError::Data {
                reason: "missing date value".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                GymError::Data {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            let volume = match columns.volume {
                Some(index) => parse_field::<f64>(&record, index, "volume")? as i64,
                None => 0,
            };

            bars.push(OhlcvBar {
                date,
                open: parse_field(&record, columns.open, "open")?,
                high: parse_field(&record, columns.high, "high")?,
                low: parse_field(&record, columns.low, "low")?,
                close: parse_field(&record, columns.close, "close")?,
                volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        PriceSeries::new(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, GymError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| GymError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| GymError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
