//! Price data access port trait.

use crate::domain::error::GymError;
use crate::domain::ohlcv::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort {
    /// Full daily history for `symbol`, ordered by date.
    fn fetch_prices(&self, symbol: &str) -> Result<PriceSeries, GymError>;

    fn list_symbols(&self) -> Result<Vec<String>, GymError>;

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, GymError> {
        Ok(self.fetch_prices(symbol)?.date_range())
    }
}
