//! Cash and share holdings for a single asset.

use tracing::debug;

use super::error::GymError;

pub const INITIAL_BALANCE: f64 = 100.0;
/// First day on which SMA(200) has a value.
pub const START_DAY: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

/// Outcome of sizing and executing one action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub side: Side,
    pub shares: u64,
    pub price: f64,
}

impl Fill {
    pub fn notional(&self) -> f64 {
        self.shares as f64 * self.price
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub balance: f64,
    pub shares: u64,
    pub day: usize,
}

impl Default for Portfolio {
    fn default() -> Self {
        Self::new()
    }
}

impl Portfolio {
    pub fn new() -> Self {
        Portfolio {
            balance: INITIAL_BALANCE,
            shares: 0,
            day: START_DAY,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Mark-to-market value at `price`.
    pub fn value(&self, price: f64) -> f64 {
        price * self.shares as f64 + self.balance
    }

    /// Trade `fraction` of the balance (positive) or of the holding (zero or
    /// negative) at `price`, in whole shares rounded down.
    ///
    /// A resulting negative balance is an invariant violation: the error is
    /// returned and the portfolio is left unchanged.
    pub fn execute(&mut self, fraction: f64, price: f64) -> Result<Fill, GymError> {
        let (side, shares, balance, held) = if fraction > 0.0 {
            let shares = (fraction * self.balance / price).floor() as u64;
            (
                Side::Buy,
                shares,
                self.balance - shares as f64 * price,
                self.shares + shares,
            )
        } else {
            let shares = (-fraction * self.shares as f64).floor() as u64;
            (
                Side::Sell,
                shares,
                self.balance + shares as f64 * price,
                self.shares - shares,
            )
        };

        if balance < 0.0 {
            return Err(GymError::NegativeBalance {
                balance,
                fraction,
                shares: held,
                price,
            });
        }

        self.balance = balance;
        self.shares = held;

        if shares > 0 {
            debug!(day = self.day, ?side, shares, price, balance, "trade executed");
        }

        Ok(Fill {
            side,
            shares,
            price,
        })
    }
}
