//! Step-wise trading environment over historical daily bars.
//!
//! Gym-style contract: `reset` returns the first observation, `step` applies
//! one discrete action and advances one trading day, `render` reports the
//! portfolio without touching it. Trades execute at the current day's close;
//! the reward marks the portfolio to the next day's close.
//!
//! The environment borrows its price and indicator data, so any number of
//! environments can run over the same loaded series.

use std::fmt;

use tracing::{debug, info};

use crate::domain::action::{ActionModel, ACTION_COUNT};
use crate::domain::error::GymError;
use crate::domain::indicator::IndicatorSet;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::portfolio::{Fill, Portfolio, START_DAY};

pub const DEFAULT_STOPPING_DAY: usize = 1200;
pub const OBSERVATION_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvConfig {
    /// Stepping on this day marks the episode terminal.
    pub stopping_day: usize,
    pub model: ActionModel,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            stopping_day: DEFAULT_STOPPING_DAY,
            model: ActionModel::default(),
        }
    }
}

impl EnvConfig {
    /// Bars the price series must hold: the final step reads the close one
    /// day past `stopping_day`.
    pub fn required_bars(&self) -> usize {
        self.stopping_day + 2
    }
}

/// `[balance, shares, sma_20, sma_50, sma_200, macd, rsi, cci]` at one day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub balance: f64,
    pub shares: f64,
    pub sma_20: f64,
    pub sma_50: f64,
    pub sma_200: f64,
    pub macd: f64,
    pub rsi: f64,
    pub cci: f64,
}

impl Observation {
    pub fn to_array(&self) -> [f64; OBSERVATION_SIZE] {
        [
            self.balance,
            self.shares,
            self.sma_20,
            self.sma_50,
            self.sma_200,
            self.macd,
            self.rsi,
            self.cci,
        ]
    }
}

impl From<Observation> for [f64; OBSERVATION_SIZE] {
    fn from(observation: Observation) -> Self {
        observation.to_array()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Day after the step.
    pub day: usize,
    /// Close the trade executed at.
    pub price: f64,
    pub fill: Fill,
    pub balance: f64,
    pub shares: u64,
    /// Value marked at the new day's close.
    pub portfolio_value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f64,
    pub done: bool,
    pub info: StepInfo,
}

/// Point-in-time view of the portfolio for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub day: usize,
    pub balance: f64,
    pub shares: u64,
    pub total_value: f64,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Day Number: {}", self.day)?;
        writeln!(f, "Balance: {:.2}", self.balance)?;
        writeln!(f, "Shares: {}", self.shares)?;
        write!(f, "Portfolio total value: {:.2}", self.total_value)
    }
}

#[derive(Debug, Clone)]
pub struct StockEnvironment<'a> {
    prices: &'a PriceSeries,
    indicators: &'a IndicatorSet,
    config: EnvConfig,
    portfolio: Portfolio,
    terminal: bool,
}

impl<'a> StockEnvironment<'a> {
    pub fn new(
        prices: &'a PriceSeries,
        indicators: &'a IndicatorSet,
        config: EnvConfig,
    ) -> Result<Self, GymError> {
        if indicators.len() != prices.len() {
            return Err(GymError::LengthMismatch {
                prices: prices.len(),
                indicators: indicators.len(),
            });
        }
        if config.stopping_day < START_DAY {
            return Err(GymError::ConfigInvalid {
                section: "environment".into(),
                key: "stopping_day".into(),
                reason: format!("must be at least {}", START_DAY),
            });
        }
        if prices.len() < config.required_bars() {
            return Err(GymError::InsufficientData {
                bars: prices.len(),
                minimum: config.required_bars(),
            });
        }

        Ok(Self {
            prices,
            indicators,
            config,
            portfolio: Portfolio::new(),
            terminal: false,
        })
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn day(&self) -> usize {
        self.portfolio.day
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn reset(&mut self) -> Result<Observation, GymError> {
        self.portfolio.reset();
        self.terminal = false;
        info!(day = self.portfolio.day, model = %self.config.model, "environment reset");
        self.observe()
    }

    pub fn step(&mut self, action: usize) -> Result<StepResult, GymError> {
        let fraction = self
            .config
            .model
            .fraction(action)
            .ok_or(GymError::InvalidAction {
                action,
                arity: ACTION_COUNT,
            })?;

        let day = self.portfolio.day;
        let price = self.prices.close(day)?;
        let new_price = self.prices.close(day + 1)?;
        let old_value = self.portfolio.value(price);

        let fill = self.portfolio.execute(fraction, price)?;

        if day == self.config.stopping_day {
            self.terminal = true;
            info!(day, "episode reached stopping day");
        }

        self.portfolio.day += 1;
        let new_value = self.portfolio.value(new_price);
        let observation = self.observe()?;
        let reward = new_value - old_value;

        debug!(day, action, fraction, reward, "step");

        Ok(StepResult {
            observation,
            reward,
            done: self.terminal,
            info: StepInfo {
                day: self.portfolio.day,
                price,
                fill,
                balance: self.portfolio.balance,
                shares: self.portfolio.shares,
                portfolio_value: new_value,
            },
        })
    }

    pub fn render(&self) -> Result<Snapshot, GymError> {
        let price = self.prices.close(self.portfolio.day)?;
        let snapshot = Snapshot {
            day: self.portfolio.day,
            balance: self.portfolio.balance,
            shares: self.portfolio.shares,
            total_value: self.portfolio.value(price),
        };
        info!(
            day = snapshot.day,
            balance = snapshot.balance,
            shares = snapshot.shares,
            total_value = snapshot.total_value,
            "render"
        );
        Ok(snapshot)
    }

    fn observe(&self) -> Result<Observation, GymError> {
        let [sma_20, sma_50, sma_200, macd, rsi, cci] = self.indicators.row(self.portfolio.day)?;
        Ok(Observation {
            balance: self.portfolio.balance,
            shares: self.portfolio.shares as f64,
            sma_20,
            sma_50,
            sma_200,
            macd,
            rsi,
            cci,
        })
    }
}
