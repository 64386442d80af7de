//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod indicator_helpers;
pub mod action;
pub mod portfolio;
pub mod environment;
pub mod episode;
pub mod metrics;
pub mod config_validation;
pub mod error;
