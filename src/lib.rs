//! stockgym: single-asset trading environment for reinforcement learning.
//!
//! Hexagonal architecture: indicator engine and environment in [`domain`],
//! port traits in [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
