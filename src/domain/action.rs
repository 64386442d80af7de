//! Discrete action space and its mapping to trade fractions.
//!
//! A positive fraction spends that share of the cash balance on stock; a
//! non-positive fraction liquidates that share of the held stock.

use std::fmt;
use std::str::FromStr;

pub const ACTION_COUNT: usize = 9;

const FULL_FRACTIONS: [f64; ACTION_COUNT] = [-1.0, -0.5, -0.25, -0.1, 0.0, 0.1, 0.25, 0.5, 1.0];
const CAPPED_FRACTIONS: [f64; ACTION_COUNT] =
    [-0.75, -0.5, -0.25, -0.1, 0.0, 0.1, 0.25, 0.5, 0.75];

/// Which action table an environment uses. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionModel {
    /// Trades up to the whole balance or holding (the DQN table).
    #[default]
    Full,
    /// Trades at most three quarters of the balance or holding.
    Capped,
}

impl ActionModel {
    pub fn fractions(self) -> &'static [f64; ACTION_COUNT] {
        match self {
            ActionModel::Full => &FULL_FRACTIONS,
            ActionModel::Capped => &CAPPED_FRACTIONS,
        }
    }

    /// Fraction for `action`, or `None` when it is outside the action space.
    pub fn fraction(self, action: usize) -> Option<f64> {
        self.fractions().get(action).copied()
    }

    /// Action id of the no-op.
    pub fn hold(self) -> usize {
        ACTION_COUNT / 2
    }
}

impl fmt::Display for ActionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionModel::Full => write!(f, "full"),
            ActionModel::Capped => write!(f, "capped"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action model '{0}' (expected dqn/full/a or capped/b)")]
pub struct UnknownActionModel(pub String);

impl FromStr for ActionModel {
    type Err = UnknownActionModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dqn" | "full" | "a" => Ok(ActionModel::Full),
            "capped" | "b" | "ppo" | "a2c" => Ok(ActionModel::Capped),
            other => Err(UnknownActionModel(other.to_string())),
        }
    }
}
