//! Fixed, observation-independent policies for diagnostic rollouts.

use crate::domain::action::ACTION_COUNT;
use crate::domain::environment::Observation;
use crate::domain::error::GymError;
use crate::ports::policy_port::Policy;

/// Always takes the same action.
#[derive(Debug, Clone)]
pub struct ConstantPolicy {
    action: usize,
    name: String,
}

impl ConstantPolicy {
    pub fn new(action: usize) -> Self {
        Self {
            action,
            name: format!("constant({})", action),
        }
    }
}

impl Policy for ConstantPolicy {
    fn name(&self) -> &str {
        &self.name
    }

    fn select_action(&mut self, _observation: &Observation) -> usize {
        self.action
    }
}

/// Cycles through a fixed list of actions, restarting at each episode.
#[derive(Debug, Clone)]
pub struct ScriptedPolicy {
    actions: Vec<usize>,
    cursor: usize,
    name: String,
}

impl ScriptedPolicy {
    pub fn new(actions: Vec<usize>) -> Result<Self, GymError> {
        if actions.is_empty() {
            return Err(GymError::ConfigInvalid {
                section: "episode".into(),
                key: "actions".into(),
                reason: "action script is empty".into(),
            });
        }
        if let Some(&action) = actions.iter().find(|&&a| a >= ACTION_COUNT) {
            return Err(GymError::InvalidAction {
                action,
                arity: ACTION_COUNT,
            });
        }

        let name = format!(
            "scripted({})",
            actions
                .iter()
                .map(|a| a.to_string())
                .collect::<Vec<_>>()
                .join(",")
        );
        Ok(Self {
            actions,
            cursor: 0,
            name,
        })
    }

    /// Parse a comma-separated action list such as `"8,4,4,0"`.
    pub fn parse(script: &str) -> Result<Self, GymError> {
        let actions = script
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<usize>().map_err(|_| GymError::ConfigInvalid {
                    section: "episode".into(),
                    key: "actions".into(),
                    reason: format!("'{}' is not an action id", s),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(actions)
    }
}

impl Policy for ScriptedPolicy {
    fn name(&self) -> &str {
        &self.name
    }

    fn select_action(&mut self, _observation: &Observation) -> usize {
        let action = self.actions[self.cursor];
        self.cursor = (self.cursor + 1) % self.actions.len();
        action
    }

    fn reset(&mut self) {
        self.cursor = 0;
    }
}
