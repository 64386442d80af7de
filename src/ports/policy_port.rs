//! Action selection port used by the episode runner.

use crate::domain::environment::Observation;

pub trait Policy {
    fn name(&self) -> &str;

    /// Action id for the current observation.
    fn select_action(&mut self, observation: &Observation) -> usize;

    /// Called at the start of every episode.
    fn reset(&mut self) {}
}
