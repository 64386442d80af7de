//! Episode runner: drives an environment from reset to terminal with a policy.

use tracing::info;

use crate::domain::environment::StockEnvironment;
use crate::domain::error::GymError;
use crate::domain::metrics::Metrics;
use crate::domain::portfolio::Side;
use crate::ports::policy_port::Policy;

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSummary {
    pub policy: String,
    pub steps: usize,
    pub terminal: bool,
    pub total_reward: f64,
    pub initial_value: f64,
    pub final_value: f64,
    pub buy_steps: usize,
    pub sell_steps: usize,
    pub hold_steps: usize,
    /// Value at reset followed by the marked value after each step.
    pub equity_curve: Vec<f64>,
    pub metrics: Metrics,
}

/// Reset `env` and `policy`, then step until the episode is terminal or
/// `max_steps` steps have run.
pub fn run_episode(
    env: &mut StockEnvironment<'_>,
    policy: &mut dyn Policy,
    max_steps: Option<usize>,
) -> Result<EpisodeSummary, GymError> {
    policy.reset();
    let mut observation = env.reset()?;
    let initial_value = env.render()?.total_value;

    let mut equity_curve = vec![initial_value];
    let mut total_reward = 0.0;
    let (mut buy_steps, mut sell_steps, mut hold_steps) = (0, 0, 0);
    let mut steps = 0;

    while !env.is_terminal() && max_steps.is_none_or(|max| steps < max) {
        let action = policy.select_action(&observation);
        let result = env.step(action)?;

        match (result.info.fill.side, result.info.fill.shares) {
            (_, 0) => hold_steps += 1,
            (Side::Buy, _) => buy_steps += 1,
            (Side::Sell, _) => sell_steps += 1,
        }

        total_reward += result.reward;
        equity_curve.push(result.info.portfolio_value);
        observation = result.observation;
        steps += 1;
    }

    let final_value = equity_curve.last().copied().unwrap_or(initial_value);
    let metrics = Metrics::compute(&equity_curve);

    info!(
        policy = policy.name(),
        steps,
        total_reward,
        final_value,
        "episode finished"
    );

    Ok(EpisodeSummary {
        policy: policy.name().to_string(),
        steps,
        terminal: env.is_terminal(),
        total_reward,
        initial_value,
        final_value,
        buy_steps,
        sell_steps,
        hold_steps,
        equity_curve,
        metrics,
    })
}
