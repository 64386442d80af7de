//! Integration tests for the indicator engine and trading environment.
//!
//! Tests cover:
//! - Loading prices through a data port and computing the indicator set
//! - Constant-market scenario at the first tradable day
//! - Reset, step and render contracts of the environment
//! - Portfolio invariants over a scripted episode
//! - Episode runner results against the step-by-step rewards

mod common;

use approx::assert_relative_eq;
use common::*;
use stockgym::adapters::scripted_policy::{ConstantPolicy, ScriptedPolicy};
use stockgym::domain::action::ActionModel;
use stockgym::domain::environment::{EnvConfig, StockEnvironment};
use stockgym::domain::episode::run_episode;
use stockgym::domain::error::GymError;
use stockgym::domain::indicator::IndicatorSet;
use stockgym::domain::indicator_helpers::{compute_indicators, MIN_INDICATOR_BARS};
use stockgym::domain::portfolio::{Side, INITIAL_BALANCE, START_DAY};
use stockgym::ports::data_port::DataPort;

fn config(stopping_day: usize, model: ActionModel) -> EnvConfig {
    EnvConfig {
        stopping_day,
        model,
    }
}

fn setup(bars: Vec<OhlcvBar>) -> (PriceSeries, IndicatorSet) {
    let prices = series(bars);
    let indicators = compute_indicators(&prices).unwrap();
    (prices, indicators)
}

mod data_pipeline {
    use super::*;

    #[test]
    fn mock_port_feeds_indicator_engine() {
        let port = MockDataPort::new().with_bars("SPY", wavy_bars(300, 50.0));

        let prices = port.fetch_prices("SPY").unwrap();
        let indicators = compute_indicators(&prices).unwrap();

        assert_eq!(prices.len(), 300);
        assert_eq!(indicators.len(), 300);
        for (_, s) in indicators.iter() {
            assert_eq!(s.len(), prices.len());
        }
    }

    #[test]
    fn fetch_error_propagates() {
        let port = MockDataPort::new().with_error("SPY", "disk on fire");
        let err = port.fetch_prices("SPY").unwrap_err();
        assert!(matches!(err, GymError::Data { reason } if reason == "disk on fire"));
    }

    #[test]
    fn data_range_via_default_method() {
        let port = MockDataPort::new().with_bars("SPY", constant_bars(10, 5.0));
        let (first, last, count) = port.get_data_range("SPY").unwrap().unwrap();
        assert_eq!(first, date(2015, 1, 1));
        assert_eq!(last, date(2015, 1, 10));
        assert_eq!(count, 10);
        assert_eq!(port.get_data_range("QQQ").unwrap(), None);
    }

    #[test]
    fn short_history_is_rejected() {
        let prices = series(constant_bars(MIN_INDICATOR_BARS - 1, 10.0));
        let err = compute_indicators(&prices).unwrap_err();
        assert!(matches!(
            err,
            GymError::InsufficientData {
                bars: 199,
                minimum: 200
            }
        ));
    }
}

mod constant_market {
    use super::*;

    #[test]
    fn indicators_settle_on_the_constant_price() {
        let (_, indicators) = setup(constant_bars(260, 10.0));
        let row = indicators.row(START_DAY).unwrap();

        assert_relative_eq!(row[0], 10.0, epsilon = 1e-9);
        assert_relative_eq!(row[1], 10.0, epsilon = 1e-9);
        assert_relative_eq!(row[2], 10.0, epsilon = 1e-9);
        assert!(row[3].abs() < 1e-9);
        assert_eq!(row[4], 100.0);
    }

    #[test]
    fn half_balance_buy_takes_five_shares() {
        let (prices, indicators) = setup(constant_bars(260, 10.0));
        let mut env =
            StockEnvironment::new(&prices, &indicators, config(240, ActionModel::Full)).unwrap();
        env.reset().unwrap();

        let result = env.step(7).unwrap();

        assert_eq!(result.info.fill.side, Side::Buy);
        assert_eq!(result.info.fill.shares, 5);
        assert_eq!(result.info.balance, 50.0);
        assert_eq!(result.info.shares, 5);
        assert_eq!(result.reward, 0.0);
        assert_eq!(result.observation.balance, 50.0);
        assert_eq!(result.observation.shares, 5.0);
    }

    #[test]
    fn selling_with_no_shares_changes_nothing() {
        let (prices, indicators) = setup(wavy_bars(260, 40.0));
        let mut env =
            StockEnvironment::new(&prices, &indicators, config(240, ActionModel::Full)).unwrap();
        env.reset().unwrap();

        for action in 0..4 {
            let result = env.step(action).unwrap();
            assert_eq!(result.info.fill.shares, 0);
            assert_eq!(result.info.balance, INITIAL_BALANCE);
            assert_eq!(result.info.shares, 0);
            assert_eq!(result.reward, 0.0);
        }
    }
}

mod environment_contract {
    use super::*;

    #[test]
    fn reset_is_idempotent() {
        let (prices, indicators) = setup(wavy_bars(300, 30.0));
        let mut env =
            StockEnvironment::new(&prices, &indicators, config(280, ActionModel::Full)).unwrap();

        let first = env.reset().unwrap();
        env.step(7).unwrap();
        env.step(2).unwrap();
        let second = env.reset().unwrap();

        assert_eq!(first, second);
        assert_eq!(env.day(), START_DAY);
        assert_eq!(env.portfolio().balance, INITIAL_BALANCE);
        assert_eq!(env.portfolio().shares, 0);
        assert!(!env.is_terminal());
    }

    #[test]
    fn reset_observation_reads_start_day_indicators() {
        let (prices, indicators) = setup(wavy_bars(300, 30.0));
        let mut env =
            StockEnvironment::new(&prices, &indicators, config(280, ActionModel::Full)).unwrap();

        let obs = env.reset().unwrap().to_array();
        let row = indicators.row(START_DAY).unwrap();

        assert_eq!(obs[0], INITIAL_BALANCE);
        assert_eq!(obs[1], 0.0);
        assert_eq!(&obs[2..], &row[..]);
    }

    #[test]
    fn same_actions_give_same_trajectory() {
        let (prices, indicators) = setup(wavy_bars(300, 30.0));
        let actions = [8, 4, 1, 6, 0, 7, 3, 5, 2];

        let run = || {
            let mut env =
                StockEnvironment::new(&prices, &indicators, config(280, ActionModel::Capped))
                    .unwrap();
            env.reset().unwrap();
            actions
                .iter()
                .map(|&a| env.step(a).unwrap())
                .collect::<Vec<_>>()
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn stepping_on_stopping_day_is_terminal_and_sticky() {
        let (prices, indicators) = setup(wavy_bars(260, 30.0));
        let mut env =
            StockEnvironment::new(&prices, &indicators, config(205, ActionModel::Full)).unwrap();
        env.reset().unwrap();

        for _ in START_DAY..205 {
            assert!(!env.step(4).unwrap().done);
        }
        let last = env.step(4).unwrap();
        assert!(last.done);
        assert_eq!(last.info.day, 206);

        assert!(env.step(4).unwrap().done);
        env.reset().unwrap();
        assert!(!env.is_terminal());
    }

    #[test]
    fn invalid_action_leaves_state_unchanged() {
        let (prices, indicators) = setup(wavy_bars(260, 30.0));
        let mut env =
            StockEnvironment::new(&prices, &indicators, config(240, ActionModel::Full)).unwrap();
        env.reset().unwrap();
        env.step(7).unwrap();
        let before = env.portfolio().clone();

        let err = env.step(9).unwrap_err();

        assert!(matches!(err, GymError::InvalidAction { action: 9, arity: 9 }));
        assert_eq!(env.portfolio(), &before);
    }

    #[test]
    fn running_off_the_data_is_an_error() {
        let (prices, indicators) = setup(wavy_bars(220, 30.0));
        let mut env =
            StockEnvironment::new(&prices, &indicators, config(218, ActionModel::Full)).unwrap();
        env.reset().unwrap();

        for _ in START_DAY..=218 {
            env.step(4).unwrap();
        }
        let before = env.portfolio().clone();
        let err = env.step(4).unwrap_err();

        assert!(matches!(err, GymError::DayOutOfRange { day: 220, len: 220 }));
        assert_eq!(env.portfolio(), &before);
    }

    #[test]
    fn construction_checks_alignment_and_length() {
        let (prices, _) = setup(wavy_bars(260, 30.0));
        let (_, other) = setup(wavy_bars(250, 30.0));
        let err = StockEnvironment::new(&prices, &other, EnvConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            GymError::LengthMismatch {
                prices: 260,
                indicators: 250
            }
        ));

        let (prices, indicators) = setup(wavy_bars(260, 30.0));
        let err =
            StockEnvironment::new(&prices, &indicators, config(259, ActionModel::Full))
                .unwrap_err();
        assert!(matches!(
            err,
            GymError::InsufficientData {
                bars: 260,
                minimum: 261
            }
        ));
    }

    #[test]
    fn render_does_not_mutate() {
        let (prices, indicators) = setup(constant_bars(260, 10.0));
        let mut env =
            StockEnvironment::new(&prices, &indicators, config(240, ActionModel::Full)).unwrap();
        env.reset().unwrap();
        env.step(7).unwrap();

        let a = env.render().unwrap();
        let b = env.render().unwrap();

        assert_eq!(a, b);
        assert_eq!(a.day, 201);
        assert_eq!(a.shares, 5);
        assert_eq!(a.total_value, 100.0);
        assert!(a.to_string().starts_with("Day Number: 201"));
    }
}

mod portfolio_invariants {
    use super::*;

    #[test]
    fn balance_never_negative_and_rewards_sum_to_value_change() {
        let (prices, indicators) = setup(wavy_bars(400, 20.0));
        let mut env =
            StockEnvironment::new(&prices, &indicators, config(390, ActionModel::Full)).unwrap();
        env.reset().unwrap();
        let initial = env.render().unwrap().total_value;

        let script = [7, 7, 5, 0, 6, 7, 1, 2, 6, 3, 4];
        let mut total_reward = 0.0;
        let mut i = 0;
        loop {
            let result = env.step(script[i % script.len()]).unwrap();
            assert!(result.info.balance >= 0.0);
            total_reward += result.reward;
            i += 1;
            if result.done {
                break;
            }
        }

        let final_value = env.render().unwrap().total_value;
        assert_eq!(i, 191);
        assert_relative_eq!(total_reward, final_value - initial, epsilon = 1e-9);
    }

    #[test]
    fn capped_model_keeps_a_quarter_in_cash() {
        let (prices, indicators) = setup(constant_bars(260, 10.0));
        let mut env =
            StockEnvironment::new(&prices, &indicators, config(240, ActionModel::Capped)).unwrap();
        env.reset().unwrap();

        let result = env.step(8).unwrap();

        assert_eq!(result.info.fill.shares, 7);
        assert_eq!(result.info.balance, 30.0);
    }
}

mod episode_runner {
    use super::*;

    #[test]
    fn scripted_episode_matches_manual_stepping() {
        let (prices, indicators) = setup(wavy_bars(300, 25.0));
        let cfg = config(260, ActionModel::Full);

        let mut env = StockEnvironment::new(&prices, &indicators, cfg).unwrap();
        let mut policy = ScriptedPolicy::parse("7,4,0,6").unwrap();
        let summary = run_episode(&mut env, &mut policy, None).unwrap();

        let mut manual = StockEnvironment::new(&prices, &indicators, cfg).unwrap();
        manual.reset().unwrap();
        let mut total = 0.0;
        for (i, _) in (START_DAY..=260).enumerate() {
            total += manual.step([7, 4, 0, 6][i % 4]).unwrap().reward;
        }

        assert_eq!(summary.steps, 61);
        assert!(summary.terminal);
        assert_relative_eq!(summary.total_reward, total, epsilon = 1e-9);
        assert_eq!(summary.equity_curve.len(), summary.steps + 1);
        assert_eq!(
            summary.buy_steps + summary.sell_steps + summary.hold_steps,
            summary.steps
        );
    }

    #[test]
    fn max_steps_stops_early() {
        let (prices, indicators) = setup(wavy_bars(300, 25.0));
        let mut env =
            StockEnvironment::new(&prices, &indicators, config(280, ActionModel::Full)).unwrap();
        let mut policy = ConstantPolicy::new(4);

        let summary = run_episode(&mut env, &mut policy, Some(10)).unwrap();

        assert_eq!(summary.steps, 10);
        assert!(!summary.terminal);
        assert_eq!(env.day(), START_DAY + 10);
    }
}
