//! Configuration validation.
//!
//! Validates all config fields before an environment is built.

use crate::domain::action::{ActionModel, ACTION_COUNT};
use crate::domain::error::GymError;
use crate::domain::portfolio::START_DAY;
use crate::ports::config_port::ConfigPort;

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), GymError> {
    match config.get_string("data", "dir") {
        Some(s) if !s.trim().is_empty() => {}
        _ => {
            return Err(GymError::ConfigMissing {
                section: "data".to_string(),
                key: "dir".to_string(),
            });
        }
    }
    let symbol = config.get_string("data", "symbol");
    if symbol.is_some_and(|s| s.trim().is_empty()) {
        return Err(GymError::ConfigInvalid {
            section: "data".to_string(),
            key: "symbol".to_string(),
            reason: "symbol must not be empty".to_string(),
        });
    }
    Ok(())
}

pub fn validate_environment_config(config: &dyn ConfigPort) -> Result<(), GymError> {
    validate_stopping_day(config)?;
    validate_model(config)?;
    Ok(())
}

pub fn validate_episode_config(config: &dyn ConfigPort) -> Result<(), GymError> {
    validate_actions(config)?;
    validate_max_steps(config)?;
    Ok(())
}

fn validate_stopping_day(config: &dyn ConfigPort) -> Result<(), GymError> {
    let Some(raw) = config.get_string("environment", "stopping_day") else {
        return Ok(());
    };
    let reason = match raw.trim().parse::<usize>() {
        Ok(day) if day >= START_DAY => return Ok(()),
        Ok(_) => format!("stopping_day must be at least {}", START_DAY),
        Err(_) => format!("'{}' is not a day index", raw.trim()),
    };
    Err(GymError::ConfigInvalid {
        section: "environment".to_string(),
        key: "stopping_day".to_string(),
        reason,
    })
}

fn validate_model(config: &dyn ConfigPort) -> Result<(), GymError> {
    match config.get_string("environment", "model") {
        None => Ok(()),
        Some(s) => s
            .parse::<ActionModel>()
            .map(|_| ())
            .map_err(|e| GymError::ConfigInvalid {
                section: "environment".to_string(),
                key: "model".to_string(),
                reason: e.to_string(),
            }),
    }
}

fn validate_actions(config: &dyn ConfigPort) -> Result<(), GymError> {
    for token in config.get_list("episode", "actions") {
        match token.parse::<usize>() {
            Ok(action) if action < ACTION_COUNT => {}
            _ => {
                return Err(GymError::ConfigInvalid {
                    section: "episode".to_string(),
                    key: "actions".to_string(),
                    reason: format!("'{}' is not an action id in 0..{}", token, ACTION_COUNT),
                });
            }
        }
    }
    Ok(())
}

fn validate_max_steps(config: &dyn ConfigPort) -> Result<(), GymError> {
    if config.get_string("episode", "max_steps").is_none() {
        return Ok(());
    }
    if config.get_int("episode", "max_steps", 0) <= 0 {
        return Err(GymError::ConfigInvalid {
            section: "episode".to_string(),
            key: "max_steps".to_string(),
            reason: "max_steps must be a positive integer".to_string(),
        });
    }
    Ok(())
}
