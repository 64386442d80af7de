//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::scripted_policy::{ConstantPolicy, ScriptedPolicy};
use crate::domain::action::ActionModel;
use crate::domain::config_validation::{
    validate_data_config, validate_environment_config, validate_episode_config,
};
use crate::domain::environment::{EnvConfig, StockEnvironment, DEFAULT_STOPPING_DAY};
use crate::domain::episode::{run_episode, EpisodeSummary};
use crate::domain::error::GymError;
use crate::domain::indicator::IndicatorSet;
use crate::domain::indicator_helpers::compute_indicators;
use crate::domain::ohlcv::PriceSeries;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::policy_port::Policy;

#[derive(Parser, Debug)]
#[command(name = "stockgym", about = "Single-asset trading environment for RL experiments")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the indicator set and write it as CSV
    Indicators {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run one episode with a scripted policy
    Run {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        /// Comma-separated action ids, cycled until the episode ends
        #[arg(long)]
        actions: Option<String>,
        #[arg(long)]
        render: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data range for a symbol, or list symbols
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Indicators {
            config,
            symbol,
            output,
        } => run_indicators(&config, symbol.as_deref(), output.as_deref()),
        Command::Run {
            config,
            symbol,
            actions,
            render,
        } => run_simulation(&config, symbol.as_deref(), actions.as_deref(), render),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, GymError> {
    eprintln!("Loading config from {}", path.display());
    let adapter = FileConfigAdapter::from_file(path)?;
    validate_data_config(&adapter)?;
    Ok(adapter)
}

pub fn build_env_config(config: &dyn ConfigPort) -> Result<EnvConfig, GymError> {
    validate_environment_config(config)?;

    let stopping_day = config.get_int("environment", "stopping_day", DEFAULT_STOPPING_DAY as i64);
    let model = match config.get_string("environment", "model") {
        Some(s) => s.parse::<ActionModel>().map_err(|e| GymError::ConfigInvalid {
            section: "environment".into(),
            key: "model".into(),
            reason: e.to_string(),
        })?,
        None => ActionModel::default(),
    };

    Ok(EnvConfig {
        stopping_day: stopping_day as usize,
        model,
    })
}

/// CLI override first, then `[data] symbol`.
pub fn resolve_symbol(
    symbol_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<String, GymError> {
    symbol_override
        .map(str::to_string)
        .or_else(|| config.get_string("data", "symbol"))
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| GymError::ConfigMissing {
            section: "data".into(),
            key: "symbol".into(),
        })
}

/// Scripted policy from the CLI override or `[episode] actions`; holds when neither is set.
pub fn build_policy(
    actions_override: Option<&str>,
    config: &dyn ConfigPort,
    model: ActionModel,
) -> Result<Box<dyn Policy>, GymError> {
    let script = match actions_override {
        Some(s) => s.to_string(),
        None => config.get_list("episode", "actions").join(","),
    };
    if script.trim().is_empty() {
        return Ok(Box::new(ConstantPolicy::new(model.hold())));
    }
    Ok(Box::new(ScriptedPolicy::parse(&script)?))
}

pub fn max_steps(config: &dyn ConfigPort) -> Option<usize> {
    match config.get_int("episode", "max_steps", 0) {
        n if n > 0 => Some(n as usize),
        _ => None,
    }
}

fn data_port(config: &dyn ConfigPort) -> Result<CsvAdapter, GymError> {
    let dir = config
        .get_string("data", "dir")
        .ok_or_else(|| GymError::ConfigMissing {
            section: "data".into(),
            key: "dir".into(),
        })?;
    Ok(CsvAdapter::new(PathBuf::from(dir)))
}

/// Write one row per day: `day,date,close` followed by the six indicators.
pub fn write_indicators_csv<W: Write>(
    prices: &PriceSeries,
    indicators: &IndicatorSet,
    writer: W,
) -> Result<(), GymError> {
    let csv_err = |e: csv::Error| GymError::Data {
        reason: format!("CSV write error: {}", e),
    };
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["day".to_string(), "date".to_string(), "close".to_string()];
    header.extend(indicators.iter().map(|(name, _)| name.to_string()));
    wtr.write_record(&header).map_err(csv_err)?;

    for (day, bar) in prices.bars().iter().enumerate() {
        let mut record = vec![day.to_string(), bar.date.to_string(), bar.close.to_string()];
        record.extend(indicators.row(day)?.iter().map(|v| v.to_string()));
        wtr.write_record(&record).map_err(csv_err)?;
    }

    wtr.flush()?;
    Ok(())
}

fn load_prices(config: &dyn ConfigPort, symbol: &str) -> Result<PriceSeries, GymError> {
    let port = data_port(config)?;
    let prices = port.fetch_prices(symbol)?;
    eprintln!("Loaded {} bars for {}", prices.len(), symbol);
    Ok(prices)
}

fn run_indicators(
    config_path: &Path,
    symbol: Option<&str>,
    output: Option<&Path>,
) -> Result<(), GymError> {
    let config = load_config(config_path)?;
    let symbol = resolve_symbol(symbol, &config)?;
    let prices = load_prices(&config, &symbol)?;
    let indicators = compute_indicators(&prices)?;

    match output {
        Some(path) => {
            write_indicators_csv(&prices, &indicators, File::create(path)?)?;
            eprintln!("Indicators written to: {}", path.display());
        }
        None => write_indicators_csv(&prices, &indicators, io::stdout().lock())?,
    }
    Ok(())
}

fn run_simulation(
    config_path: &Path,
    symbol: Option<&str>,
    actions: Option<&str>,
    render: bool,
) -> Result<(), GymError> {
    let config = load_config(config_path)?;
    validate_episode_config(&config)?;
    let env_config = build_env_config(&config)?;
    let symbol = resolve_symbol(symbol, &config)?;
    let mut policy = build_policy(actions, &config, env_config.model)?;

    let prices = load_prices(&config, &symbol)?;
    let indicators = compute_indicators(&prices)?;
    let mut env = StockEnvironment::new(&prices, &indicators, env_config)?;

    eprintln!(
        "Running episode: {} model, stopping day {}, policy {}",
        env_config.model,
        env_config.stopping_day,
        policy.name()
    );

    let summary = run_episode(&mut env, policy.as_mut(), max_steps(&config))?;
    if render {
        eprintln!("\n{}", env.render()?);
    }
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &EpisodeSummary) {
    let m = &summary.metrics;
    eprintln!("\n=== Episode Results ===");
    eprintln!("Policy:           {}", summary.policy);
    eprintln!("Steps:            {}", summary.steps);
    eprintln!("Terminal:         {}", summary.terminal);
    eprintln!("Initial Value:    {:.2}", summary.initial_value);
    eprintln!("Final Value:      {:.2}", summary.final_value);
    eprintln!("Total Reward:     {:.2}", summary.total_reward);
    eprintln!("Total Return:     {:.2}%", m.total_return * 100.0);
    eprintln!("Annualized:       {:.2}%", m.annualized_return * 100.0);
    eprintln!("Sharpe Ratio:     {:.2}", m.sharpe_ratio);
    eprintln!("Max Drawdown:     -{:.1}%", m.max_drawdown * 100.0);
    eprintln!(
        "Trades:           {} buys, {} sells, {} holds",
        summary.buy_steps, summary.sell_steps, summary.hold_steps
    );
}

fn run_validate(config_path: &Path) -> Result<(), GymError> {
    let config = load_config(config_path)?;
    let env_config = build_env_config(&config)?;
    validate_episode_config(&config)?;

    eprintln!("\nEnvironment:");
    eprintln!("  model:        {}", env_config.model);
    eprintln!("  stopping_day: {}", env_config.stopping_day);
    eprintln!("  bars needed:  {}", env_config.required_bars());

    let policy = build_policy(None, &config, env_config.model)?;
    eprintln!("\nPolicy: {}", policy.name());
    eprintln!("\nConfiguration is valid.");
    Ok(())
}

fn run_info(config_path: &Path, symbol: Option<&str>) -> Result<(), GymError> {
    let config = load_config(config_path)?;
    let port = data_port(&config)?;

    let symbols = match resolve_symbol(symbol, &config) {
        Ok(s) => vec![s],
        Err(_) => port.list_symbols()?,
    };

    if symbols.is_empty() {
        eprintln!("No symbols found");
    }
    for s in &symbols {
        match port.get_data_range(s) {
            Ok(Some((first, last, count))) => {
                println!("{}: {} bars, {} to {}", s, count, first, last);
            }
            Ok(None) => eprintln!("{}: no data found", s),
            Err(e) => eprintln!("error querying {}: {}", s, e),
        }
    }
    Ok(())
}
