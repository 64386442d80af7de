//! Domain error types.

/// Top-level error type for stockgym.
#[derive(Debug, thiserror::Error)]
pub enum GymError {
    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("invalid bar at day {index}: {reason}")]
    InvalidBar { index: usize, reason: String },

    #[error("insufficient data: have {bars} bars, need {minimum}")]
    InsufficientData { bars: usize, minimum: usize },

    #[error("indicator length {indicators} does not match price length {prices}")]
    LengthMismatch { prices: usize, indicators: usize },

    #[error("day {day} out of range for series of length {len}")]
    DayOutOfRange { day: usize, len: usize },

    #[error("invalid action {action}: expected 0..{arity}")]
    InvalidAction { action: usize, arity: usize },

    #[error(
        "negative balance not allowed: balance {balance}, fraction {fraction}, shares {shares}, price {price}"
    )]
    NegativeBalance {
        balance: f64,
        fraction: f64,
        shares: u64,
        price: f64,
    },

    #[error("unknown indicator: {0}")]
    UnknownIndicator(String),

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&GymError> for std::process::ExitCode {
    fn from(err: &GymError) -> Self {
        let code: u8 = match err {
            GymError::Io(_) => 1,
            GymError::ConfigParse { .. }
            | GymError::ConfigMissing { .. }
            | GymError::ConfigInvalid { .. } => 2,
            GymError::Data { .. } | GymError::InvalidBar { .. } => 3,
            GymError::LengthMismatch { .. }
            | GymError::DayOutOfRange { .. }
            | GymError::InvalidAction { .. }
            | GymError::UnknownIndicator(_) => 4,
            GymError::InsufficientData { .. } => 5,
            GymError::NegativeBalance { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
