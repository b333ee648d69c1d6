use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Unrecognized regime '{name}'")]
    InvalidRegime { name: String },

    #[error("Invalid parameter '{field}' for regime '{regime}': {reason}")]
    InvalidRegimeParameter {
        regime: String,
        field: &'static str,
        reason: String,
    },

    #[error("Window of {days} days is outside 1..={max}")]
    InvalidWindow { days: u32, max: u32 },

    #[error("Unrecognized group key '{name}'")]
    InvalidGroupKey { name: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;
