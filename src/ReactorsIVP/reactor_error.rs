use crate::Kinetics::rate_law::KineticsError;
use thiserror::Error;

/// errors of the reactor integrator and its workflow
#[derive(Debug, Error)]
pub enum ReactorError {
    #[error(transparent)]
    Kinetics(#[from] KineticsError),
    #[error("Invalid domain: {0}")]
    InvalidDomain(String),
    #[error("Invalid initial state: {0}")]
    InvalidInitialState(String),
    #[error("Numeric instability: {0}")]
    NumericInstability(String),
    #[error("Division by zero: initial concentration of A is zero, conversion and yield are undefined")]
    DivideByZero,
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Missing data: {0}")]
    MissingData(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
