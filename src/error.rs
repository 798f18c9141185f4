use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::collections::escalation::DecisionError;
use crate::workflows::collections::interest::InterestError;
use crate::workflows::collections::rates::RateTableError;
use crate::workflows::collections::scheduler::ProcessorError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Fixture(serde_json::Error),
    Rates(RateTableError),
    Interest(InterestError),
    Decision(DecisionError),
    Processor(ProcessorError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Fixture(err) => write!(f, "fixture error: {}", err),
            AppError::Rates(err) => write!(f, "base rate table error: {}", err),
            AppError::Interest(err) => write!(f, "interest calculation error: {}", err),
            AppError::Decision(err) => write!(f, "escalation decision error: {}", err),
            AppError::Processor(err) => write!(f, "collections run error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Fixture(err) => Some(err),
            AppError::Rates(err) => Some(err),
            AppError::Interest(err) => Some(err),
            AppError::Decision(err) => Some(err),
            AppError::Processor(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Fixture(value)
    }
}

impl From<RateTableError> for AppError {
    fn from(value: RateTableError) -> Self {
        Self::Rates(value)
    }
}

impl From<InterestError> for AppError {
    fn from(value: InterestError) -> Self {
        Self::Interest(value)
    }
}

impl From<DecisionError> for AppError {
    fn from(value: DecisionError) -> Self {
        Self::Decision(value)
    }
}

impl From<ProcessorError> for AppError {
    fn from(value: ProcessorError) -> Self {
        Self::Processor(value)
    }
}
