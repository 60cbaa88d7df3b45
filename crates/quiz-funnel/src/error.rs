use crate::config::ConfigError;
use crate::quiz::{FunnelServiceError, QuestionBankError};
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    QuestionBank(QuestionBankError),
    Funnel(FunnelServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::QuestionBank(err) => write!(f, "question bank error: {}", err),
            AppError::Funnel(err) => write!(f, "funnel error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::QuestionBank(err) => Some(err),
            AppError::Funnel(err) => Some(err),
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

impl From<QuestionBankError> for AppError {
    fn from(value: QuestionBankError) -> Self {
        Self::QuestionBank(value)
    }
}

impl From<FunnelServiceError> for AppError {
    fn from(value: FunnelServiceError) -> Self {
        Self::Funnel(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::SessionRepositoryError;
    use std::error::Error;

    #[test]
    fn funnel_failures_keep_their_source() {
        let err = AppError::from(FunnelServiceError::Repository(
            SessionRepositoryError::NotFound,
        ));

        assert_eq!(err.to_string(), "funnel error: session not found");
        assert!(err.source().is_some());
    }
}
