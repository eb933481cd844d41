use crate::config::ConfigError;
use crate::datasource::CandleSourceError;
use crate::orchestration::ScanError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Data source error: {0}")]
    Source(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<CandleSourceError> for AppError {
    fn from(err: CandleSourceError) -> Self {
        match err {
            CandleSourceError::NotFound(what) => AppError::NotFound(what),
            other => AppError::Source(other.to_string()),
        }
    }
}

impl From<ScanError> for AppError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::Source(e) => e.into(),
        }
    }
}
