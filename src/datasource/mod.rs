//! Candle source abstraction for fetching OHLCV series from exchanges or files.

use crate::domain::Candle;
use async_trait::async_trait;
use std::fmt;

pub mod bybit;
pub mod csv_file;
pub mod mock;

pub use csv_file::CsvCandleSource;
pub use bybit::BybitCandleSource;
pub use mock::MockCandleSource;

/// Source of candle series keyed by symbol and timeframe.
///
/// Implementations return candles in strictly increasing time order.
#[async_trait]
pub trait CandleSource: Send + Sync + fmt::Debug {
    /// Fetch the most recent candles.
    ///
    /// # Arguments
    /// * `symbol` - Pair in `BASE/QUOTE` form (e.g., "BTC/USDT")
    /// * `timeframe` - Bar width (e.g., "1h", "4h")
    /// * `limit` - Maximum number of bars, newest kept
    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, CandleSourceError>;
}

/// Error type for candle source operations.
#[derive(Debug, Clone, PartialEq)]
pub enum CandleSourceError {
    /// Network error (e.g., connection timeout, DNS failure)
    NetworkError(String),
    /// HTTP or exchange-level error
    HttpError { status: u16, message: String },
    /// Malformed payload or file
    ParseError(String),
    /// Rate limit exceeded
    RateLimited,
    /// No data for the symbol/timeframe
    NotFound(String),
    /// Other error
    Other(String),
}

impl fmt::Display for CandleSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandleSourceError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            CandleSourceError::HttpError { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            CandleSourceError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            CandleSourceError::RateLimited => write!(f, "Rate limited"),
            CandleSourceError::NotFound(what) => write!(f, "Not found: {}", what),
            CandleSourceError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for CandleSourceError {}

/// Check that candle times strictly increase.
pub fn validate_series(candles: &[Candle]) -> Result<(), CandleSourceError> {
    for (i, pair) in candles.windows(2).enumerate() {
        if pair[1].time <= pair[0].time {
            return Err(CandleSourceError::ParseError(format!(
                "candle {} at {} does not follow {}",
                i + 1,
                pair[1].time,
                pair[0].time
            )));
        }
    }
    Ok(())
}

/// Keep the newest `limit` candles.
pub(crate) fn keep_last(mut candles: Vec<Candle>, limit: usize) -> Vec<Candle> {
    if candles.len() > limit {
        candles.drain(..candles.len() - limit);
    }
    candles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimeMs;

    fn at(ms: i64) -> Candle {
        Candle::new(TimeMs::new(ms), 1.0, 1.0, 1.0, 1.0, 0.0)
    }

    #[test]
    fn test_candle_source_error_display() {
        let err = CandleSourceError::NetworkError("connection timeout".to_string());
        assert_eq!(err.to_string(), "Network error: connection timeout");

        let err = CandleSourceError::HttpError {
            status: 429,
            message: "Too many requests".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error 429: Too many requests");

        let err = CandleSourceError::NotFound("BTC/USDT 1h".to_string());
        assert_eq!(err.to_string(), "Not found: BTC/USDT 1h");

        assert_eq!(CandleSourceError::RateLimited.to_string(), "Rate limited");
    }

    #[test]
    fn test_validate_series() {
        assert!(validate_series(&[]).is_ok());
        assert!(validate_series(&[at(1), at(2), at(3)]).is_ok());
        assert!(matches!(
            validate_series(&[at(1), at(3), at(3)]),
            Err(CandleSourceError::ParseError(_))
        ));
    }

    #[test]
    fn test_keep_last() {
        let kept = keep_last(vec![at(1), at(2), at(3)], 2);
        assert_eq!(kept, vec![at(2), at(3)]);
        assert_eq!(keep_last(vec![at(1)], 5).len(), 1);
    }
}
