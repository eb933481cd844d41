//! Mock candle source for testing without network calls.

use super::{keep_last, CandleSource, CandleSourceError};
use crate::domain::Candle;
use async_trait::async_trait;
use std::collections::HashMap;

/// Returns predefined series keyed by `(symbol, timeframe)`.
#[derive(Debug, Clone, Default)]
pub struct MockCandleSource {
    series: HashMap<(String, String), Vec<Candle>>,
    failures: HashMap<(String, String), CandleSourceError>,
}

impl MockCandleSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `candles` for the pair.
    pub fn with_series(mut self, symbol: &str, timeframe: &str, candles: Vec<Candle>) -> Self {
        self.series
            .insert((symbol.to_string(), timeframe.to_string()), candles);
        self
    }

    /// Fail every fetch of the pair with `error`.
    pub fn with_failure(mut self, symbol: &str, timeframe: &str, error: CandleSourceError) -> Self {
        self.failures
            .insert((symbol.to_string(), timeframe.to_string()), error);
        self
    }
}

#[async_trait]
impl CandleSource for MockCandleSource {
    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, CandleSourceError> {
        let key = (symbol.to_string(), timeframe.to_string());
        if let Some(err) = self.failures.get(&key) {
            return Err(err.clone());
        }
        self.series
            .get(&key)
            .map(|candles| keep_last(candles.clone(), limit))
            .ok_or_else(|| CandleSourceError::NotFound(format!("{} {}", symbol, timeframe)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimeMs;

    fn series(n: i64) -> Vec<Candle> {
        (0..n)
            .map(|i| Candle::new(TimeMs::new(i * 1000), 1.0, 2.0, 0.5, 1.5, 1.0))
            .collect()
    }

    #[tokio::test]
    async fn test_mock_returns_newest_within_limit() {
        let source = MockCandleSource::new().with_series("BTC/USDT", "1h", series(10));

        let candles = source.fetch_candles("BTC/USDT", "1h", 3).await.unwrap();
        assert_eq!(candles.len(), 3);
        assert_eq!(candles[0].time, TimeMs::new(7000));
    }

    #[tokio::test]
    async fn test_mock_unknown_pair_not_found() {
        let source = MockCandleSource::new().with_series("BTC/USDT", "1h", series(10));

        let err = source.fetch_candles("BTC/USDT", "4h", 3).await.unwrap_err();
        assert!(matches!(err, CandleSourceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let source = MockCandleSource::new().with_failure("ETH/USDT", "1h", CandleSourceError::RateLimited);

        let err = source.fetch_candles("ETH/USDT", "1h", 3).await.unwrap_err();
        assert_eq!(err, CandleSourceError::RateLimited);
    }
}
