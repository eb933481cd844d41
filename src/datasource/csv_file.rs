//! Offline candle source reading `{dir}/{SYMBOL}_{timeframe}.csv` files.

use super::{keep_last, validate_series, CandleSource, CandleSourceError};
use crate::domain::{Candle, TimeMs};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CsvCandleSource {
    dir: PathBuf,
}

impl CsvCandleSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `BTC/USDT` at `1h` lives in `BTCUSDT_1h.csv`.
    pub fn path_for(&self, symbol: &str, timeframe: &str) -> PathBuf {
        let stem = symbol.replace('/', "").to_uppercase();
        self.dir.join(format!("{}_{}.csv", stem, timeframe))
    }

    /// Parse CSV bytes with a `time,open,high,low,close[,volume]` header.
    pub fn parse_csv(bytes: &[u8]) -> Result<Vec<Candle>, CandleSourceError> {
        #[derive(Debug, serde::Deserialize)]
        struct Row {
            time: i64,
            open: f64,
            high: f64,
            low: f64,
            close: f64,
            #[serde(default)]
            volume: Option<f64>,
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let mut candles = Vec::new();
        for record in reader.deserialize::<Row>() {
            let row = record.map_err(|e| CandleSourceError::ParseError(e.to_string()))?;
            candles.push(Candle::new(
                TimeMs::new(row.time),
                row.open,
                row.high,
                row.low,
                row.close,
                row.volume.unwrap_or(0.0),
            ));
        }

        validate_series(&candles)?;
        Ok(candles)
    }
}

#[async_trait]
impl CandleSource for CsvCandleSource {
    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, CandleSourceError> {
        let path = self.path_for(symbol, timeframe);
        let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => CandleSourceError::NotFound(path.display().to_string()),
            _ => CandleSourceError::Other(format!("{}: {}", path.display(), e)),
        })?;

        let candles = Self::parse_csv(&bytes)?;
        debug!("Loaded {} candles from {}", candles.len(), path.display());
        Ok(keep_last(candles, limit))
    }
}
