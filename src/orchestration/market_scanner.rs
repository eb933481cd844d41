use crate::datasource::{CandleSource, CandleSourceError};
use crate::domain::{Candle, Signal, SmcAnalysis, TimeMs};
use crate::engine::SmcEngine;
use crate::scanner::{scan_for_setup, ScanParams};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Candles plus their full analysis, as returned by `analyze`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysis {
    pub candles: Vec<Candle>,
    pub smc_analysis: SmcAnalysis,
}

#[derive(Clone)]
pub struct MarketScanner {
    source: Arc<dyn CandleSource>,
    params: ScanParams,
}

impl MarketScanner {
    pub fn new(source: Arc<dyn CandleSource>, params: ScanParams) -> Self {
        Self { source, params }
    }

    /// Scan every symbol/timeframe pair concurrently.
    ///
    /// Failed fetches are logged and skipped. Signals come back in
    /// symbol-major order without their embedded analysis, tagged
    /// `"<symbol> (<timeframe>)"`.
    pub async fn scan(
        &self,
        symbols: &[String],
        timeframes: &[String],
        limit: usize,
        now: TimeMs,
    ) -> Vec<Signal> {
        let jobs = symbols.iter().flat_map(|symbol| {
            timeframes
                .iter()
                .map(move |timeframe| self.scan_pair(symbol, timeframe, limit, now))
        });

        let signals: Vec<Signal> = join_all(jobs).await.into_iter().flatten().collect();
        info!(
            "Scan finished: {} signals across {} symbols x {} timeframes",
            signals.len(),
            symbols.len(),
            timeframes.len()
        );
        signals
    }

    async fn scan_pair(
        &self,
        symbol: &str,
        timeframe: &str,
        limit: usize,
        now: TimeMs,
    ) -> Option<Signal> {
        let candles = match self.source.fetch_candles(symbol, timeframe, limit).await {
            Ok(candles) => candles,
            Err(e) => {
                warn!("Skipping {} {}: {}", symbol, timeframe, e);
                return None;
            }
        };

        let tagged = format!("{} ({})", symbol, timeframe);
        scan_for_setup(&tagged, &candles, &self.params, now).map(Signal::without_analysis)
    }

    /// Fetch one series and return it with its full analysis.
    ///
    /// An empty series yields an empty, neutral analysis.
    pub async fn analyze(
        &self,
        symbol: &str,
        timeframe: &str,
        limit: usize,
    ) -> Result<MarketAnalysis, ScanError> {
        let candles = self.source.fetch_candles(symbol, timeframe, limit).await?;
        let smc_analysis = SmcEngine::new(self.params.engine).analyze(&candles);
        Ok(MarketAnalysis {
            candles,
            smc_analysis,
        })
    }
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Source(#[from] CandleSourceError),
}
