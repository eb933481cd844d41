//! Bybit public market-data client (v5 kline endpoint).

use super::{keep_last, validate_series, CandleSource, CandleSourceError};
use crate::domain::{Candle, TimeMs};
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Bybit caps kline requests at this many bars.
pub const MAX_KLINE_LIMIT: usize = 1000;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Candle source backed by Bybit's public REST API.
#[derive(Debug, Clone)]
pub struct BybitCandleSource {
    client: Client,
    base_url: String,
    category: String,
}

impl BybitCandleSource {
    pub fn new(base_url: String, category: String) -> Self {
        let client = match Client::builder().timeout(REQUEST_TIMEOUT).build() {
            Ok(client) => client,
            Err(e) => {
                warn!("Falling back to a client without request timeout: {}", e);
                Client::new()
            }
        };
        Self {
            client,
            base_url,
            category,
        }
    }

    async fn get_kline(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<serde_json::Value, CandleSourceError> {
        let url = format!("{}/v5/market/kline", self.base_url);
        let limit = limit.to_string();
        let query = [
            ("category", self.category.as_str()),
            ("symbol", symbol),
            ("interval", interval),
            ("limit", limit.as_str()),
        ];
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(30)),
            ..Default::default()
        };

        retry(backoff, || async {
            let response = self
                .client
                .get(&url)
                .query(&query)
                .send()
                .await
                .map_err(|e| {
                    backoff::Error::transient(CandleSourceError::NetworkError(e.to_string()))
                })?;

            let status = response.status();
            if status == 429 {
                warn!("Bybit rate limit hit for {}", symbol);
                return Err(backoff::Error::transient(CandleSourceError::RateLimited));
            }
            if status.is_server_error() {
                return Err(backoff::Error::transient(CandleSourceError::HttpError {
                    status: status.as_u16(),
                    message: "Server error".to_string(),
                }));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(CandleSourceError::HttpError {
                    status: status.as_u16(),
                    message: "Client error".to_string(),
                }));
            }

            response
                .json::<serde_json::Value>()
                .await
                .map_err(|e| backoff::Error::permanent(CandleSourceError::ParseError(e.to_string())))
        })
        .await
    }
}

#[async_trait]
impl CandleSource for BybitCandleSource {
    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, CandleSourceError> {
        let interval = bybit_interval(timeframe).ok_or_else(|| {
            CandleSourceError::Other(format!("unsupported timeframe {}", timeframe))
        })?;
        let market = bybit_symbol(symbol);
        debug!("Fetching {} {} (limit {})", market, interval, limit);

        let body = self
            .get_kline(&market, interval, limit.min(MAX_KLINE_LIMIT))
            .await?;
        let candles = parse_kline_response(&body)?;
        debug!("Fetched {} candles for {} {}", candles.len(), symbol, timeframe);
        Ok(keep_last(candles, limit))
    }
}

/// `BTC/USDT` -> `BTCUSDT`.
pub fn bybit_symbol(symbol: &str) -> String {
    symbol.replace('/', "").to_uppercase()
}

/// Map a ccxt-style timeframe to Bybit's interval code.
pub fn bybit_interval(timeframe: &str) -> Option<&'static str> {
    let code = match timeframe {
        "1m" => "1",
        "3m" => "3",
        "5m" => "5",
        "15m" => "15",
        "30m" => "30",
        "1h" => "60",
        "2h" => "120",
        "4h" => "240",
        "6h" => "360",
        "12h" => "720",
        "1d" => "D",
        "1w" => "W",
        "1M" => "M",
        _ => return None,
    };
    Some(code)
}

/// Parse a v5 kline payload into ascending candles.
///
/// Rows arrive newest first as string arrays:
/// `[startTime, open, high, low, close, volume, turnover]`.
pub fn parse_kline_response(body: &serde_json::Value) -> Result<Vec<Candle>, CandleSourceError> {
    let ret_code = body.get("retCode").and_then(|v| v.as_i64()).unwrap_or(-1);
    if ret_code != 0 {
        let message = body
            .get("retMsg")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown error")
            .to_string();
        return Err(CandleSourceError::HttpError {
            status: 200,
            message: format!("retCode {}: {}", ret_code, message),
        });
    }

    let rows = body
        .pointer("/result/list")
        .and_then(|v| v.as_array())
        .ok_or_else(|| CandleSourceError::ParseError("missing result.list".to_string()))?;

    let mut candles = rows
        .iter()
        .map(parse_kline_row)
        .collect::<Result<Vec<_>, _>>()?;
    candles.sort_by_key(|c| c.time);
    validate_series(&candles)?;
    Ok(candles)
}

fn parse_kline_row(row: &serde_json::Value) -> Result<Candle, CandleSourceError> {
    let fields = row
        .as_array()
        .filter(|f| f.len() >= 6)
        .ok_or_else(|| CandleSourceError::ParseError(format!("malformed kline row: {}", row)))?;

    let field = |i: usize| -> Result<&str, CandleSourceError> {
        fields[i]
            .as_str()
            .ok_or_else(|| CandleSourceError::ParseError(format!("kline field {} is not a string", i)))
    };
    let num = |i: usize| -> Result<f64, CandleSourceError> {
        field(i)?
            .parse::<f64>()
            .map_err(|e| CandleSourceError::ParseError(format!("kline field {}: {}", i, e)))
    };
    let time = field(0)?
        .parse::<i64>()
        .map_err(|e| CandleSourceError::ParseError(format!("kline start time: {}", e)))?;

    Ok(Candle::new(
        TimeMs::new(time),
        num(1)?,
        num(2)?,
        num(3)?,
        num(4)?,
        num(5)?,
    ))
}
