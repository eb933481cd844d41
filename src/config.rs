use crate::scanner::ScanParams;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_SYMBOLS: [&str; 8] = [
    "BTC/USDT",
    "ETH/USDT",
    "SOL/USDT",
    "BNB/USDT",
    "XRP/USDT",
    "ADA/USDT",
    "DOGE/USDT",
    "AVAX/USDT",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub candle_source: CandleSourceKind,
    pub bybit_api_url: String,
    pub bybit_category: String,
    pub candles_dir: Option<PathBuf>,
    pub symbols: Vec<String>,
    pub timeframes: Vec<String>,
    pub scan_candle_limit: usize,
    pub analyze_candle_limit: usize,
    pub signal_proximity: f64,
    pub signal_recent_bars: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandleSourceKind {
    Bybit,
    Csv,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let candle_source = match env_map
            .get("CANDLE_SOURCE")
            .map(|s| s.as_str())
            .unwrap_or("bybit")
        {
            "bybit" => CandleSourceKind::Bybit,
            "csv" => CandleSourceKind::Csv,
            other => {
                return Err(ConfigError::InvalidValue(
                    "CANDLE_SOURCE".to_string(),
                    format!("must be bybit or csv, got {}", other),
                ))
            }
        };

        let bybit_api_url = env_map
            .get("BYBIT_API_URL")
            .cloned()
            .unwrap_or_else(|| "https://api.bybit.com".to_string());

        let bybit_category = env_map
            .get("BYBIT_CATEGORY")
            .cloned()
            .unwrap_or_else(|| "spot".to_string());

        let candles_dir = env_map.get("CANDLES_DIR").map(PathBuf::from);
        if candle_source == CandleSourceKind::Csv && candles_dir.is_none() {
            return Err(ConfigError::MissingEnv("CANDLES_DIR".to_string()));
        }

        let symbols = match env_map.get("SCAN_SYMBOLS") {
            Some(list) => parse_list(list),
            None => DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
        };
        if symbols.is_empty() {
            return Err(ConfigError::InvalidValue(
                "SCAN_SYMBOLS".to_string(),
                "must name at least one symbol".to_string(),
            ));
        }

        let timeframes = parse_list(
            env_map
                .get("SCAN_TIMEFRAMES")
                .map(|s| s.as_str())
                .unwrap_or("4h,1h"),
        );
        if timeframes.is_empty() {
            return Err(ConfigError::InvalidValue(
                "SCAN_TIMEFRAMES".to_string(),
                "must name at least one timeframe".to_string(),
            ));
        }

        let scan_candle_limit = parse_usize(&env_map, "SCAN_CANDLE_LIMIT", 200)?;
        let analyze_candle_limit = parse_usize(&env_map, "ANALYZE_CANDLE_LIMIT", 500)?;
        let signal_recent_bars = parse_usize(&env_map, "SIGNAL_RECENT_BARS", 30)?;

        let signal_proximity = env_map
            .get("SIGNAL_PROXIMITY")
            .map(|s| s.as_str())
            .unwrap_or("0.03")
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p >= 0.0)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "SIGNAL_PROXIMITY".to_string(),
                    "must be a non-negative number".to_string(),
                )
            })?;

        Ok(Config {
            candle_source,
            bybit_api_url,
            bybit_category,
            candles_dir,
            symbols,
            timeframes,
            scan_candle_limit,
            analyze_candle_limit,
            signal_proximity,
            signal_recent_bars,
        })
    }

    /// Scanner parameters with the configured signal overrides.
    pub fn scan_params(&self) -> ScanParams {
        ScanParams {
            proximity: self.signal_proximity,
            recent_bars: self.signal_recent_bars,
            ..ScanParams::default()
        }
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_usize(
    env_map: &HashMap<String, String>,
    key: &str,
    default: usize,
) -> Result<usize, ConfigError> {
    match env_map.get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                ConfigError::InvalidValue(key.to_string(), "must be a positive integer".to_string())
            }),
    }
}
