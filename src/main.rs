use anyhow::Context;
use serde_json::json;
use smartmoney::{
    AppError, BybitCandleSource, CandleSource, CandleSourceKind, Config, CsvCandleSource,
    MarketScanner, TimeMs,
};
use std::sync::Arc;

const USAGE: &str = "usage: smartmoney [scan | analyze <SYMBOL> [TIMEFRAME]]";

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries the JSON result
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&config, &args).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn build_source(config: &Config) -> Result<Arc<dyn CandleSource>, AppError> {
    match config.candle_source {
        CandleSourceKind::Bybit => Ok(Arc::new(BybitCandleSource::new(
            config.bybit_api_url.clone(),
            config.bybit_category.clone(),
        ))),
        CandleSourceKind::Csv => {
            let dir = config
                .candles_dir
                .clone()
                .ok_or_else(|| AppError::Config("CANDLES_DIR is not set".to_string()))?;
            Ok(Arc::new(CsvCandleSource::new(dir)))
        }
    }
}

async fn run(config: &Config, args: &[String]) -> anyhow::Result<()> {
    let scanner = MarketScanner::new(build_source(config)?, config.scan_params());

    let output = match args.first().map(|s| s.as_str()).unwrap_or("scan") {
        "scan" => {
            tracing::info!(
                "Scanning {} symbols on {:?}",
                config.symbols.len(),
                config.timeframes
            );
            let signals = scanner
                .scan(
                    &config.symbols,
                    &config.timeframes,
                    config.scan_candle_limit,
                    TimeMs::now(),
                )
                .await;
            json!({ "signals": signals })
        }
        "analyze" => {
            let symbol = args
                .get(1)
                .ok_or_else(|| AppError::BadRequest(USAGE.to_string()))?;
            let timeframe = args.get(2).map(|s| s.as_str()).unwrap_or("1h");
            let analysis = scanner
                .analyze(symbol, timeframe, config.analyze_candle_limit)
                .await
                .map_err(AppError::from)
                .with_context(|| format!("analyzing {} {}", symbol, timeframe))?;
            serde_json::to_value(&analysis)?
        }
        other => {
            return Err(AppError::BadRequest(format!("unknown command {}; {}", other, USAGE)).into())
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
