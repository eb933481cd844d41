use smartmoney::{
    CandleSource, CandleSourceError, CsvCandleSource, MarketScanner, ScanParams, TimeMs,
};
use std::fmt::Write as _;
use std::sync::Arc;
use tempfile::TempDir;

fn write_series(dir: &TempDir, file: &str, rows: usize) {
    let mut body = String::from("time,open,high,low,close,volume\n");
    for i in 0..rows {
        let base = 100.0 + (i % 17) as f64 - (i % 5) as f64 * 0.7;
        writeln!(
            body,
            "{},{},{},{},{},{}",
            1_700_000_000_000i64 + i as i64 * 3_600_000,
            base,
            base + 1.5,
            base - 1.5,
            base + 0.4,
            5.0
        )
        .unwrap();
    }
    std::fs::write(dir.path().join(file), body).unwrap();
}

#[tokio::test]
async fn test_reads_symbol_timeframe_file() {
    let dir = TempDir::new().unwrap();
    write_series(&dir, "BTCUSDT_1h.csv", 40);
    let source = CsvCandleSource::new(dir.path());

    let candles = source.fetch_candles("BTC/USDT", "1h", 25).await.unwrap();
    assert_eq!(candles.len(), 25);
    assert_eq!(
        candles[0].time,
        TimeMs::new(1_700_000_000_000 + 15 * 3_600_000)
    );
    assert!(candles.windows(2).all(|w| w[0].time < w[1].time));
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let source = CsvCandleSource::new(dir.path());

    let err = source.fetch_candles("ETH/USDT", "4h", 10).await.unwrap_err();
    assert!(matches!(err, CandleSourceError::NotFound(_)));
}

#[tokio::test]
async fn test_unordered_file_is_parse_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("SOLUSDT_1h.csv"),
        "time,open,high,low,close,volume\n2000,1,2,0.5,1.5,1\n1000,1,2,0.5,1.5,1\n",
    )
    .unwrap();
    let source = CsvCandleSource::new(dir.path());

    let err = source.fetch_candles("SOL/USDT", "1h", 10).await.unwrap_err();
    assert!(matches!(err, CandleSourceError::ParseError(_)));
}

#[tokio::test]
async fn test_analyze_from_csv() {
    let dir = TempDir::new().unwrap();
    write_series(&dir, "BTCUSDT_4h.csv", 120);
    let scanner = MarketScanner::new(
        Arc::new(CsvCandleSource::new(dir.path())),
        ScanParams::default(),
    );

    let result = scanner.analyze("BTC/USDT", "4h", 500).await.unwrap();
    assert_eq!(result.candles.len(), 120);
    assert!(!result.smc_analysis.swing_points.is_empty());
}
