pub mod market_scanner;

pub use market_scanner::{MarketAnalysis, MarketScanner, ScanError};
