pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod scanner;

pub use config::{CandleSourceKind, Config};
pub use datasource::{
    BybitCandleSource, CandleSource, CandleSourceError, CsvCandleSource, MockCandleSource,
};
pub use domain::{
    Candle, Direction, OrderBlock, Price, Signal, SignalSide, SignalStatus, SmcAnalysis,
    StructureBreak, StructureLevel, SwingPoint, TimeMs, Trend,
};
pub use engine::{analyze_smc, EngineParams, SmcEngine};
pub use error::AppError;
pub use orchestration::{MarketAnalysis, MarketScanner, ScanError};
pub use scanner::{scan_for_setup, ScanParams};
