//! Domain types for the SMC engine and the signal scanner.
//!
//! This module provides:
//! - Primitives: TimeMs, Direction, Trend, StructureLevel, SwingKind
//! - The OHLCV Candle input type
//! - Analysis entities (swings, structure breaks, order blocks, gaps, zones)
//! - Signal and the cent-rounded Price used on it

pub mod analysis;
pub mod candle;
pub mod price;
pub mod primitives;
pub mod signal;

pub use analysis::{
    BreakKind, EqualKind, EqualLevel, FairValueGap, OrderBlock, PremiumDiscountZone, PriceBand,
    SmcAnalysis, StructureBreak, SwingPoint,
};
pub use candle::Candle;
pub use price::Price;
pub use primitives::{Direction, StructureLevel, SwingKind, TimeMs, Trend};
pub use signal::{Signal, SignalSide, SignalStatus};
