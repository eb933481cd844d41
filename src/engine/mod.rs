//! Pure, deterministic Smart Money Concepts engine.
//!
//! Every detector is a function over an immutable candle slice. Per-call
//! state (pivot tracking, running averages) is local to the call, so the
//! engine can be invoked concurrently without coordination.

pub mod atr;
pub mod equal_levels;
pub mod fvg;
pub mod legs;
pub mod order_blocks;
pub mod premium_discount;
pub mod smc;
pub mod structure;
pub mod swings;

pub use atr::{true_range, AtrSeries, DEFAULT_ATR_PERIOD};
pub use equal_levels::{detect_equal_levels, DEFAULT_EQUAL_THRESHOLD};
pub use fvg::{build_fair_value_gaps, detect_fair_value_gaps, mitigate_fair_value_gaps};
pub use legs::{compute_legs, Leg};
pub use order_blocks::{build_order_blocks, detect_order_blocks, mitigate_order_blocks};
pub use premium_discount::premium_discount_zone;
pub use smc::{analyze_level, analyze_smc, trend_of, LevelStructure, SmcEngine};
pub use structure::{detect_structure_breaks, PivotRecord, StructureTracker};
pub use swings::detect_swing_points;

/// Tunables for one analysis run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineParams {
    /// Lookback of the internal (fine) level.
    pub internal_size: usize,
    /// Upper bound on the swing (coarse) lookback.
    pub swing_size_cap: usize,
    /// Swing lookback is `len / swing_size_divisor` when below the cap.
    pub swing_size_divisor: usize,
    pub atr_period: usize,
    /// Per-level cap applied separately to active and mitigated blocks.
    pub max_order_blocks: usize,
    pub equal_level_threshold: f64,
    pub fvg_auto_threshold: bool,
    /// Shorter series yield an empty analysis.
    pub min_candles: usize,
}

impl EngineParams {
    /// Coarse lookback for a series of `len` candles.
    pub fn swing_size(&self, len: usize) -> usize {
        self.swing_size_cap.min(len / self.swing_size_divisor.max(1))
    }
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            internal_size: 5,
            swing_size_cap: 50,
            swing_size_divisor: 5,
            atr_period: DEFAULT_ATR_PERIOD,
            max_order_blocks: 5,
            equal_level_threshold: DEFAULT_EQUAL_THRESHOLD,
            fvg_auto_threshold: true,
            min_candles: 20,
        }
    }
}
