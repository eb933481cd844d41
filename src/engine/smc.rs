//! Two-level SMC analysis: the engine's only entry point.

use super::atr::AtrSeries;
use super::equal_levels::detect_equal_levels;
use super::fvg::detect_fair_value_gaps;
use super::legs::compute_legs;
use super::order_blocks::detect_order_blocks;
use super::premium_discount::premium_discount_zone;
use super::structure::breaks_from_legs;
use super::swings::swings_from_legs;
use super::EngineParams;
use crate::domain::{Candle, SmcAnalysis, StructureBreak, StructureLevel, SwingPoint, Trend};

/// Swings and breaks found at one lookback.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LevelStructure {
    pub swings: Vec<SwingPoint>,
    pub breaks: Vec<StructureBreak>,
}

/// Legs are computed once and shared by the swing and break scans.
pub fn analyze_level(candles: &[Candle], size: usize, level: StructureLevel) -> LevelStructure {
    let legs = compute_legs(candles, size);
    LevelStructure {
        swings: swings_from_legs(candles, &legs, size),
        breaks: breaks_from_legs(candles, &legs, size, level),
    }
}

/// Trend implied by the latest break, neutral without one.
pub fn trend_of(breaks: &[StructureBreak]) -> Trend {
    breaks
        .last()
        .map(|sb| Trend::from(sb.direction))
        .unwrap_or_default()
}

#[derive(Debug, Clone, Default)]
pub struct SmcEngine {
    params: EngineParams,
}

impl SmcEngine {
    pub fn new(params: EngineParams) -> Self {
        Self { params }
    }

    /// Run every detector over `candles`.
    ///
    /// Series shorter than `min_candles` produce an empty, neutral analysis.
    pub fn analyze(&self, candles: &[Candle]) -> SmcAnalysis {
        let p = &self.params;
        if candles.len() < p.min_candles {
            return SmcAnalysis::default();
        }

        let internal = analyze_level(candles, p.internal_size, StructureLevel::Internal);
        let swing = analyze_level(candles, p.swing_size(candles.len()), StructureLevel::Swing);

        let mut swing_points: Vec<SwingPoint> = internal
            .swings
            .iter()
            .chain(swing.swings.iter())
            .copied()
            .collect();
        swing_points.sort_by_key(|s| s.index);

        let mut structures: Vec<StructureBreak> = internal
            .breaks
            .iter()
            .chain(swing.breaks.iter())
            .copied()
            .collect();
        structures.sort_by_key(|sb| sb.break_index);

        let atr = AtrSeries::compute(candles, p.atr_period);

        let mut order_blocks = detect_order_blocks(
            candles,
            &internal.breaks,
            StructureLevel::Internal,
            p.max_order_blocks,
            &atr,
        );
        order_blocks.extend(detect_order_blocks(
            candles,
            &swing.breaks,
            StructureLevel::Swing,
            p.max_order_blocks,
            &atr,
        ));

        SmcAnalysis {
            swing_points,
            structures,
            order_blocks,
            fair_value_gaps: detect_fair_value_gaps(candles, p.fvg_auto_threshold),
            equal_levels: detect_equal_levels(&swing.swings, &atr, p.equal_level_threshold),
            premium_discount: premium_discount_zone(candles, &swing.swings),
            trend: trend_of(&swing.breaks),
            internal_trend: trend_of(&internal.breaks),
        }
    }
}

/// Analyze with default parameters.
pub fn analyze_smc(candles: &[Candle]) -> SmcAnalysis {
    SmcEngine::default().analyze(candles)
}
