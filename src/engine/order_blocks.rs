//! Order-block extraction and mitigation.

use super::atr::AtrSeries;
use crate::domain::{Candle, Direction, OrderBlock, StructureBreak, StructureLevel};

/// Blocks whose range is below this fraction of ATR are discarded.
pub const MIN_BLOCK_ATR_FRACTION: f64 = 0.1;

/// Phase 1: one candidate block per qualifying break of `level`.
///
/// For a bullish break the block is the lowest-low candle in
/// `[pivot_index, break_index)`; for a bearish break the highest-high one.
/// Earliest candle wins ties.
pub fn build_order_blocks(
    candles: &[Candle],
    structures: &[StructureBreak],
    level: StructureLevel,
    atr: &AtrSeries,
) -> Vec<OrderBlock> {
    let mut blocks = Vec::new();

    for sb in structures.iter().filter(|sb| sb.level == level) {
        let (from, to) = (sb.pivot_index, sb.break_index);
        if from >= to || to >= candles.len() {
            continue;
        }

        let mut extreme = from;
        for j in from..to {
            let better = match sb.direction {
                Direction::Bullish => candles[j].low < candles[extreme].low,
                Direction::Bearish => candles[j].high > candles[extreme].high,
            };
            if better {
                extreme = j;
            }
        }

        let candle = &candles[extreme];
        let threshold = atr.get(extreme).unwrap_or(0.0) * MIN_BLOCK_ATR_FRACTION;
        if candle.range() < threshold {
            continue;
        }

        blocks.push(OrderBlock {
            high: candle.high,
            low: candle.low,
            time: candle.time,
            index: extreme,
            bias: sb.direction,
            mitigated: false,
            level,
        });
    }

    blocks
}

/// Phase 2: flag blocks price has since traded through.
///
/// Bearish blocks mitigate on a later high above the block high, bullish
/// blocks on a later low below the block low. Flags only ever go true.
pub fn mitigate_order_blocks(candles: &[Candle], blocks: &mut [OrderBlock]) {
    for ob in blocks.iter_mut().filter(|ob| !ob.mitigated) {
        let touched = candles.iter().skip(ob.index + 1).any(|c| match ob.bias {
            Direction::Bearish => c.high > ob.high,
            Direction::Bullish => c.low < ob.low,
        });
        if touched {
            ob.mitigate();
        }
    }
}

/// Most recent `max_blocks` active blocks, then most recent `max_blocks`
/// mitigated ones.
pub fn select_recent(blocks: Vec<OrderBlock>, max_blocks: usize) -> Vec<OrderBlock> {
    let (active, mitigated): (Vec<_>, Vec<_>) = blocks.into_iter().partition(|ob| !ob.mitigated);

    let tail = |v: Vec<OrderBlock>| {
        let skip = v.len().saturating_sub(max_blocks);
        v.into_iter().skip(skip)
    };
    tail(active).chain(tail(mitigated)).collect()
}

/// Build, mitigate and cap the order blocks for one structure level.
pub fn detect_order_blocks(
    candles: &[Candle],
    structures: &[StructureBreak],
    level: StructureLevel,
    max_blocks: usize,
    atr: &AtrSeries,
) -> Vec<OrderBlock> {
    let mut blocks = build_order_blocks(candles, structures, level, atr);
    mitigate_order_blocks(candles, &mut blocks);
    select_recent(blocks, max_blocks)
}
