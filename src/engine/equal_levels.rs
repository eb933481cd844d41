//! Equal highs / equal lows.

use super::atr::AtrSeries;
use crate::domain::{EqualKind, EqualLevel, SwingKind, SwingPoint};

pub const DEFAULT_EQUAL_THRESHOLD: f64 = 0.1;

/// Pair adjacent same-type swings whose prices differ by less than
/// `threshold_multiplier` × ATR at the later swing (ATR falls back to 1).
///
/// All equal highs come before all equal lows. Runs of three or more equal
/// swings produce one entry per adjacent pair.
pub fn detect_equal_levels(
    swings: &[SwingPoint],
    atr: &AtrSeries,
    threshold_multiplier: f64,
) -> Vec<EqualLevel> {
    let mut levels = pair_equal(swings, SwingKind::High, atr, threshold_multiplier);
    levels.extend(pair_equal(swings, SwingKind::Low, atr, threshold_multiplier));
    levels
}

fn pair_equal(
    swings: &[SwingPoint],
    kind: SwingKind,
    atr: &AtrSeries,
    threshold_multiplier: f64,
) -> Vec<EqualLevel> {
    let same: Vec<&SwingPoint> = swings.iter().filter(|s| s.kind == kind).collect();
    let equal_kind = match kind {
        SwingKind::High => EqualKind::EqualHighs,
        SwingKind::Low => EqualKind::EqualLows,
    };

    same.windows(2)
        .filter_map(|pair| {
            let (prev, curr) = (pair[0], pair[1]);
            let tolerance = threshold_multiplier * atr.get_or(curr.index, 1.0);
            if (curr.price - prev.price).abs() < tolerance {
                Some(EqualLevel {
                    price: (curr.price + prev.price) / 2.0,
                    kind: equal_kind,
                    index1: prev.index,
                    index2: curr.index,
                    time1: prev.time,
                    time2: curr.time,
                })
            } else {
                None
            }
        })
        .collect()
}
