//! Premium / equilibrium / discount partition of the trailing range.

use crate::domain::{Candle, PremiumDiscountZone, PriceBand, SwingKind, SwingPoint};

/// Premium and discount each take this fraction at the range edges.
pub const EDGE_BAND_FRACTION: f64 = 0.05;
pub const EQUILIBRIUM_LOW_FRACTION: f64 = 0.475;
pub const EQUILIBRIUM_HIGH_FRACTION: f64 = 0.525;

/// Zone over the range traded since the older of the latest swing high and
/// latest swing low.
///
/// Returns None without at least one swing of each type, or when the
/// trailing range is empty (high <= low). Recomputed from scratch each call.
pub fn premium_discount_zone(
    candles: &[Candle],
    swings: &[SwingPoint],
) -> Option<PremiumDiscountZone> {
    let last_high = swings.iter().rev().find(|s| s.kind == SwingKind::High)?;
    let last_low = swings.iter().rev().find(|s| s.kind == SwingKind::Low)?;
    let start = last_high.index.min(last_low.index);

    let trailing = candles.get(start..)?;
    let high = trailing.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
    let low = trailing.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    if high <= low {
        return None;
    }

    let range = high - low;
    Some(PremiumDiscountZone {
        swing_high: high,
        swing_low: low,
        premium: PriceBand {
            top: high,
            bottom: high - range * EDGE_BAND_FRACTION,
        },
        equilibrium: PriceBand {
            top: low + range * EQUILIBRIUM_HIGH_FRACTION,
            bottom: low + range * EQUILIBRIUM_LOW_FRACTION,
        },
        discount: PriceBand {
            top: low + range * EDGE_BAND_FRACTION,
            bottom: low,
        },
        start_index: start,
        start_time: candles[start].time,
    })
}
