//! Swing-point detection from leg flips.

use super::legs::{compute_legs, Leg};
use crate::domain::{Candle, SwingKind, SwingPoint};

/// Swing confirmed at bar `i`, if the leg flipped there.
///
/// The pivot sits `size` bars behind the flip. Requires `i > size` and
/// `legs` computed with the same `size`.
pub(crate) fn swing_at(candles: &[Candle], legs: &[Leg], size: usize, i: usize) -> Option<SwingPoint> {
    if i <= size || legs[i] == legs[i - 1] {
        return None;
    }

    let pivot_index = i - size;
    let pivot = &candles[pivot_index];
    let swing = match legs[i] {
        Leg::Bearish => SwingPoint {
            price: pivot.high,
            time: pivot.time,
            kind: SwingKind::High,
            index: pivot_index,
        },
        Leg::Bullish => SwingPoint {
            price: pivot.low,
            time: pivot.time,
            kind: SwingKind::Low,
            index: pivot_index,
        },
    };
    Some(swing)
}

/// All swings from precomputed legs, ordered by index.
pub(crate) fn swings_from_legs(candles: &[Candle], legs: &[Leg], size: usize) -> Vec<SwingPoint> {
    (size + 1..candles.len())
        .filter_map(|i| swing_at(candles, legs, size, i))
        .collect()
}

/// Detect swing highs and lows with a `size`-bar lookback.
pub fn detect_swing_points(candles: &[Candle], size: usize) -> Vec<SwingPoint> {
    let legs = compute_legs(candles, size);
    swings_from_legs(candles, &legs, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimeMs;

    fn bar(i: i64, high: f64, low: f64) -> Candle {
        Candle::new(TimeMs::new(i * 60_000), low, high, low, high, 0.0)
    }

    /// Zig-zag with peaks at 10, 30, 50 and troughs at 20, 40.
    fn zigzag() -> Vec<Candle> {
        let mut out = Vec::new();
        for i in 0..60i64 {
            let phase = i % 20;
            let mid = if phase < 10 {
                100.0 + phase as f64
            } else {
                120.0 - phase as f64
            };
            out.push(bar(i, mid + 1.0, mid - 1.0));
        }
        out
    }

    #[test]
    fn test_flat_series_has_no_swings() {
        let candles: Vec<_> = (0..40).map(|i| bar(i, 10.0, 9.0)).collect();
        assert!(detect_swing_points(&candles, 5).is_empty());
    }

    #[test]
    fn test_zigzag_swings_alternate() {
        let swings = detect_swing_points(&zigzag(), 3);
        assert!(!swings.is_empty());
        for pair in swings.windows(2) {
            assert!(pair[0].index < pair[1].index);
            assert_ne!(pair[0].kind, pair[1].kind);
        }
    }

    #[test]
    fn test_swing_price_and_time_come_from_pivot() {
        let candles = zigzag();
        let swings = detect_swing_points(&candles, 3);
        let high = swings.iter().find(|s| s.kind == SwingKind::High).unwrap();
        assert_eq!(high.index, 10);
        assert_eq!(high.price, candles[10].high);
        assert_eq!(high.time, candles[10].time);
    }
}
