//! Per-bar trend leg classification.

use crate::domain::Candle;

/// Leg label carried forward between pivots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Leg {
    /// Entered after a swing high is confirmed.
    #[default]
    Bearish,
    /// Entered after a swing low is confirmed.
    Bullish,
}

/// Label every bar with its leg.
///
/// At bar `i >= size` the candle `i - size` is compared with the `size` bars
/// that follow it (`i - size + 1 ..= i`). A strictly higher high confirms a
/// swing high and starts a bearish leg; otherwise a strictly lower low
/// confirms a swing low and starts a bullish leg. Bars before `size` keep the
/// default label.
pub fn compute_legs(candles: &[Candle], size: usize) -> Vec<Leg> {
    let mut legs = vec![Leg::default(); candles.len()];
    if size == 0 {
        return legs;
    }

    let mut current = Leg::default();
    for i in size..candles.len() {
        let window = &candles[i + 1 - size..=i];
        let highest = window.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
        let lowest = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);

        let pivot = &candles[i - size];
        if pivot.high > highest {
            current = Leg::Bearish;
        } else if pivot.low < lowest {
            current = Leg::Bullish;
        }
        legs[i] = current;
    }
    legs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimeMs;

    fn bar(i: i64, high: f64, low: f64) -> Candle {
        Candle::new(TimeMs::new(i), low, high, low, high, 0.0)
    }

    #[test]
    fn test_default_before_size() {
        let candles: Vec<_> = (0..3).map(|i| bar(i, 10.0, 9.0)).collect();
        assert_eq!(compute_legs(&candles, 5), vec![Leg::Bearish; 3]);
    }

    #[test]
    fn test_swing_low_then_swing_high() {
        let candles = vec![
            bar(0, 10.0, 5.0),
            bar(1, 11.0, 6.0),
            bar(2, 15.0, 7.0),
            bar(3, 12.0, 8.0),
            bar(4, 11.0, 8.0),
        ];
        let legs = compute_legs(&candles, 2);
        assert_eq!(
            legs,
            vec![
                Leg::Bearish,
                Leg::Bearish,
                Leg::Bullish,
                Leg::Bullish,
                Leg::Bearish
            ]
        );
    }

    #[test]
    fn test_tie_does_not_flip() {
        let candles: Vec<_> = (0..10).map(|i| bar(i, 10.0, 9.0)).collect();
        assert!(compute_legs(&candles, 3).iter().all(|l| *l == Leg::Bearish));
    }

    #[test]
    fn test_zero_size_is_all_default() {
        let candles: Vec<_> = (0..4).map(|i| bar(i, 10.0 + i as f64, 9.0)).collect();
        assert_eq!(compute_legs(&candles, 0), vec![Leg::Bearish; 4]);
    }
}
