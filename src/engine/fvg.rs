//! Fair-value-gap detection and mitigation.

use crate::domain::{Candle, Direction, FairValueGap};

/// Auto threshold is this multiple of the running mean body size.
pub const AUTO_THRESHOLD_MULTIPLIER: f64 = 2.0;

/// Running mean of middle-candle body sizes.
///
/// The current middle candle is folded in before it is tested, so the first
/// eligible bar is compared against a threshold built from itself alone.
#[derive(Debug, Clone, Copy, Default)]
struct BodyThreshold {
    cumulative: f64,
    count: usize,
}

impl BodyThreshold {
    fn push(&mut self, body_pct: f64) {
        self.cumulative += body_pct;
        self.count += 1;
    }

    fn value(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.cumulative / self.count as f64 * AUTO_THRESHOLD_MULTIPLIER
    }
}

/// Phase 1: collect gaps over every three-candle window.
pub fn build_fair_value_gaps(candles: &[Candle], auto_threshold: bool) -> Vec<FairValueGap> {
    let mut gaps = Vec::new();
    let mut running = BodyThreshold::default();

    for i in 2..candles.len() {
        let first = &candles[i - 2];
        let mid = &candles[i - 1];
        let current = &candles[i];

        let mid_body = mid.body_pct();
        running.push(mid_body);
        let threshold = if auto_threshold { running.value() } else { 0.0 };

        if current.low > first.high && mid.close > first.high && mid_body > threshold {
            gaps.push(FairValueGap {
                top: current.low,
                bottom: first.high,
                bias: Direction::Bullish,
                index: i - 1,
                time: mid.time,
                mitigated: false,
            });
        }

        if current.high < first.low && mid.close < first.low && mid_body > threshold {
            gaps.push(FairValueGap {
                top: first.low,
                bottom: current.high,
                bias: Direction::Bearish,
                index: i - 1,
                time: mid.time,
                mitigated: false,
            });
        }
    }

    gaps
}

/// Phase 2: flag gaps price has traded back through, starting two bars
/// after the middle candle.
pub fn mitigate_fair_value_gaps(candles: &[Candle], gaps: &mut [FairValueGap]) {
    for fvg in gaps.iter_mut().filter(|g| !g.mitigated) {
        let touched = candles.iter().skip(fvg.index + 2).any(|c| match fvg.bias {
            Direction::Bullish => c.low < fvg.bottom,
            Direction::Bearish => c.high > fvg.top,
        });
        if touched {
            fvg.mitigate();
        }
    }
}

/// Detect and mitigate fair value gaps over the whole series.
pub fn detect_fair_value_gaps(candles: &[Candle], auto_threshold: bool) -> Vec<FairValueGap> {
    let mut gaps = build_fair_value_gaps(candles, auto_threshold);
    mitigate_fair_value_gaps(candles, &mut gaps);
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimeMs;

    fn c(i: i64, open: f64, high: f64, low: f64, close: f64) -> Candle {
        Candle::new(TimeMs::new(i * 1000), open, high, low, close, 1.0)
    }

    #[test]
    fn test_bullish_gap_bounds() {
        let candles = vec![
            c(0, 99.0, 100.0, 98.0, 99.5),
            c(1, 100.0, 111.0, 99.0, 110.0),
            c(2, 110.0, 112.0, 105.0, 111.0),
        ];
        let gaps = detect_fair_value_gaps(&candles, false);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].bias, Direction::Bullish);
        assert_eq!(gaps[0].bottom, 100.0);
        assert_eq!(gaps[0].top, 105.0);
        assert_eq!(gaps[0].index, 1);
        assert_eq!(gaps[0].time, candles[1].time);
        assert!(!gaps[0].mitigated);
    }

    #[test]
    fn test_bearish_gap_bounds() {
        let candles = vec![
            c(0, 101.0, 102.0, 100.0, 100.5),
            c(1, 100.0, 100.5, 89.0, 90.0),
            c(2, 90.0, 95.0, 88.0, 89.0),
        ];
        let gaps = detect_fair_value_gaps(&candles, false);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].bias, Direction::Bearish);
        assert_eq!(gaps[0].top, 100.0);
        assert_eq!(gaps[0].bottom, 95.0);
    }

    #[test]
    fn test_auto_threshold_rejects_first_window() {
        let candles = vec![
            c(0, 99.0, 100.0, 98.0, 99.5),
            c(1, 100.0, 111.0, 99.0, 110.0),
            c(2, 110.0, 112.0, 105.0, 111.0),
        ];
        assert!(detect_fair_value_gaps(&candles, true).is_empty());
    }

    #[test]
    fn test_auto_threshold_accepts_outsized_body() {
        let mut candles: Vec<_> = (0..10)
            .map(|i| c(i, 100.0, 100.6, 99.4, 100.1))
            .collect();
        candles.push(c(10, 100.1, 111.0, 100.0, 110.0));
        candles.push(c(11, 110.0, 112.0, 105.0, 111.0));
        let gaps = detect_fair_value_gaps(&candles, true);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].index, 10);
    }

    #[test]
    fn test_mitigation_starts_after_current_candle() {
        let mut candles = vec![
            c(0, 99.0, 100.0, 98.0, 99.5),
            c(1, 100.0, 111.0, 99.0, 110.0),
            c(2, 110.0, 112.0, 105.0, 111.0),
            c(3, 111.0, 113.0, 101.0, 112.0),
        ];
        assert!(!detect_fair_value_gaps(&candles, false)[0].mitigated);

        candles.push(c(4, 112.0, 112.5, 99.0, 100.0));
        assert!(detect_fair_value_gaps(&candles, false)[0].mitigated);
    }
}
