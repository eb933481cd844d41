//! BOS / CHoCH detection.

use super::legs::{compute_legs, Leg};
use super::swings::swing_at;
use crate::domain::{
    BreakKind, Candle, Direction, StructureBreak, StructureLevel, SwingKind, SwingPoint, TimeMs,
    Trend,
};

/// Tracking record for the latest pivot on one side.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PivotRecord {
    pub current_level: Option<f64>,
    pub last_level: Option<f64>,
    /// Set once price has closed through `current_level`.
    pub crossed: bool,
    pub time: TimeMs,
    pub index: usize,
}

impl PivotRecord {
    fn track(&mut self, swing: &SwingPoint) {
        self.last_level = self.current_level;
        self.current_level = Some(swing.price);
        self.crossed = false;
        self.time = swing.time;
        self.index = swing.index;
    }

    /// Level still waiting to be broken.
    fn open_level(&self) -> Option<f64> {
        if self.crossed {
            None
        } else {
            self.current_level
        }
    }
}

/// Single-pass state for one structure scan.
///
/// Created per call and discarded afterwards; nothing outlives the scan.
pub struct StructureTracker {
    level: StructureLevel,
    pub pivot_high: PivotRecord,
    pub pivot_low: PivotRecord,
    pub bias: Trend,

    breaks: Vec<StructureBreak>,
}

impl StructureTracker {
    pub fn new(level: StructureLevel) -> Self {
        Self {
            level,
            pivot_high: PivotRecord::default(),
            pivot_low: PivotRecord::default(),
            bias: Trend::Neutral,
            breaks: Vec::new(),
        }
    }

    /// Replace the tracked pivot on the swing's side.
    pub fn on_swing(&mut self, swing: &SwingPoint) {
        match swing.kind {
            SwingKind::High => self.pivot_high.track(swing),
            SwingKind::Low => self.pivot_low.track(swing),
        }
    }

    /// Check bar `i` (i >= 1) for closes through the tracked pivots.
    pub fn on_bar(&mut self, candles: &[Candle], i: usize) {
        let close = candles[i].close;
        let prev_close = candles[i - 1].close;

        if let Some(level) = self.pivot_high.open_level() {
            if close > level && prev_close <= level {
                self.pivot_high.crossed = true;
                let pivot = self.pivot_high;
                self.record_break(Direction::Bullish, level, pivot, &candles[i], i);
            }
        }

        if let Some(level) = self.pivot_low.open_level() {
            if close < level && prev_close >= level {
                self.pivot_low.crossed = true;
                let pivot = self.pivot_low;
                self.record_break(Direction::Bearish, level, pivot, &candles[i], i);
            }
        }
    }

    fn record_break(
        &mut self,
        direction: Direction,
        level: f64,
        pivot: PivotRecord,
        candle: &Candle,
        i: usize,
    ) {
        let opposing = match direction {
            Direction::Bullish => Trend::Bearish,
            Direction::Bearish => Trend::Bullish,
        };
        let kind = if self.bias == opposing {
            BreakKind::Choch
        } else {
            BreakKind::Bos
        };

        self.breaks.push(StructureBreak {
            kind,
            direction,
            price: level,
            break_index: i,
            pivot_index: pivot.index,
            pivot_time: pivot.time,
            break_time: candle.time,
            level: self.level,
        });
        self.bias = direction.into();
    }

    pub fn into_breaks(self) -> Vec<StructureBreak> {
        self.breaks
    }
}

/// Run the tracker over precomputed legs.
pub(crate) fn breaks_from_legs(
    candles: &[Candle],
    legs: &[Leg],
    size: usize,
    level: StructureLevel,
) -> Vec<StructureBreak> {
    let mut tracker = StructureTracker::new(level);
    for i in size + 1..candles.len() {
        if let Some(swing) = swing_at(candles, legs, size, i) {
            tracker.on_swing(&swing);
        }
        tracker.on_bar(candles, i);
    }
    tracker.into_breaks()
}

/// Detect structure breaks with a `size`-bar pivot lookback.
pub fn detect_structure_breaks(
    candles: &[Candle],
    size: usize,
    level: StructureLevel,
) -> Vec<StructureBreak> {
    let legs = compute_legs(candles, size);
    breaks_from_legs(candles, &legs, size, level)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(i: usize, close: f64) -> Candle {
        Candle::new(TimeMs::new(i as i64), close, close + 0.5, close - 0.5, close, 0.0)
    }

    fn swing(kind: SwingKind, price: f64, index: usize) -> SwingPoint {
        SwingPoint {
            price,
            time: TimeMs::new(index as i64),
            kind,
            index,
        }
    }

    #[test]
    fn test_first_break_is_bos_then_choch() {
        let candles: Vec<_> = [10.0, 10.0, 12.0, 12.0, 8.0]
            .iter()
            .enumerate()
            .map(|(i, c)| candle(i, *c))
            .collect();

        let mut tracker = StructureTracker::new(StructureLevel::Internal);
        tracker.on_swing(&swing(SwingKind::High, 11.0, 0));
        tracker.on_swing(&swing(SwingKind::Low, 9.0, 1));
        for i in 1..candles.len() {
            tracker.on_bar(&candles, i);
        }

        assert_eq!(tracker.bias, Trend::Bearish);
        let breaks = tracker.into_breaks();
        assert_eq!(breaks.len(), 2);
        assert_eq!(breaks[0].kind, BreakKind::Bos);
        assert_eq!(breaks[0].direction, Direction::Bullish);
        assert_eq!(breaks[0].break_index, 2);
        assert_eq!(breaks[0].pivot_index, 0);
        assert_eq!(breaks[0].price, 11.0);
        assert_eq!(breaks[1].kind, BreakKind::Choch);
        assert_eq!(breaks[1].direction, Direction::Bearish);
        assert_eq!(breaks[1].break_index, 4);
    }

    #[test]
    fn test_crossed_pivot_does_not_fire_twice() {
        let candles: Vec<_> = [10.0, 12.0, 10.0, 12.0]
            .iter()
            .enumerate()
            .map(|(i, c)| candle(i, *c))
            .collect();

        let mut tracker = StructureTracker::new(StructureLevel::Swing);
        tracker.on_swing(&swing(SwingKind::High, 11.0, 0));
        for i in 1..candles.len() {
            tracker.on_bar(&candles, i);
        }
        assert!(tracker.pivot_high.crossed);
        assert_eq!(tracker.into_breaks().len(), 1);
    }

    #[test]
    fn test_new_pivot_resets_crossed() {
        let mut tracker = StructureTracker::new(StructureLevel::Swing);
        tracker.on_swing(&swing(SwingKind::High, 11.0, 0));
        tracker.pivot_high.crossed = true;
        tracker.on_swing(&swing(SwingKind::High, 13.0, 5));
        assert!(!tracker.pivot_high.crossed);
        assert_eq!(tracker.pivot_high.current_level, Some(13.0));
        assert_eq!(tracker.pivot_high.last_level, Some(11.0));
        assert_eq!(tracker.pivot_high.index, 5);
    }

    #[test]
    fn test_gap_through_level_needs_prior_close_at_or_below() {
        // Previous close already above the level: no crossing on this bar.
        let candles: Vec<_> = [12.0, 13.0]
            .iter()
            .enumerate()
            .map(|(i, c)| candle(i, *c))
            .collect();
        let mut tracker = StructureTracker::new(StructureLevel::Internal);
        tracker.on_swing(&swing(SwingKind::High, 11.0, 0));
        tracker.on_bar(&candles, 1);
        assert!(tracker.into_breaks().is_empty());
    }

    #[test]
    fn test_prior_close_on_level_still_breaks() {
        let candles: Vec<_> = [11.0, 12.0, 9.0, 8.0]
            .iter()
            .enumerate()
            .map(|(i, c)| candle(i, *c))
            .collect();
        let mut tracker = StructureTracker::new(StructureLevel::Internal);
        tracker.on_swing(&swing(SwingKind::High, 11.0, 0));
        tracker.on_bar(&candles, 1);
        tracker.on_swing(&swing(SwingKind::Low, 9.0, 1));
        tracker.on_bar(&candles, 3);

        let breaks = tracker.into_breaks();
        assert_eq!(breaks.len(), 2);
        assert_eq!(breaks[0].direction, Direction::Bullish);
        assert_eq!(breaks[0].break_index, 1);
        assert_eq!(breaks[1].direction, Direction::Bearish);
        assert_eq!(breaks[1].break_index, 3);
    }

    #[test]
    fn test_flat_series_has_no_breaks() {
        let candles: Vec<_> = (0..40).map(|i| candle(i, 10.0)).collect();
        assert!(detect_structure_breaks(&candles, 5, StructureLevel::Internal).is_empty());
    }
}
