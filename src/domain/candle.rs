//! OHLCV candle.

use super::TimeMs;
use serde::{Deserialize, Serialize};

/// One OHLCV bar. Series are ordered by strictly increasing `time`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: TimeMs,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(time: TimeMs, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// High minus low.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Absolute body size as a percentage of the open.
    ///
    /// A zero or negative open yields a non-finite or meaningless value.
    pub fn body_pct(&self) -> f64 {
        (self.close - self.open).abs() / self.open * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_and_body() {
        let c = Candle::new(TimeMs::new(0), 100.0, 110.0, 95.0, 105.0, 1.0);
        assert_eq!(c.range(), 15.0);
        assert!((c.body_pct() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_open_is_not_finite() {
        let c = Candle::new(TimeMs::new(0), 0.0, 1.0, 0.0, 1.0, 0.0);
        assert!(!c.body_pct().is_finite());
    }
}
