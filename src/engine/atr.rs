//! Average True Range, used as a significance yardstick.

use crate::domain::Candle;

/// Default ATR window.
pub const DEFAULT_ATR_PERIOD: usize = 200;

/// True range of bar `i`. Bar 0 has no previous close and uses high - low.
pub fn true_range(candles: &[Candle], i: usize) -> f64 {
    let c = &candles[i];
    if i == 0 {
        return c.range();
    }
    let prev_close = candles[i - 1].close;
    c.range()
        .max((c.high - prev_close).abs())
        .max((c.low - prev_close).abs())
}

/// Per-bar rolling mean of true range.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AtrSeries {
    values: Vec<f64>,
}

impl AtrSeries {
    /// Mean of the last `min(i + 1, period)` true ranges at every bar,
    /// kept with a running sum.
    pub fn compute(candles: &[Candle], period: usize) -> Self {
        let period = period.max(1);
        let mut ranges = Vec::with_capacity(candles.len());
        let mut values = Vec::with_capacity(candles.len());
        let mut sum = 0.0;

        for i in 0..candles.len() {
            let tr = true_range(candles, i);
            ranges.push(tr);
            sum += tr;
            if i >= period {
                sum -= ranges[i - period];
            }
            values.push(sum / (i + 1).min(period) as f64);
        }
        Self { values }
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// ATR at `index`, or `fallback` when missing, zero or NaN.
    pub fn get_or(&self, index: usize, fallback: f64) -> f64 {
        match self.get(index) {
            Some(v) if v != 0.0 && !v.is_nan() => v,
            _ => fallback,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
