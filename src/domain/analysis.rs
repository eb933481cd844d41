//! Entities produced by the SMC engine and the aggregate analysis snapshot.

use super::{Direction, StructureLevel, SwingKind, TimeMs, Trend};
use serde::{Deserialize, Serialize};

/// A confirmed swing pivot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingPoint {
    pub price: f64,
    pub time: TimeMs,
    #[serde(rename = "type")]
    pub kind: SwingKind,
    pub index: usize,
}

/// Break of Structure or Change of Character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BreakKind {
    #[serde(rename = "BOS")]
    Bos,
    #[serde(rename = "CHoCH")]
    Choch,
}

impl std::fmt::Display for BreakKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BreakKind::Bos => write!(f, "BOS"),
            BreakKind::Choch => write!(f, "CHoCH"),
        }
    }
}

/// A close through a tracked pivot level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureBreak {
    #[serde(rename = "type")]
    pub kind: BreakKind,
    pub direction: Direction,
    /// The broken pivot level.
    pub price: f64,
    pub break_index: usize,
    pub pivot_index: usize,
    pub pivot_time: TimeMs,
    pub break_time: TimeMs,
    pub level: StructureLevel,
}

/// Extremal candle between a pivot and the break that took it out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBlock {
    pub high: f64,
    pub low: f64,
    pub time: TimeMs,
    pub index: usize,
    pub bias: Direction,
    pub mitigated: bool,
    pub level: StructureLevel,
}

impl OrderBlock {
    /// Sets the mitigation flag. Never clears it.
    pub fn mitigate(&mut self) {
        self.mitigated = true;
    }
}

/// Three-candle imbalance. `index`/`time` reference the middle candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FairValueGap {
    pub top: f64,
    pub bottom: f64,
    pub bias: Direction,
    pub index: usize,
    pub time: TimeMs,
    pub mitigated: bool,
}

impl FairValueGap {
    /// Sets the mitigation flag. Never clears it.
    pub fn mitigate(&mut self) {
        self.mitigated = true;
    }
}

/// Equal highs or equal lows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EqualKind {
    #[serde(rename = "EQH")]
    EqualHighs,
    #[serde(rename = "EQL")]
    EqualLows,
}

/// Two consecutive same-type swings within tolerance of each other.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EqualLevel {
    /// Midpoint of the two swing prices.
    pub price: f64,
    #[serde(rename = "type")]
    pub kind: EqualKind,
    pub index1: usize,
    pub index2: usize,
    pub time1: TimeMs,
    pub time2: TimeMs,
}

/// Closed price interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBand {
    pub top: f64,
    pub bottom: f64,
}

impl PriceBand {
    pub fn contains(&self, price: f64) -> bool {
        price >= self.bottom && price <= self.top
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumDiscountZone {
    pub swing_high: f64,
    pub swing_low: f64,
    pub premium: PriceBand,
    pub equilibrium: PriceBand,
    pub discount: PriceBand,
    pub start_index: usize,
    pub start_time: TimeMs,
}

/// Full result of one engine run over one candle series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmcAnalysis {
    pub swing_points: Vec<SwingPoint>,
    pub structures: Vec<StructureBreak>,
    pub order_blocks: Vec<OrderBlock>,
    pub fair_value_gaps: Vec<FairValueGap>,
    pub equal_levels: Vec<EqualLevel>,
    pub premium_discount: Option<PremiumDiscountZone>,
    pub trend: Trend,
    pub internal_trend: Trend,
}

impl SmcAnalysis {
    /// Order blocks that price has not yet traded through.
    pub fn active_order_blocks(&self) -> impl Iterator<Item = &OrderBlock> {
        self.order_blocks.iter().filter(|ob| !ob.mitigated)
    }

    /// Fair value gaps that price has not yet traded through.
    pub fn active_fair_value_gaps(&self) -> impl Iterator<Item = &FairValueGap> {
        self.fair_value_gaps.iter().filter(|fvg| !fvg.mitigated)
    }
}
