//! Trade setup scanner built on the SMC analysis.
//!
//! A setup needs a recent structure break plus at least one confluence
//! factor: an order block or fair value gap near price, the matching
//! premium/discount zone, or a loosely nearby order block.

use crate::domain::{
    Candle, Direction, OrderBlock, Price, PriceBand, Signal, SignalSide, SignalStatus,
    SmcAnalysis, StructureBreak, SwingKind, TimeMs,
};
use crate::engine::{EngineParams, SmcEngine};
use tracing::{debug, info};

/// Scanner tunables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanParams {
    pub engine: EngineParams,
    /// Shorter series are not scanned.
    pub min_candles: usize,
    /// Only breaks within this many trailing bars qualify.
    pub recent_bars: usize,
    /// Relative distance within which a zone counts as "near" price.
    pub proximity: f64,
    pub reward_ratio: f64,
    /// Stop offset beyond the protecting swing.
    pub swing_stop_buffer: f64,
    /// Stop offset beyond the stop base when no swing protects the entry.
    pub fallback_stop_buffer: f64,
    /// How far before the broken pivot a loose order block may sit.
    pub loose_block_slack: usize,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            engine: EngineParams::default(),
            min_candles: 50,
            recent_bars: 30,
            proximity: 0.03,
            reward_ratio: 2.0,
            swing_stop_buffer: 0.002,
            fallback_stop_buffer: 0.02,
            loose_block_slack: 10,
        }
    }
}

/// Analyze `candles` and look for a setup on the latest recent break.
pub fn scan_for_setup(
    symbol: &str,
    candles: &[Candle],
    params: &ScanParams,
    now: TimeMs,
) -> Option<Signal> {
    debug!("Scanning {} with {} candles", symbol, candles.len());
    if candles.len() < params.min_candles {
        return None;
    }

    let smc = SmcEngine::new(params.engine).analyze(candles);
    info!(
        "{}: structures={} order_blocks={} fvgs={} trend={:?} internal={:?}",
        symbol,
        smc.structures.len(),
        smc.order_blocks.len(),
        smc.fair_value_gaps.len(),
        smc.trend,
        smc.internal_trend
    );

    let price = candles[candles.len() - 1].close;
    let recent_from = candles.len().saturating_sub(params.recent_bars);
    let Some(latest) = smc
        .structures
        .iter()
        .rev()
        .find(|sb| sb.break_index >= recent_from)
        .copied()
    else {
        debug!("{}: no recent structure break", symbol);
        return None;
    };
    debug!(
        "{}: latest structure {} {} @ {}",
        symbol, latest.kind, latest.direction, latest.price
    );

    let setup = build_setup(&smc, &latest, price, params);
    let Some(setup) = setup else {
        debug!("{}: no confluence for signal", symbol);
        return None;
    };

    let signal = Signal {
        symbol: symbol.to_string(),
        side: setup.side,
        entry_price: Price::from_f64_rounded(setup.entry)?,
        stop_loss: Price::from_f64_rounded(setup.stop)?,
        take_profit: Price::from_f64_rounded(setup.target)?,
        reason: setup.reasons.join(" + "),
        timestamp: now,
        status: SignalStatus::Pending,
        mss_price: Some(latest.price),
        mss_index: Some(latest.break_index),
        smc_analysis: Some(smc),
    };
    info!("Signal: {} {:?} ({})", symbol, signal.side, signal.reason);
    Some(signal)
}

/// Unrounded setup levels.
#[derive(Debug, Clone, PartialEq)]
struct Setup {
    side: SignalSide,
    entry: f64,
    stop: f64,
    target: f64,
    reasons: Vec<String>,
}

fn build_setup(
    smc: &SmcAnalysis,
    latest: &StructureBreak,
    price: f64,
    params: &ScanParams,
) -> Option<Setup> {
    let direction = latest.direction;
    let p = params.proximity;

    let relevant_ob = smc
        .active_order_blocks()
        .find(|ob| ob.bias == direction && near(price, ob.low, ob.high, p));
    let relevant_fvg = smc
        .active_fair_value_gaps()
        .find(|fvg| fvg.bias == direction && near(price, fvg.bottom, fvg.top, p));

    let mut reasons = vec![format!("{} {}", latest.kind, direction)];
    let mut entry = price;
    let mut stop_base = price;

    if let Some(ob) = relevant_ob {
        reasons.push("Order Block Retest".to_string());
        entry = block_edge(ob);
        stop_base = entry;
    }
    if relevant_fvg.is_some() {
        reasons.push("FVG Zone".to_string());
    }
    if let Some(zone_reason) = zone_confluence(smc, direction, price) {
        reasons.push(zone_reason.to_string());
    }

    if reasons.len() < 2 && relevant_ob.is_none() {
        let loose = smc.active_order_blocks().find(|ob| {
            ob.bias == direction && ob.index + params.loose_block_slack > latest.pivot_index
        });
        if let Some(ob) = loose {
            reasons.push("Nearby OB".to_string());
            stop_base = block_edge(ob);
        }
    }

    if reasons.len() < 2 {
        return None;
    }

    let protecting = last_swing_before(smc, direction, latest.break_index);
    let (side, stop, target) = match direction {
        Direction::Bearish => {
            let stop = protecting
                .map(|s| s * (1.0 + params.swing_stop_buffer))
                .unwrap_or(stop_base * (1.0 + params.fallback_stop_buffer));
            let risk = stop - entry;
            (SignalSide::Short, stop, entry - risk * params.reward_ratio)
        }
        Direction::Bullish => {
            let stop = protecting
                .map(|s| s * (1.0 - params.swing_stop_buffer))
                .unwrap_or(stop_base * (1.0 - params.fallback_stop_buffer));
            let risk = entry - stop;
            (SignalSide::Long, stop, entry + risk * params.reward_ratio)
        }
    };

    Some(Setup {
        side,
        entry,
        stop,
        target,
        reasons,
    })
}

/// `price` within `[low * (1 - p), high * (1 + p)]`.
fn near(price: f64, low: f64, high: f64, p: f64) -> bool {
    PriceBand {
        top: high * (1.0 + p),
        bottom: low * (1.0 - p),
    }
    .contains(price)
}

/// Entry side of a block: top for supply, bottom for demand.
fn block_edge(ob: &OrderBlock) -> f64 {
    match ob.bias {
        Direction::Bearish => ob.high,
        Direction::Bullish => ob.low,
    }
}

fn zone_confluence(smc: &SmcAnalysis, direction: Direction, price: f64) -> Option<&'static str> {
    let zone = smc.premium_discount.as_ref()?;
    match direction {
        Direction::Bearish if price > zone.equilibrium.top => Some("Premium Zone"),
        Direction::Bullish if price < zone.equilibrium.bottom => Some("Discount Zone"),
        _ => None,
    }
}

/// Price of the last swing high (bearish) or low (bullish) at or before
/// `break_index`.
fn last_swing_before(smc: &SmcAnalysis, direction: Direction, break_index: usize) -> Option<f64> {
    let kind = match direction {
        Direction::Bearish => SwingKind::High,
        Direction::Bullish => SwingKind::Low,
    };
    smc.swing_points
        .iter()
        .rev()
        .find(|s| s.kind == kind && s.index <= break_index)
        .map(|s| s.price)
}
