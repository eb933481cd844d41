//! Trade setup emitted by the scanner.

use super::{Price, SmcAnalysis, TimeMs};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalSide {
    Long,
    Short,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalStatus {
    #[default]
    Pending,
    Active,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    pub symbol: String,
    #[serde(rename = "type")]
    pub side: SignalSide,
    pub entry_price: Price,
    pub stop_loss: Price,
    pub take_profit: Price,
    /// Confluence factors joined with " + ".
    pub reason: String,
    pub timestamp: TimeMs,
    pub status: SignalStatus,
    /// Level of the structure break that triggered the setup.
    pub mss_price: Option<f64>,
    pub mss_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smc_analysis: Option<SmcAnalysis>,
}

impl Signal {
    /// Drop the attached analysis, e.g. for list responses.
    pub fn without_analysis(mut self) -> Self {
        self.smc_analysis = None;
        self
    }
}
