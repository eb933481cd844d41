//! Domain primitives: TimeMs, Direction, Trend, StructureLevel, SwingKind.

use serde::{Deserialize, Serialize};

/// Time in milliseconds since Unix epoch.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TimeMs(pub i64);

impl TimeMs {
    /// Create a TimeMs from milliseconds.
    pub fn new(ms: i64) -> Self {
        TimeMs(ms)
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        TimeMs(chrono::Utc::now().timestamp_millis())
    }

    /// Get the underlying milliseconds value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TimeMs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of a structure break, order block or fair value gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Bullish,
    Bearish,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Bullish => write!(f, "Bullish"),
            Direction::Bearish => write!(f, "Bearish"),
        }
    }
}

/// Running market bias; neutral until the first confirmed break.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl From<Direction> for Trend {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Bullish => Trend::Bullish,
            Direction::Bearish => Trend::Bearish,
        }
    }
}

/// Granularity at which swings and structure are detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureLevel {
    /// Fine lookback.
    Internal,
    /// Coarse lookback.
    Swing,
}

/// Swing pivot type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwingKind {
    High,
    Low,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_serialization() {
        assert_eq!(serde_json::to_string(&Direction::Bullish).unwrap(), "\"bullish\"");
        assert_eq!(serde_json::to_string(&Trend::Neutral).unwrap(), "\"neutral\"");
        assert_eq!(
            serde_json::to_string(&StructureLevel::Internal).unwrap(),
            "\"internal\""
        );
        assert_eq!(serde_json::to_string(&SwingKind::Low).unwrap(), "\"low\"");
    }

    #[test]
    fn test_trend_from_direction() {
        assert_eq!(Trend::from(Direction::Bearish), Trend::Bearish);
        assert_eq!(Trend::default(), Trend::Neutral);
    }

    #[test]
    fn test_timems_ordering() {
        let t1 = TimeMs::new(1000);
        let t2 = TimeMs::new(2000);
        assert!(t1 < t2);
        assert_eq!(t2.to_string(), "2000");
    }
}
