// =============================================================================
// Shared label types used across the scanner
// =============================================================================

use serde::{Deserialize, Serialize};

/// Binary trend label used for the weekly and quarterly views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendLabel {
    Bullish,
    Bearish,
}

impl TrendLabel {
    /// `Bullish` when `condition` holds, otherwise `Bearish`.
    pub fn from_condition(condition: bool) -> Self {
        if condition {
            Self::Bullish
        } else {
            Self::Bearish
        }
    }
}

impl std::fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "Bullish"),
            Self::Bearish => write!(f, "Bearish"),
        }
    }
}

/// Tri-state label for the monthly view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonthlyLabel {
    Bullish,
    Neutral,
    Bearish,
}

impl std::fmt::Display for MonthlyLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "Bullish"),
            Self::Neutral => write!(f, "Neutral"),
            Self::Bearish => write!(f, "Bearish"),
        }
    }
}

/// Event reported by the EMA crossover detector for the most recent bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CrossoverEvent {
    BullishCross,
    BearishCross,
    #[default]
    None,
}

impl std::fmt::Display for CrossoverEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BullishCross => write!(f, "BullishCross"),
            Self::BearishCross => write!(f, "BearishCross"),
            Self::None => write!(f, "None"),
        }
    }
}

/// Bar interval requested from the price source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    Weekly,
    Monthly,
}

impl Timeframe {
    /// Interval code understood by the Yahoo chart endpoint.
    pub fn interval(&self) -> &'static str {
        match self {
            Self::Weekly => "1wk",
            Self::Monthly => "1mo",
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Weekly => write!(f, "Weekly"),
            Self::Monthly => write!(f, "Monthly"),
        }
    }
}
