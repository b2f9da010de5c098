//! Bet / watch / avoid verdict

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::risk::{RiskLevel, RiskTag, RiskTier};

/// Confidence needed for a `bet` verdict
pub const BET_CONFIDENCE: u8 = 65;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Bet,
    #[default]
    Watch,
    Avoid,
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Recommendation::Bet => write!(f, "bet"),
            Recommendation::Watch => write!(f, "watch"),
            Recommendation::Avoid => write!(f, "avoid"),
        }
    }
}

/// High-tier levels (7..=9) and breach tags avoid regardless of confidence.
pub fn recommend(level: RiskLevel, confidence: u8, tags: &BTreeSet<RiskTag>) -> Recommendation {
    if level.tier() == RiskTier::High || tags.iter().any(RiskTag::is_breach) {
        Recommendation::Avoid
    } else if confidence >= BET_CONFIDENCE {
        Recommendation::Bet
    } else {
        Recommendation::Watch
    }
}
