//! Risk / manipulation classifier
//!
//! Scores the trailing analysis window against a fixed condition table and maps
//! the cumulative score onto a 1..=9 level:
//!
//! `level = min(9, score / 10 + 1)`
//!
//! Tags name every satisfied condition. Breach tags and the High tier force an
//! `avoid` verdict regardless of confidence.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::detectors::{self, frequency, runs, MotifDetail, MotifKind, PatternMatch};
use crate::domain::Symbol;

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 9;

const HIGH_TIE_RATIO: f64 = 0.25;
const EXTREME_TIE_RATIO: f64 = 0.40;
const EXTREME_DOMINANCE_SHARE: f64 = 0.85;
const LONG_RUN: usize = 5;
const TIE_CLUSTER: usize = 2;
const FORCED_BLOCK_WINDOW: usize = 6;

/// Classifier condition, serialized as its tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskTag {
    HighTieRatio,
    ExtremeTieRatio,
    LongRun,
    ExtendedRun,
    ShortRun,
    TieCluster,
    PerfectAlternation,
    RecurringBlocks,
    ForcedBlocks,
    Dominance,
    ExtremeDominance,
    StreakBreak,
    TieCollapse,
    HiddenLoop,
    CamouflagedSwitch,
}

impl RiskTag {
    /// Points added to the score when the condition holds
    pub fn points(&self) -> u32 {
        match self {
            RiskTag::HighTieRatio => 30,
            RiskTag::ExtremeTieRatio => 10,
            RiskTag::LongRun => 40,
            RiskTag::ExtendedRun => 25,
            RiskTag::ShortRun => 10,
            RiskTag::TieCluster => 30,
            RiskTag::PerfectAlternation => 20,
            RiskTag::RecurringBlocks => 15,
            RiskTag::ForcedBlocks => 25,
            RiskTag::Dominance => 20,
            RiskTag::ExtremeDominance => 10,
            RiskTag::StreakBreak => 10,
            RiskTag::TieCollapse => 10,
            RiskTag::HiddenLoop => 10,
            RiskTag::CamouflagedSwitch => 15,
        }
    }

    /// Breach tags unconditionally force `avoid`
    pub fn is_breach(&self) -> bool {
        matches!(self, RiskTag::ExtremeTieRatio | RiskTag::ExtremeDominance)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTag::HighTieRatio => "high-tie-ratio",
            RiskTag::ExtremeTieRatio => "extreme-tie-ratio",
            RiskTag::LongRun => "long-run",
            RiskTag::ExtendedRun => "extended-run",
            RiskTag::ShortRun => "short-run",
            RiskTag::TieCluster => "tie-cluster",
            RiskTag::PerfectAlternation => "perfect-alternation",
            RiskTag::RecurringBlocks => "recurring-blocks",
            RiskTag::ForcedBlocks => "forced-blocks",
            RiskTag::Dominance => "dominance",
            RiskTag::ExtremeDominance => "extreme-dominance",
            RiskTag::StreakBreak => "streak-break",
            RiskTag::TieCollapse => "tie-collapse",
            RiskTag::HiddenLoop => "hidden-loop",
            RiskTag::CamouflagedSwitch => "camouflaged-switch",
        }
    }
}

impl std::fmt::Display for RiskTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ordinal risk level in `1..=9`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskLevel(u8);

impl RiskLevel {
    pub const LOWEST: RiskLevel = RiskLevel(MIN_LEVEL);
    pub const HIGHEST: RiskLevel = RiskLevel(MAX_LEVEL);

    pub fn from_score(score: u32) -> Self {
        let level = (score / 10 + 1).min(MAX_LEVEL as u32);
        RiskLevel(level as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn tier(&self) -> RiskTier {
        match self.0 {
            0..=3 => RiskTier::Low,
            4..=6 => RiskTier::Medium,
            _ => RiskTier::High,
        }
    }
}

impl Default for RiskLevel {
    fn default() -> Self {
        Self::LOWEST
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display grouping of levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTier::Low => write!(f, "low"),
            RiskTier::Medium => write!(f, "medium"),
            RiskTier::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: u32,
    pub level: RiskLevel,
    pub tags: BTreeSet<RiskTag>,
}

impl RiskAssessment {
    pub fn has_breach(&self) -> bool {
        self.tags.iter().any(RiskTag::is_breach)
    }
}

/// Score the analysis window together with the detected motifs
pub fn classify(window: &[Symbol], matches: &[PatternMatch]) -> RiskAssessment {
    let mut tags = BTreeSet::new();

    let tie_ratio = frequency::share(window, Symbol::Tie);
    if tie_ratio > HIGH_TIE_RATIO {
        tags.insert(RiskTag::HighTieRatio);
    }
    if tie_ratio > EXTREME_TIE_RATIO {
        tags.insert(RiskTag::ExtremeTieRatio);
    }

    match runs::longest_run(window) {
        n if n >= LONG_RUN => {
            tags.insert(RiskTag::LongRun);
        }
        4 => {
            tags.insert(RiskTag::ExtendedRun);
        }
        3 => {
            tags.insert(RiskTag::ShortRun);
        }
        _ => {}
    }

    let trailing_ties = window.iter().rev().take_while(|s| s.is_tie()).count();
    if trailing_ties >= TIE_CLUSTER {
        tags.insert(RiskTag::TieCluster);
    }

    if window.len() >= runs::ALTERNATION_MIN && runs::alternation_len(window) == window.len() {
        tags.insert(RiskTag::PerfectAlternation);
    }

    if forced_blocks(window) {
        tags.insert(RiskTag::ForcedBlocks);
    }

    for m in matches {
        match (&m.kind, &m.detail) {
            (MotifKind::RepeatedSubBlock, _) => {
                tags.insert(RiskTag::RecurringBlocks);
            }
            (MotifKind::FrequencyDominance, MotifDetail::FrequencyDominance { share, .. }) => {
                tags.insert(RiskTag::Dominance);
                if *share >= EXTREME_DOMINANCE_SHARE {
                    tags.insert(RiskTag::ExtremeDominance);
                }
            }
            (MotifKind::StreakBreak | MotifKind::StrategicBreak, _) => {
                tags.insert(RiskTag::StreakBreak);
            }
            (MotifKind::TieCollapse, _) => {
                tags.insert(RiskTag::TieCollapse);
            }
            (MotifKind::HiddenLoop, _) => {
                tags.insert(RiskTag::HiddenLoop);
            }
            (MotifKind::CamouflagedSwitch, _) => {
                tags.insert(RiskTag::CamouflagedSwitch);
            }
            _ => {}
        }
    }

    let score = tags.iter().map(RiskTag::points).sum();
    RiskAssessment {
        score,
        level: RiskLevel::from_score(score),
        tags,
    }
}

/// Last six rounds split into two uniform halves of different symbols
fn forced_blocks(window: &[Symbol]) -> bool {
    if window.len() < FORCED_BLOCK_WINDOW {
        return false;
    }
    let recent = &window[window.len() - FORCED_BLOCK_WINDOW..];
    let (older, newer) = recent.split_at(FORCED_BLOCK_WINDOW / 2);
    let uniform = |half: &[Symbol]| half.iter().all(|s| *s == half[0]);
    uniform(older) && uniform(newer) && older[0] != newer[0]
}

/// Convenience for callers that only hold a sequence
pub fn classify_sequence(window: &[Symbol]) -> RiskAssessment {
    classify(window, &detectors::detect(window))
}
