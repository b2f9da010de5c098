//! Structural motif detectors
//!
//! Each detector is a pure function over the retained sequence (oldest first)
//! and inspects it from the newest symbol backwards:
//! - Runs: streaks, alternation, 2x2/3x3 blocks, streak breaks
//! - Ties: tie anchors, tie collapses and camouflaged switches
//! - Cycles: mirrored windows, hidden loops and repeated sub-blocks
//! - Frequency: single-symbol dominance of the trailing window

pub mod cycles;
pub mod frequency;
pub mod runs;
pub mod ties;

use serde::{Deserialize, Serialize};

use crate::domain::Symbol;

/// Sequences shorter than this produce no matches
pub const MIN_DETECT_LEN: usize = 2;

/// Motif catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotifKind {
    Streak,
    Alternation,
    Block,
    TieAnchor,
    MirroredCycle,
    FrequencyDominance,
    RepeatedSubBlock,
    StreakBreak,
    StrategicBreak,
    TieCollapse,
    HiddenLoop,
    CamouflagedSwitch,
}

impl MotifKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MotifKind::Streak => "streak",
            MotifKind::Alternation => "alternation",
            MotifKind::Block => "block",
            MotifKind::TieAnchor => "tie_anchor",
            MotifKind::MirroredCycle => "mirrored_cycle",
            MotifKind::FrequencyDominance => "frequency_dominance",
            MotifKind::RepeatedSubBlock => "repeated_sub_block",
            MotifKind::StreakBreak => "streak_break",
            MotifKind::StrategicBreak => "strategic_break",
            MotifKind::TieCollapse => "tie_collapse",
            MotifKind::HiddenLoop => "hidden_loop",
            MotifKind::CamouflagedSwitch => "camouflaged_switch",
        }
    }
}

impl std::fmt::Display for MotifKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Extent data explaining a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MotifDetail {
    Streak {
        symbol: Symbol,
        length: usize,
    },
    Alternation {
        length: usize,
    },
    Block {
        run_length: usize,
        /// Symbol of the older run
        first: Symbol,
        /// Symbol of the newer run
        second: Symbol,
    },
    TieAnchor {
        /// Distance of the tie from the newest symbol (0 = newest)
        offset: usize,
        before: Symbol,
        after: Option<Symbol>,
    },
    MirroredCycle {
        half: usize,
    },
    FrequencyDominance {
        symbol: Symbol,
        share: f64,
        window: usize,
    },
    RepeatedSubBlock {
        block: Vec<Symbol>,
        count: usize,
    },
    StreakBreak {
        run: Symbol,
        breaker: Symbol,
    },
    StrategicBreak {
        run: Symbol,
    },
    TieCollapse,
    HiddenLoop {
        symbol: Symbol,
    },
    CamouflagedSwitch {
        /// Side on both ends of the `X T Y X` shape
        side: Symbol,
    },
}

impl MotifDetail {
    pub fn kind(&self) -> MotifKind {
        match self {
            MotifDetail::Streak { .. } => MotifKind::Streak,
            MotifDetail::Alternation { .. } => MotifKind::Alternation,
            MotifDetail::Block { .. } => MotifKind::Block,
            MotifDetail::TieAnchor { .. } => MotifKind::TieAnchor,
            MotifDetail::MirroredCycle { .. } => MotifKind::MirroredCycle,
            MotifDetail::FrequencyDominance { .. } => MotifKind::FrequencyDominance,
            MotifDetail::RepeatedSubBlock { .. } => MotifKind::RepeatedSubBlock,
            MotifDetail::StreakBreak { .. } => MotifKind::StreakBreak,
            MotifDetail::StrategicBreak { .. } => MotifKind::StrategicBreak,
            MotifDetail::TieCollapse => MotifKind::TieCollapse,
            MotifDetail::HiddenLoop { .. } => MotifKind::HiddenLoop,
            MotifDetail::CamouflagedSwitch { .. } => MotifKind::CamouflagedSwitch,
        }
    }

    fn describe(&self) -> String {
        match self {
            MotifDetail::Streak { symbol, length } => format!("{length}x {symbol} in a row"),
            MotifDetail::Alternation { length } => {
                format!("Alternating sides over the last {length} rounds")
            }
            MotifDetail::Block {
                run_length,
                first,
                second,
            } => format!("{run_length}x{run_length} block: {first} then {second}"),
            MotifDetail::TieAnchor {
                offset,
                before,
                after: Some(after),
            } => format!("Tie {offset} back anchors a switch from {before} to {after}"),
            MotifDetail::TieAnchor {
                before,
                after: None,
                ..
            } => format!("Tie lands right after a switch to {before}"),
            MotifDetail::MirroredCycle { half } => {
                format!("Mirrored cycle over the last {} rounds", half * 2)
            }
            MotifDetail::FrequencyDominance {
                symbol,
                share,
                window,
            } => format!(
                "{symbol} holds {:.0}% of the last {window} rounds",
                share * 100.0
            ),
            MotifDetail::RepeatedSubBlock { block, count } => {
                let code: String = block.iter().map(Symbol::code).collect();
                format!("Block {code} repeats {count} times")
            }
            MotifDetail::StreakBreak { run, breaker } => {
                format!("Run of {run} broken by {breaker}")
            }
            MotifDetail::StrategicBreak { run } => {
                format!("Break right after a triple {run} pattern")
            }
            MotifDetail::TieCollapse => "Tie collapses a settled pair".to_string(),
            MotifDetail::HiddenLoop { symbol } => {
                format!("{symbol} recurs at rounds -6, -3 and -1")
            }
            MotifDetail::CamouflagedSwitch { side } => {
                format!("{side} returns after a tie and a one-round switch")
            }
        }
    }
}

/// A detected motif
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub kind: MotifKind,
    pub detail: MotifDetail,
    pub description: String,
}

impl PatternMatch {
    pub fn new(detail: MotifDetail) -> Self {
        Self {
            kind: detail.kind(),
            description: detail.describe(),
            detail,
        }
    }
}

/// Run every detector over the sequence (oldest first).
///
/// Matches are non-exclusive and returned in catalog order.
pub fn detect(seq: &[Symbol]) -> Vec<PatternMatch> {
    if seq.len() < MIN_DETECT_LEN {
        return Vec::new();
    }

    [
        runs::streak(seq),
        runs::alternation(seq),
        runs::block(seq),
        ties::tie_anchor(seq),
        cycles::mirrored_cycle(seq),
        frequency::dominance(seq),
        cycles::repeated_sub_block(seq),
        runs::streak_break(seq),
        runs::strategic_break(seq),
        ties::tie_collapse(seq),
        cycles::hidden_loop(seq),
        ties::camouflaged_switch(seq),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Find the first match of a kind
pub fn find(matches: &[PatternMatch], kind: MotifKind) -> Option<&PatternMatch> {
    matches.iter().find(|m| m.kind == kind)
}

/// Symbol `n` positions back from the newest (1 = newest)
pub(crate) fn nth_back(seq: &[Symbol], n: usize) -> Option<Symbol> {
    if n == 0 || n > seq.len() {
        return None;
    }
    Some(seq[seq.len() - n])
}
