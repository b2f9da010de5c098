//! Frequency dominance over the trailing window

use super::{MotifDetail, PatternMatch};
use crate::domain::Symbol;

pub const DOMINANCE_WINDOW: usize = 10;
pub const DOMINANCE_MIN_WINDOW: usize = 4;
/// Share a symbol must strictly exceed to dominate
pub const DOMINANCE_SHARE: f64 = 0.70;

/// Occurrences per symbol, indexed SideA, SideB, Tie
pub fn counts(seq: &[Symbol]) -> [usize; 3] {
    let mut counts = [0usize; 3];
    for s in seq {
        counts[s.index()] += 1;
    }
    counts
}

/// Share of `symbol` in `seq`, 0.0 for an empty slice
pub fn share(seq: &[Symbol], symbol: Symbol) -> f64 {
    if seq.is_empty() {
        return 0.0;
    }
    counts(seq)[symbol.index()] as f64 / seq.len() as f64
}

pub fn dominance(seq: &[Symbol]) -> Option<PatternMatch> {
    let window = seq.len().min(DOMINANCE_WINDOW);
    if window < DOMINANCE_MIN_WINDOW {
        return None;
    }
    let recent = &seq[seq.len() - window..];
    Symbol::ALL
        .into_iter()
        .map(|symbol| (symbol, share(recent, symbol)))
        .find(|&(_, share)| share > DOMINANCE_SHARE)
        .map(|(symbol, share)| {
            PatternMatch::new(MotifDetail::FrequencyDominance {
                symbol,
                share,
                window,
            })
        })
}
