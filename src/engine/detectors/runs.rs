//! Run-based motifs: streaks, alternation, blocks and streak breaks

use super::{nth_back, MotifDetail, PatternMatch};
use crate::domain::Symbol;

/// Minimum identical trailing sides for a streak
pub const STREAK_MIN: usize = 2;
/// Minimum trailing alternation length
pub const ALTERNATION_MIN: usize = 4;
/// Block run lengths (2x2 and 3x3)
pub const BLOCK_RUN_MIN: usize = 2;
pub const BLOCK_RUN_MAX: usize = 3;
/// Minimum history before a streak break is considered deliberate
pub const STREAK_BREAK_MIN_LEN: usize = 5;
/// Minimum history for a strategic break
pub const STRATEGIC_BREAK_MIN_LEN: usize = 7;

/// Maximal runs of identical symbols, newest run first
pub fn trailing_runs(seq: &[Symbol]) -> Vec<(Symbol, usize)> {
    let mut runs: Vec<(Symbol, usize)> = Vec::new();
    for &s in seq.iter().rev() {
        match runs.last_mut() {
            Some((sym, len)) if *sym == s => *len += 1,
            _ => runs.push((s, 1)),
        }
    }
    runs
}

/// Longest run of identical symbols anywhere in the sequence (ties included)
pub fn longest_run(seq: &[Symbol]) -> usize {
    trailing_runs(seq)
        .into_iter()
        .map(|(_, len)| len)
        .max()
        .unwrap_or(0)
}

pub fn streak(seq: &[Symbol]) -> Option<PatternMatch> {
    let &symbol = seq.last()?;
    if symbol.is_tie() {
        return None;
    }
    let length = seq.iter().rev().take_while(|&&s| s == symbol).count();
    (length >= STREAK_MIN).then(|| PatternMatch::new(MotifDetail::Streak { symbol, length }))
}

/// Length of the trailing strictly alternating run of sides
pub fn alternation_len(seq: &[Symbol]) -> usize {
    let mut length = 0;
    let mut prev: Option<Symbol> = None;
    for &s in seq.iter().rev() {
        if s.is_tie() || prev == Some(s) {
            break;
        }
        length += 1;
        prev = Some(s);
    }
    length
}

pub fn alternation(seq: &[Symbol]) -> Option<PatternMatch> {
    let length = alternation_len(seq);
    (length >= ALTERNATION_MIN).then(|| PatternMatch::new(MotifDetail::Alternation { length }))
}

/// Newest run of `L` sides preceded by at least `L` of the other side.
///
/// Only the trailing `2L` rounds form the block, so `AAABB` is a 2x2.
pub fn block(seq: &[Symbol]) -> Option<PatternMatch> {
    let runs = trailing_runs(seq);
    let (&(second, newer_len), &(first, older_len)) = (runs.first()?, runs.get(1)?);
    if first.is_tie() || second.is_tie() || older_len < newer_len {
        return None;
    }
    (BLOCK_RUN_MIN..=BLOCK_RUN_MAX).contains(&newer_len).then(|| {
        PatternMatch::new(MotifDetail::Block {
            run_length: newer_len,
            first,
            second,
        })
    })
}

/// A settled pair interrupted by the newest symbol
pub fn streak_break(seq: &[Symbol]) -> Option<PatternMatch> {
    if seq.len() < STREAK_BREAK_MIN_LEN {
        return None;
    }
    let (newest, run_a, run_b) = (nth_back(seq, 1)?, nth_back(seq, 2)?, nth_back(seq, 3)?);
    (run_a == run_b && run_a.is_side() && newest != run_a).then(|| {
        PatternMatch::new(MotifDetail::StreakBreak {
            run: run_a,
            breaker: newest,
        })
    })
}

/// A triple three to five rounds back, followed by a switch on the newest round
pub fn strategic_break(seq: &[Symbol]) -> Option<PatternMatch> {
    if seq.len() < STRATEGIC_BREAK_MIN_LEN {
        return None;
    }
    let run = nth_back(seq, 3)?;
    let triple = nth_back(seq, 4)? == run && nth_back(seq, 5)? == run;
    let switched = nth_back(seq, 1)? != nth_back(seq, 2)?;
    (triple && switched).then(|| PatternMatch::new(MotifDetail::StrategicBreak { run }))
}
