//! Cycle motifs: mirrored windows, hidden loops and repeated sub-blocks

use std::collections::BTreeMap;

use super::{nth_back, MotifDetail, PatternMatch};
use crate::domain::Symbol;

/// Half-window sizes checked for a mirrored cycle, largest first
pub const MIRROR_HALF_MIN: usize = 2;
pub const MIRROR_HALF_MAX: usize = 4;
/// Sub-block length for recurrence detection
pub const SUB_BLOCK_LEN: usize = 4;
pub const SUB_BLOCK_MIN_REPEATS: usize = 2;
pub const HIDDEN_LOOP_LEN: usize = 6;

/// Trailing window of `2k` sides whose first half is the reverse of its second half
pub fn mirrored_cycle(seq: &[Symbol]) -> Option<PatternMatch> {
    (MIRROR_HALF_MIN..=MIRROR_HALF_MAX)
        .rev()
        .find(|&half| is_mirrored(seq, half))
        .map(|half| PatternMatch::new(MotifDetail::MirroredCycle { half }))
}

fn is_mirrored(seq: &[Symbol], half: usize) -> bool {
    let width = half * 2;
    if seq.len() < width {
        return false;
    }
    let window = &seq[seq.len() - width..];
    if window.iter().any(Symbol::is_tie) {
        return false;
    }
    let both_sides = window.contains(&Symbol::SideA) && window.contains(&Symbol::SideB);
    both_sides && window[..half].iter().eq(window[half..].iter().rev())
}

/// Same symbol at positions -6, -3 and -1
pub fn hidden_loop(seq: &[Symbol]) -> Option<PatternMatch> {
    if seq.len() < HIDDEN_LOOP_LEN {
        return None;
    }
    let symbol = nth_back(seq, 1)?;
    (nth_back(seq, 3)? == symbol && nth_back(seq, 6)? == symbol)
        .then(|| PatternMatch::new(MotifDetail::HiddenLoop { symbol }))
}

#[derive(Debug, Clone, Copy, Default)]
struct Recurrence {
    count: usize,
    next_free: usize,
    last_start: usize,
}

/// Non-overlapping recurrence counts for every length-`SUB_BLOCK_LEN` substring
fn sub_block_counts(seq: &[Symbol]) -> BTreeMap<&[Symbol], Recurrence> {
    let mut counts: BTreeMap<&[Symbol], Recurrence> = BTreeMap::new();
    for (start, block) in seq.windows(SUB_BLOCK_LEN).enumerate() {
        let entry = counts.entry(block).or_default();
        if entry.count == 0 || start >= entry.next_free {
            entry.count += 1;
            entry.next_free = start + SUB_BLOCK_LEN;
            entry.last_start = start;
        }
    }
    counts
}

/// The most frequent recurring sub-block over the full retained sequence.
///
/// Ties on count go to the block that recurred most recently.
pub fn repeated_sub_block(seq: &[Symbol]) -> Option<PatternMatch> {
    sub_block_counts(seq)
        .into_iter()
        .filter(|(_, r)| r.count >= SUB_BLOCK_MIN_REPEATS)
        .max_by_key(|(_, r)| (r.count, r.last_start))
        .map(|(block, r)| {
            PatternMatch::new(MotifDetail::RepeatedSubBlock {
                block: block.to_vec(),
                count: r.count,
            })
        })
}
