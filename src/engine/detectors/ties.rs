//! Tie-centred motifs

use super::{nth_back, MotifDetail, PatternMatch};
use crate::domain::Symbol;

/// How far back a tie may sit and still anchor the next round
pub const TIE_ANCHOR_WINDOW: usize = 4;
pub const TIE_COLLAPSE_MIN_LEN: usize = 5;
pub const CAMOUFLAGED_SWITCH_LEN: usize = 4;

/// A tie wedged into a side change.
///
/// Ties in the trailing window are checked newest first. A tie qualifies when it
/// sits between two different sides (`X T Y`), or when it is the newest symbol
/// and directly follows a side change (`Y X T`).
pub fn tie_anchor(seq: &[Symbol]) -> Option<PatternMatch> {
    let len = seq.len();
    let start = len.saturating_sub(TIE_ANCHOR_WINDOW);

    for i in (start..len).rev().filter(|&i| seq[i].is_tie()) {
        let offset = len - 1 - i;
        let before = i.checked_sub(1).map(|j| seq[j]);
        let after = seq.get(i + 1).copied();

        match (before, after) {
            (Some(b), Some(a)) if b.is_side() && a.is_side() && a != b => {
                return Some(PatternMatch::new(MotifDetail::TieAnchor {
                    offset,
                    before: b,
                    after: Some(a),
                }));
            }
            (Some(b), None) if b.is_side() => {
                let earlier = i.checked_sub(2).map(|j| seq[j]);
                if matches!(earlier, Some(e) if e.is_side() && e != b) {
                    return Some(PatternMatch::new(MotifDetail::TieAnchor {
                        offset,
                        before: b,
                        after: None,
                    }));
                }
            }
            _ => {}
        }
    }
    None
}

/// Newest round is a tie landing on a fresh switch that followed a settled pair
pub fn tie_collapse(seq: &[Symbol]) -> Option<PatternMatch> {
    if seq.len() < TIE_COLLAPSE_MIN_LEN || !nth_back(seq, 1)?.is_tie() {
        return None;
    }
    let switched = nth_back(seq, 2)? != nth_back(seq, 3)?;
    let settled = nth_back(seq, 4)? == nth_back(seq, 5)?;
    (switched && settled).then(|| PatternMatch::new(MotifDetail::TieCollapse))
}

/// A side returns after a tie and a one-round switch: `X T Y X`
pub fn camouflaged_switch(seq: &[Symbol]) -> Option<PatternMatch> {
    if seq.len() < CAMOUFLAGED_SWITCH_LEN {
        return None;
    }
    let side = nth_back(seq, 1)?;
    let switched = side.opposite()? == nth_back(seq, 2)?;
    let masked = nth_back(seq, 3)?.is_tie() && nth_back(seq, 4)? == side;
    (switched && masked).then(|| PatternMatch::new(MotifDetail::CamouflagedSwitch { side }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use Symbol::*;

    #[test]
    fn tie_between_different_sides_is_an_anchor() {
        let m = tie_anchor(&[SideA, Tie, SideB]).expect("anchor");
        assert_eq!(
            m.detail,
            MotifDetail::TieAnchor {
                offset: 1,
                before: SideA,
                after: Some(SideB)
            }
        );
    }

    #[test]
    fn tie_between_same_sides_is_not() {
        assert!(tie_anchor(&[SideA, Tie, SideA]).is_none());
    }

    #[test]
    fn newest_tie_after_switch_is_an_anchor() {
        let m = tie_anchor(&[SideB, SideA, Tie]).expect("anchor");
        assert_eq!(
            m.detail,
            MotifDetail::TieAnchor {
                offset: 0,
                before: SideA,
                after: None
            }
        );
        assert!(tie_anchor(&[SideA, SideA, Tie]).is_none());
    }

    #[test]
    fn ties_outside_window_are_ignored() {
        assert!(tie_anchor(&[SideA, Tie, SideB, SideB, SideB, SideB]).is_none());
    }

    #[test]
    fn older_tie_in_window_can_still_anchor() {
        // newest tie (after A,A) does not qualify, the one before it does
        let seq = [SideB, Tie, SideA, Tie];
        let m = tie_anchor(&seq).expect("anchor");
        assert!(matches!(
            m.detail,
            MotifDetail::TieAnchor { offset: 2, before: SideB, after: Some(SideA) }
        ));
    }

    #[test]
    fn tie_collapse_shape() {
        let seq = [SideB, SideB, SideA, SideB, Tie];
        assert!(tie_collapse(&seq).is_some());
        let seq = [SideB, SideA, SideA, SideB, Tie];
        assert!(tie_collapse(&seq).is_none());
        assert!(tie_collapse(&[SideA, SideB, Tie]).is_none());
    }

    #[test]
    fn camouflaged_switch_returns_to_the_side() {
        let m = camouflaged_switch(&[SideB, SideA, Tie, SideB, SideA]).expect("switch");
        assert_eq!(m.detail, MotifDetail::CamouflagedSwitch { side: SideA });
        assert!(camouflaged_switch(&[SideB, Tie, SideA, SideB]).is_some());
    }

    #[test]
    fn camouflaged_switch_needs_tie_and_opposite() {
        assert!(camouflaged_switch(&[SideA, SideB, SideB, SideA]).is_none());
        assert!(camouflaged_switch(&[SideA, Tie, SideA, SideA]).is_none());
        assert!(camouflaged_switch(&[SideA, Tie, Tie, Tie]).is_none());
        assert!(camouflaged_switch(&[Tie, SideB, SideA]).is_none());
    }
}
