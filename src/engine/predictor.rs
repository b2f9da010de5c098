//! Next-symbol predictor
//!
//! Rules are evaluated in a fixed priority order (`PredictionRule::CASCADE`).
//! Every applicable rule casts a vote; the plain predictor takes the first vote,
//! the adaptive predictor takes the vote with the highest weighted confidence.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::detectors::{frequency, MotifDetail, MotifKind, PatternMatch};
use super::risk::RiskAssessment;
use super::weights::MotifWeights;
use crate::domain::Symbol;

pub const MIN_CONFIDENCE: u8 = 40;
pub const MAX_CONFIDENCE: u8 = 95;

const TIE_ANCHOR_BASE: i32 = 85;
const STREAK_BASE: i32 = 50;
const STREAK_CAP: i32 = 90;
const STREAK_CONTINUATION: i32 = 65;
const MIRROR_BASE: i32 = 78;
const MIRROR_FLOOR: i32 = 70;
const DOMINANCE_BASE: i32 = 50;
const FALLBACK_BASE: i32 = 55;

/// Prediction rules in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionRule {
    TieAnchor,
    Streak,
    MirroredCycle,
    FrequencyDominance,
    AlternationFallback,
}

impl PredictionRule {
    pub const CASCADE: [PredictionRule; 5] = [
        PredictionRule::TieAnchor,
        PredictionRule::Streak,
        PredictionRule::MirroredCycle,
        PredictionRule::FrequencyDominance,
        PredictionRule::AlternationFallback,
    ];

    /// Motif that triggers the rule; the fallback has none
    pub fn motif(&self) -> Option<MotifKind> {
        match self {
            PredictionRule::TieAnchor => Some(MotifKind::TieAnchor),
            PredictionRule::Streak => Some(MotifKind::Streak),
            PredictionRule::MirroredCycle => Some(MotifKind::MirroredCycle),
            PredictionRule::FrequencyDominance => Some(MotifKind::FrequencyDominance),
            PredictionRule::AlternationFallback => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionRule::TieAnchor => "tie_anchor",
            PredictionRule::Streak => "streak",
            PredictionRule::MirroredCycle => "mirrored_cycle",
            PredictionRule::FrequencyDominance => "frequency_dominance",
            PredictionRule::AlternationFallback => "alternation_fallback",
        }
    }
}

impl std::fmt::Display for PredictionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single rule's opinion about the next round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub rule: PredictionRule,
    pub symbol: Symbol,
    pub confidence: u8,
}

impl Vote {
    fn distribution(&self) -> [f64; 3] {
        let p = f64::from(self.confidence) / 100.0;
        let mut dist = [(1.0 - p) / 2.0; 3];
        dist[self.symbol.index()] = p;
        dist
    }
}

/// Probability over the next symbol
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub side_a: f64,
    pub side_b: f64,
    pub tie: f64,
}

impl Distribution {
    pub fn get(&self, symbol: Symbol) -> f64 {
        match symbol {
            Symbol::SideA => self.side_a,
            Symbol::SideB => self.side_b,
            Symbol::Tie => self.tie,
        }
    }

    /// Weighted mixture of vote distributions, normalized to sum to 1
    fn mix(votes: &[Vote], weights: &MotifWeights) -> Self {
        let mut acc = [0.0f64; 3];
        for vote in votes {
            let w = weights.weight(vote.rule).to_f64().unwrap_or(1.0);
            for (slot, p) in acc.iter_mut().zip(vote.distribution()) {
                *slot += w * p;
            }
        }
        let total: f64 = acc.iter().sum();
        if total <= 0.0 {
            return Self {
                side_a: 1.0 / 3.0,
                side_b: 1.0 / 3.0,
                tie: 1.0 / 3.0,
            };
        }
        Self {
            side_a: acc[0] / total,
            side_b: acc[1] / total,
            tie: acc[2] / total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub symbol: Symbol,
    pub confidence: u8,
    pub rule: PredictionRule,
    pub distribution: Distribution,
}

fn clamp_confidence(raw: i32) -> u8 {
    raw.clamp(i32::from(MIN_CONFIDENCE), i32::from(MAX_CONFIDENCE)) as u8
}

fn find_detail(matches: &[PatternMatch], kind: MotifKind) -> Option<&MotifDetail> {
    matches.iter().find(|m| m.kind == kind).map(|m| &m.detail)
}

/// Side opposite the newest non-tie symbol; SideA when only ties were seen
fn opposite_of_last_side(seq: &[Symbol]) -> Symbol {
    seq.iter()
        .rev()
        .find_map(|s| s.opposite())
        .unwrap_or(Symbol::SideA)
}

/// The side to back when a symbol dominates the trailing window
fn non_dominant_side(seq: &[Symbol], dominant: Symbol, window: usize) -> Symbol {
    if let Some(opposite) = dominant.opposite() {
        return opposite;
    }
    let recent = &seq[seq.len().saturating_sub(window)..];
    let counts = frequency::counts(recent);
    let (a, b) = (counts[Symbol::SideA.index()], counts[Symbol::SideB.index()]);
    match a.cmp(&b) {
        std::cmp::Ordering::Less => Symbol::SideA,
        std::cmp::Ordering::Greater => Symbol::SideB,
        std::cmp::Ordering::Equal => opposite_of_last_side(seq),
    }
}

fn vote_for(
    rule: PredictionRule,
    seq: &[Symbol],
    matches: &[PatternMatch],
    risk: &RiskAssessment,
) -> Option<Vote> {
    let level = i32::from(risk.level.value());
    let (symbol, raw) = match rule {
        PredictionRule::TieAnchor => match find_detail(matches, MotifKind::TieAnchor)? {
            MotifDetail::TieAnchor { before, .. } => {
                (before.opposite()?, TIE_ANCHOR_BASE - 2 * level)
            }
            _ => return None,
        },
        PredictionRule::Streak => match find_detail(matches, MotifKind::Streak)? {
            MotifDetail::Streak { symbol, length } if *length >= 3 => {
                let length = (*length).min(100) as i32;
                (
                    symbol.opposite()?,
                    STREAK_CAP.min(STREAK_BASE + 10 * length),
                )
            }
            MotifDetail::Streak { symbol, .. } => (*symbol, STREAK_CONTINUATION),
            _ => return None,
        },
        PredictionRule::MirroredCycle => {
            find_detail(matches, MotifKind::MirroredCycle)?;
            (Symbol::Tie, MIRROR_FLOOR.max(MIRROR_BASE - level))
        }
        PredictionRule::FrequencyDominance => {
            match find_detail(matches, MotifKind::FrequencyDominance)? {
                MotifDetail::FrequencyDominance {
                    symbol,
                    share,
                    window,
                } => {
                    let imbalance = ((share - frequency::DOMINANCE_SHARE) * 100.0).round() as i32;
                    (
                        non_dominant_side(seq, *symbol, *window),
                        DOMINANCE_BASE + imbalance,
                    )
                }
                _ => return None,
            }
        }
        PredictionRule::AlternationFallback => {
            if seq.is_empty() {
                return None;
            }
            (
                opposite_of_last_side(seq),
                i32::from(MIN_CONFIDENCE).max(FALLBACK_BASE - 2 * (level - 1)),
            )
        }
    };

    Some(Vote {
        rule,
        symbol,
        confidence: clamp_confidence(raw),
    })
}

/// Votes of every applicable rule, in cascade order.
///
/// The fallback only votes when no structural rule applies.
pub fn votes(seq: &[Symbol], matches: &[PatternMatch], risk: &RiskAssessment) -> Vec<Vote> {
    let structural: Vec<Vote> = PredictionRule::CASCADE
        .iter()
        .filter(|rule| rule.motif().is_some())
        .filter_map(|&rule| vote_for(rule, seq, matches, risk))
        .collect();

    if !structural.is_empty() {
        return structural;
    }
    vote_for(PredictionRule::AlternationFallback, seq, matches, risk)
        .into_iter()
        .collect()
}

/// Plain decision list: the first applicable rule decides
pub fn predict(
    seq: &[Symbol],
    matches: &[PatternMatch],
    risk: &RiskAssessment,
) -> Option<Prediction> {
    let votes = votes(seq, matches, risk);
    let first = *votes.first()?;
    Some(Prediction {
        symbol: first.symbol,
        confidence: first.confidence,
        rule: first.rule,
        distribution: Distribution::mix(&votes, &MotifWeights::default()),
    })
}

/// Weighted ensemble: the vote maximizing `weight * confidence` decides.
///
/// Equal scores resolve in cascade order. The winning confidence is scaled by its
/// weight, rounded half away from zero and clamped.
pub fn predict_adaptive(
    seq: &[Symbol],
    matches: &[PatternMatch],
    risk: &RiskAssessment,
    weights: &MotifWeights,
) -> Option<Prediction> {
    let votes = votes(seq, matches, risk);

    let mut best: Option<(Decimal, Vote)> = None;
    for vote in &votes {
        let score = Decimal::from(vote.confidence) * weights.weight(vote.rule);
        if best.map_or(true, |(top, _)| score > top) {
            best = Some((score, *vote));
        }
    }
    let (score, winner) = best?;

    let confidence = score
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i32()
        .map(clamp_confidence)
        .unwrap_or(MAX_CONFIDENCE);

    Some(Prediction {
        symbol: winner.symbol,
        confidence,
        rule: winner.rule,
        distribution: Distribution::mix(&votes, weights),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::detectors::detect;
    use crate::engine::risk::classify;
    use rust_decimal_macros::dec;
    use Symbol::*;

    fn run(seq: &[Symbol]) -> Prediction {
        let matches = detect(seq);
        let risk = classify(seq, &matches);
        predict(seq, &matches, &risk).expect("prediction")
    }

    #[test]
    fn long_streak_predicts_reversal() {
        let p = run(&[SideA, SideA, SideA, SideA]);
        assert_eq!(p.rule, PredictionRule::Streak);
        assert_eq!(p.symbol, SideB);
        assert_eq!(p.confidence, 90);
    }

    #[test]
    fn pair_predicts_continuation() {
        let p = run(&[Tie, SideB, SideB]);
        assert_eq!(p.rule, PredictionRule::Streak);
        assert_eq!(p.symbol, SideB);
        assert_eq!(p.confidence, 65);
    }

    #[test]
    fn tie_anchor_outranks_streak() {
        // A T B B : anchor and a streak of two
        let seq = [SideA, Tie, SideB, SideB];
        let p = run(&seq);
        assert_eq!(p.rule, PredictionRule::TieAnchor);
        assert_eq!(p.symbol, SideB);
    }

    #[test]
    fn tie_anchor_confidence_drops_with_level() {
        let seq = [SideA, Tie, SideB];
        let matches = detect(&seq);
        let risk = classify(&seq, &matches);
        let p = predict(&seq, &matches, &risk).unwrap();
        let expected = 85 - 2 * i32::from(risk.level.value());
        assert_eq!(i32::from(p.confidence), expected.max(40));
    }

    #[test]
    fn mirrored_cycle_predicts_tie() {
        // A B B A B B A : trailing A B B A mirrors, newest run is a single A
        let seq = [SideA, SideB, SideB, SideA, SideB, SideB, SideA];
        let p = run(&seq);
        assert_eq!(p.rule, PredictionRule::MirroredCycle);
        assert_eq!(p.symbol, Tie);
        assert!((70..=78).contains(&p.confidence));
    }

    #[test]
    fn dominant_tie_backs_the_rarer_side() {
        let seq = [SideB, Tie, Tie, Tie, Tie, Tie];
        let matches = detect(&seq);
        let risk = classify(&seq, &matches);
        let vote = vote_for(PredictionRule::FrequencyDominance, &seq, &matches, &risk)
            .expect("dominance vote");
        assert_eq!(vote.symbol, SideA);
        // share 5/6 -> 50 + 13
        assert_eq!(vote.confidence, 63);
    }

    #[test]
    fn fallback_opposes_last_side() {
        let seq = [SideB, Tie, Tie];
        let p = run(&seq);
        assert_eq!(p.rule, PredictionRule::AlternationFallback);
        assert_eq!(p.symbol, SideA);
        assert!(p.confidence >= MIN_CONFIDENCE);

        let p = run(&[SideA, SideB, SideA]);
        assert_eq!(p.rule, PredictionRule::AlternationFallback);
        assert_eq!(p.symbol, SideB);
        assert_eq!(p.confidence, 55);
    }

    #[test]
    fn only_ties_fall_back_to_side_a() {
        assert_eq!(opposite_of_last_side(&[Tie, Tie]), SideA);
    }

    #[test]
    fn confidence_always_within_bounds() {
        let seqs: [&[Symbol]; 5] = [
            &[SideA; 12],
            &[Tie; 9],
            &[SideA, SideB, SideA, SideB, SideA, SideB],
            &[SideB, Tie, Tie, SideA, Tie, SideB, Tie],
            &[SideA, SideA, SideB, SideB, SideA, SideA, SideB, SideB],
        ];
        for seq in seqs {
            let p = run(seq);
            assert!(
                (MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&p.confidence),
                "{seq:?} -> {}",
                p.confidence
            );
            let sum = p.distribution.side_a + p.distribution.side_b + p.distribution.tie;
            assert!((sum - 1.0).abs() < 1e-9, "sum={sum}");
        }
    }

    #[test]
    fn predict_is_pure() {
        let seq = [SideA, Tie, SideB, SideB, SideA];
        assert_eq!(run(&seq), run(&seq));
    }

    #[test]
    fn adaptive_weights_reorder_votes() {
        // Tie anchor and streak both vote; demoting the anchor hands the win to the streak
        let seq = [SideA, Tie, SideB, SideB, SideB];
        let matches = detect(&seq);
        let risk = classify(&seq, &matches);

        let plain = predict(&seq, &matches, &risk).unwrap();
        assert_eq!(plain.rule, PredictionRule::TieAnchor);

        let weights = MotifWeights::default()
            .with_weight(PredictionRule::TieAnchor, dec!(0.5))
            .with_weight(PredictionRule::Streak, dec!(1.2));
        let adaptive = predict_adaptive(&seq, &matches, &risk, &weights).unwrap();
        assert_eq!(adaptive.rule, PredictionRule::Streak);
        assert_eq!(adaptive.symbol, SideA);
        // 80 * 1.2 = 96 -> clamped
        assert_eq!(adaptive.confidence, MAX_CONFIDENCE);
        assert!(adaptive.distribution.side_a > plain.distribution.side_a);
    }

    #[test]
    fn dominance_decides_when_nothing_structural_applies() {
        // 8 of 10 are A and the newest B ends no streak
        let seq = [SideA, SideA, SideA, SideB, SideA, SideA, SideA, SideA, SideA, SideB];
        let p = run(&seq);
        assert_eq!(p.rule, PredictionRule::FrequencyDominance);
        assert_eq!(p.symbol, SideB);
        assert_eq!(p.confidence, 60);
    }

    #[test]
    fn demoted_streak_hands_the_win_to_dominance() {
        let seq = [SideA, SideB, SideA, SideA, SideA, SideA, SideA, SideA, SideA, SideA];
        let matches = detect(&seq);
        let risk = classify(&seq, &matches);
        assert_eq!(predict(&seq, &matches, &risk).unwrap().rule, PredictionRule::Streak);

        // streak 90 * 0.5 = 45 loses to dominance 70 * 1.0
        let weights = MotifWeights::default().with_weight(PredictionRule::Streak, dec!(0.5));
        let p = predict_adaptive(&seq, &matches, &risk, &weights).unwrap();
        assert_eq!(p.rule, PredictionRule::FrequencyDominance);
        assert_eq!(p.symbol, SideB);
        assert_eq!(p.confidence, 70);
    }

    #[test]
    fn floored_weight_clamps_to_minimum_confidence() {
        let seq = [Tie, SideB, SideB];
        let matches = detect(&seq);
        let risk = classify(&seq, &matches);
        let weights = MotifWeights::default().with_weight(PredictionRule::Streak, dec!(0.5));
        let p = predict_adaptive(&seq, &matches, &risk, &weights).unwrap();
        assert_eq!(p.rule, PredictionRule::Streak);
        // 65 * 0.5 = 32.5
        assert_eq!(p.confidence, MIN_CONFIDENCE);
    }

    #[test]
    fn weighted_confidence_rounds_half_away_from_zero() {
        let seq = [SideA, SideB, SideA];
        let matches = detect(&seq);
        let risk = classify(&seq, &matches);
        let weights =
            MotifWeights::default().with_weight(PredictionRule::AlternationFallback, dec!(1.5));
        let p = predict_adaptive(&seq, &matches, &risk, &weights).unwrap();
        // 55 * 1.5 = 82.5
        assert_eq!(p.confidence, 83);
    }
}
