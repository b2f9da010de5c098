//! Adaptive per-rule weights.
//!
//! Weights start at 1.0. After the true outcome of a round is known the rule that
//! produced the prediction is rewarded (+0.1, no ceiling) or penalized (-0.1,
//! floored at 0.5). The update is a pure state transition applied by the session
//! owner; the predictor only reads weights.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::predictor::PredictionRule;

pub const DEFAULT_WEIGHT: Decimal = dec!(1.0);
pub const WEIGHT_STEP: Decimal = dec!(0.1);
pub const WEIGHT_FLOOR: Decimal = dec!(0.5);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotifWeights {
    weights: BTreeMap<PredictionRule, Decimal>,
}

impl Default for MotifWeights {
    fn default() -> Self {
        Self {
            weights: PredictionRule::CASCADE
                .iter()
                .map(|&rule| (rule, DEFAULT_WEIGHT))
                .collect(),
        }
    }
}

impl MotifWeights {
    pub fn weight(&self, rule: PredictionRule) -> Decimal {
        self.weights.get(&rule).copied().unwrap_or(DEFAULT_WEIGHT)
    }

    pub fn with_weight(mut self, rule: PredictionRule, weight: Decimal) -> Self {
        self.weights.insert(rule, weight.max(WEIGHT_FLOOR));
        self
    }

    /// `(weights, rule, was_correct) -> weights'`
    pub fn apply_feedback(&self, rule: PredictionRule, was_correct: bool) -> Self {
        let current = self.weight(rule);
        let next = if was_correct {
            current + WEIGHT_STEP
        } else {
            (current - WEIGHT_STEP).max(WEIGHT_FLOOR)
        };
        self.clone().with_weight(rule, next)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PredictionRule, Decimal)> + '_ {
        self.weights.iter().map(|(rule, w)| (*rule, *w))
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_start_at_one() {
        let weights = MotifWeights::default();
        for rule in PredictionRule::CASCADE {
            assert_eq!(weights.weight(rule), dec!(1.0));
        }
        assert!(weights.is_default());
    }

    #[test]
    fn correct_prediction_adds_exactly_a_tenth() {
        let weights = MotifWeights::default().apply_feedback(PredictionRule::Streak, true);
        assert_eq!(weights.weight(PredictionRule::Streak), dec!(1.1));
        assert_eq!(weights.weight(PredictionRule::TieAnchor), dec!(1.0));

        let weights = (0..10).fold(weights, |w, _| w.apply_feedback(PredictionRule::Streak, true));
        assert_eq!(weights.weight(PredictionRule::Streak), dec!(2.1));
    }

    #[test]
    fn incorrect_prediction_is_floored() {
        let mut weights = MotifWeights::default();
        weights = weights.apply_feedback(PredictionRule::Streak, false);
        assert_eq!(weights.weight(PredictionRule::Streak), dec!(0.9));
        for _ in 0..10 {
            weights = weights.apply_feedback(PredictionRule::Streak, false);
        }
        assert_eq!(weights.weight(PredictionRule::Streak), dec!(0.5));
    }

    #[test]
    fn feedback_leaves_input_untouched() {
        let before = MotifWeights::default();
        let after = before.apply_feedback(PredictionRule::MirroredCycle, true);
        assert!(before.is_default());
        assert_ne!(before, after);
    }
}
