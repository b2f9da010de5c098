//! Pattern engine (no session state, no IO).
//!
//! Pipeline per mutation: detectors -> risk classifier -> predictor ->
//! recommendation policy. The result is a whole `AnalysisSnapshot` value.

pub mod detectors;
pub mod predictor;
pub mod recommendation;
pub mod risk;
pub mod weights;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Symbol;

pub use detectors::{detect, MotifDetail, MotifKind, PatternMatch};
pub use predictor::{predict, predict_adaptive, Distribution, Prediction, PredictionRule};
pub use recommendation::{recommend, Recommendation};
pub use risk::{classify, RiskAssessment, RiskLevel, RiskTag, RiskTier};
pub use weights::MotifWeights;

/// Knobs the pipeline needs from the session configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisParams {
    /// Minimum history before the pipeline runs
    pub min_history: usize,
    /// Trailing window scored by the risk classifier
    pub analysis_window: usize,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            min_history: 3,
            analysis_window: 27,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSnapshot {
    pub matches: Vec<PatternMatch>,
    pub risk: RiskAssessment,
    pub prediction: Option<Prediction>,
    /// Confidence of the prediction, 0 when there is none
    pub confidence: u8,
    pub recommendation: Recommendation,
    pub history_len: usize,
    pub insufficient_data: bool,
    pub computed_at: DateTime<Utc>,
}

impl AnalysisSnapshot {
    /// The "no pattern yet" snapshot
    pub fn insufficient(history_len: usize) -> Self {
        Self {
            matches: Vec::new(),
            risk: RiskAssessment::default(),
            prediction: None,
            confidence: 0,
            recommendation: Recommendation::Watch,
            history_len,
            insufficient_data: true,
            computed_at: Utc::now(),
        }
    }

    pub fn predicted_symbol(&self) -> Option<Symbol> {
        self.prediction.as_ref().map(|p| p.symbol)
    }

    pub fn predicted_rule(&self) -> Option<PredictionRule> {
        self.prediction.as_ref().map(|p| p.rule)
    }
}

/// Run the full pipeline over `seq` (oldest first).
///
/// `weights` switches the predictor to the adaptive ensemble.
pub fn analyze(
    seq: &[Symbol],
    params: &AnalysisParams,
    weights: Option<&MotifWeights>,
) -> AnalysisSnapshot {
    if seq.len() < params.min_history.max(detectors::MIN_DETECT_LEN) {
        return AnalysisSnapshot::insufficient(seq.len());
    }

    let window = &seq[seq.len().saturating_sub(params.analysis_window)..];
    let matches = detect(seq);
    let risk = classify(window, &matches);
    let prediction = match weights {
        Some(weights) => predict_adaptive(seq, &matches, &risk, weights),
        None => predict(seq, &matches, &risk),
    };
    let confidence = prediction.as_ref().map_or(0, |p| p.confidence);
    let recommendation = recommend(risk.level, confidence, &risk.tags);

    AnalysisSnapshot {
        matches,
        risk,
        prediction,
        confidence,
        recommendation,
        history_len: seq.len(),
        insufficient_data: false,
        computed_at: Utc::now(),
    }
}
