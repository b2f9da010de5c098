//! Session controller: owns one outcome history, its adaptive weights and the
//! latest analysis snapshot.

pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::domain::{Outcome, OutcomeSequence, Symbol};
use crate::engine::{self, AnalysisSnapshot, MotifWeights, Prediction};
use crate::error::Result;

pub use store::SessionStore;

/// Running hit count of predictions checked against the next outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionStats {
    pub checked: u32,
    pub hits: u32,
}

impl PredictionStats {
    pub fn hit_rate(&self) -> Option<f64> {
        (self.checked > 0).then(|| f64::from(self.hits) / f64::from(self.checked))
    }
}

/// Serializable read-only view of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub capacity: usize,
    pub history: Vec<Outcome>,
    pub snapshot: AnalysisSnapshot,
    pub weights: MotifWeights,
    pub stats: PredictionStats,
}

pub struct Session {
    id: Uuid,
    created_at: DateTime<Utc>,
    config: SessionConfig,
    history: OutcomeSequence,
    weights: MotifWeights,
    /// Prediction awaiting the next outcome
    pending: Option<Prediction>,
    snapshot: AnalysisSnapshot,
    stats: PredictionStats,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            history: OutcomeSequence::new(config.capacity),
            weights: MotifWeights::default(),
            pending: None,
            snapshot: AnalysisSnapshot::insufficient(0),
            stats: PredictionStats::default(),
            config,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn snapshot(&self) -> &AnalysisSnapshot {
        &self.snapshot
    }

    pub fn history(&self) -> &OutcomeSequence {
        &self.history
    }

    pub fn weights(&self) -> &MotifWeights {
        &self.weights
    }

    pub fn stats(&self) -> PredictionStats {
        self.stats
    }

    /// Record an outcome, settle the pending prediction and recompute.
    pub fn append(&mut self, symbol: Symbol) -> &AnalysisSnapshot {
        if let Some(pending) = self.pending.take() {
            let was_correct = pending.symbol == symbol;
            self.stats.checked += 1;
            if was_correct {
                self.stats.hits += 1;
            }
            if self.config.adaptive {
                self.weights = self.weights.apply_feedback(pending.rule, was_correct);
            }
            debug!(
                session = %self.id,
                rule = %pending.rule,
                predicted = %pending.symbol,
                actual = %symbol,
                was_correct,
                "prediction settled"
            );
        }

        if let Some(evicted) = self.history.push(symbol) {
            debug!(session = %self.id, evicted = %evicted.symbol, "history at capacity, evicted oldest");
        }
        debug!(session = %self.id, history = %self.history.to_code_string(), "outcome recorded");
        self.recompute()
    }

    /// Parse and append a raw symbol. Rejected input leaves the session untouched.
    pub fn append_str(&mut self, raw: &str) -> Result<&AnalysisSnapshot> {
        match raw.parse::<Symbol>() {
            Ok(symbol) => Ok(self.append(symbol)),
            Err(e) => {
                warn!(session = %self.id, input = raw, "rejected symbol");
                Err(e)
            }
        }
    }

    /// Remove the newest outcome. Weights are not rolled back.
    pub fn undo(&mut self) -> Option<Symbol> {
        let removed = self.history.pop()?;
        debug!(session = %self.id, removed = %removed.symbol, "undo");
        self.recompute();
        Some(removed.symbol)
    }

    /// Empty the history and reset weights, statistics and the pending prediction.
    pub fn clear(&mut self) {
        self.history.clear();
        self.weights = MotifWeights::default();
        self.pending = None;
        self.stats = PredictionStats::default();
        self.snapshot = AnalysisSnapshot::insufficient(0);
        debug!(session = %self.id, "cleared");
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id,
            created_at: self.created_at,
            capacity: self.history.capacity(),
            history: self.history.outcomes().copied().collect(),
            snapshot: self.snapshot.clone(),
            weights: self.weights.clone(),
            stats: self.stats,
        }
    }

    fn recompute(&mut self) -> &AnalysisSnapshot {
        let symbols = self.history.symbols();
        let weights = self.config.adaptive.then_some(&self.weights);
        let snapshot = engine::analyze(&symbols, &self.config.analysis_params(), weights);

        self.pending = snapshot.prediction.clone();
        self.snapshot = snapshot;
        &self.snapshot
    }
}
