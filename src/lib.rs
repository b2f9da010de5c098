pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod session;

pub use config::AppConfig;
pub use domain::{Outcome, OutcomeSequence, Symbol};
pub use engine::{
    analyze, AnalysisParams, AnalysisSnapshot, MotifKind, MotifWeights, PatternMatch, Prediction,
    PredictionRule, Recommendation, RiskAssessment, RiskLevel, RiskTag,
};
pub use error::{CadenceError, Result};
pub use session::{Session, SessionStore, SessionView};
