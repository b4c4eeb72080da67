//! Per-criterion assessment

use serde::{Deserialize, Serialize};

use crate::types::{CriterionId, SignalResult};

/// Score and explanation for one criterion. Built once per scoring call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionAssessment {
    pub criterion: CriterionId,
    pub title: String,
    /// 0 to 5 in 0.5 steps
    pub score: f64,
    pub threshold: f64,
    pub max_score: f64,
    pub passed: bool,
    /// Σ(weight × confidence) / Σ(weight)
    pub raw_coverage: f64,
    /// raw coverage + structure adjustment, clamped to [0, 1]
    pub adjusted_coverage: f64,
    /// Signed structure penalty applied to the raw coverage
    pub structure_adjustment: f64,
    /// Line-by-line recomputation of the score
    pub derivation: String,
    /// Rubric-aligned rationale for the score
    pub rationale: String,
    pub signals: Vec<SignalResult>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

impl CriterionAssessment {
    /// Look up one of this criterion's signal results
    pub fn signal(&self, signal_id: &str) -> Option<&SignalResult> {
        self.signals.iter().find(|s| s.signal_id == signal_id)
    }
}
