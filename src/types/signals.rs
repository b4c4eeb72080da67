//! Signal check results

use serde::{Deserialize, Serialize};

use crate::types::CriterionId;

/// Output of a single signal check function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCheckResult {
    /// Did the signal fire at all (confidence > 0)
    pub found: bool,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// Up to three verbatim excerpts from the draft
    pub evidence: Vec<String>,
    /// Human-readable explanation, including the sub-formula for composite checks
    pub detail: String,
}

impl RawCheckResult {
    /// Build a result; `found` follows from the confidence
    pub fn new(confidence: f64, evidence: Vec<String>, detail: impl Into<String>) -> Self {
        let confidence = confidence.clamp(0.0, 1.0);
        Self {
            found: confidence > 0.0,
            confidence,
            evidence,
            detail: detail.into(),
        }
    }

    /// Nothing detected
    pub fn absent(detail: impl Into<String>) -> Self {
        Self::new(0.0, Vec::new(), detail)
    }
}

/// A raw result merged with the static metadata of its signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalResult {
    pub signal_id: String,
    pub label: String,
    pub description: String,
    pub criterion: CriterionId,
    pub weight: f64,
    pub required_for_threshold: bool,
    pub section_hint: String,
    pub how_to_fix: String,
    pub time_estimate_minutes: u32,
    pub found: bool,
    pub confidence: f64,
    pub evidence: Vec<String>,
    pub detail: String,
}

impl SignalResult {
    /// weight × confidence
    pub fn contribution(&self) -> f64 {
        self.weight * self.confidence
    }
}
