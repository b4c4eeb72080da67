//! Missing items and action plan entries

use serde::{Deserialize, Serialize};

use crate::types::{CriterionId, Severity, Urgency};

/// A content gap derived from a low-confidence signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingItem {
    pub signal_id: String,
    pub label: String,
    pub criterion: CriterionId,
    /// Title the scheme gives the criterion
    pub criterion_title: String,
    pub severity: Severity,
    pub weight: f64,
    pub how_to_fix: String,
    pub time_estimate_minutes: u32,
    /// Score change if this signal alone reached the simulated target confidence
    pub estimated_score_delta: f64,
    pub estimated_score_impact: String,
}

/// One entry of the prioritised action plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    /// 1 = most urgent
    pub priority: usize,
    pub criterion: CriterionId,
    pub section: String,
    pub action: String,
    pub time_estimate_minutes: u32,
    pub score_impact: String,
    pub urgency: Urgency,
    /// estimated score delta per minute of effort
    pub roi: f64,
}
