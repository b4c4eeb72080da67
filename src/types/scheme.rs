//! Funding scheme descriptors
//!
//! A scheme supplies pass thresholds and maxima only. Signal weights are fixed
//! engine configuration and are not scheme-configurable.

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::types::CriterionId;

/// Identifier of the built-in Horizon Europe scheme
pub const DEFAULT_SCHEME_ID: &str = "horizon_europe_ria_ia";

/// Threshold and maximum for one criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeCriterion {
    pub id: CriterionId,
    pub title: String,
    pub threshold: f64,
    pub max_score: f64,
}

/// Caller-supplied scheme description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeDescriptor {
    pub id: String,
    pub name: String,
    pub criteria: Vec<SchemeCriterion>,
    /// Overall pass threshold; the sum of criterion thresholds when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_threshold: Option<f64>,
}

impl SchemeDescriptor {
    /// Horizon Europe RIA/IA: three criteria, threshold 3/5 each, overall 10/15
    pub fn horizon_europe() -> Self {
        let criterion = |id: CriterionId| SchemeCriterion {
            id,
            title: id.title().to_string(),
            threshold: 3.0,
            max_score: 5.0,
        };
        Self {
            id: DEFAULT_SCHEME_ID.to_string(),
            name: "Horizon Europe RIA/IA".to_string(),
            criteria: CriterionId::ALL.iter().map(|id| criterion(*id)).collect(),
            overall_threshold: Some(10.0),
        }
    }

    /// Fails loudly when the scheme does not define the criterion
    pub fn criterion(&self, id: CriterionId) -> Result<&SchemeCriterion, ScoringError> {
        self.criteria
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| ScoringError::UnknownCriterion {
                criterion: id,
                scheme: self.id.clone(),
            })
    }

    pub fn overall_threshold(&self) -> f64 {
        self.overall_threshold
            .unwrap_or_else(|| self.criteria.iter().map(|c| c.threshold).sum())
    }

    pub fn max_total(&self) -> f64 {
        self.criteria.iter().map(|c| c.max_score).sum()
    }
}
