//! Criterion identifiers and the small enums attached to gaps

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ScoringError;

/// The three top-level evaluation criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriterionId {
    Excellence,
    Impact,
    Implementation,
}

impl CriterionId {
    /// Document order of the sections
    pub const ALL: [CriterionId; 3] = [
        CriterionId::Excellence,
        CriterionId::Impact,
        CriterionId::Implementation,
    ];

    /// Stable lowercase key
    pub fn as_str(&self) -> &'static str {
        match self {
            CriterionId::Excellence => "excellence",
            CriterionId::Impact => "impact",
            CriterionId::Implementation => "implementation",
        }
    }

    /// Display title used in headings and prefixes
    pub fn title(&self) -> &'static str {
        match self {
            CriterionId::Excellence => "Excellence",
            CriterionId::Impact => "Impact",
            CriterionId::Implementation => "Implementation",
        }
    }

    /// Section number in the Part B template
    pub fn section_number(&self) -> u8 {
        match self {
            CriterionId::Excellence => 1,
            CriterionId::Impact => 2,
            CriterionId::Implementation => 3,
        }
    }
}

impl std::fmt::Display for CriterionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CriterionId {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "excellence" => Ok(CriterionId::Excellence),
            "impact" => Ok(CriterionId::Impact),
            "implementation" => Ok(CriterionId::Implementation),
            other => Err(ScoringError::UnknownCriterionKey(other.to_string())),
        }
    }
}

/// Whether a missing item blocks the criterion threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Required,
    Recommended,
}

impl Severity {
    /// Sort key: required first
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Required => 0,
            Severity::Recommended => 1,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Severity::Required => "required",
            Severity::Recommended => "recommended",
        };
        write!(f, "{}", name)
    }
}

/// Urgency tier of an action item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// Required content on a criterion that currently fails
    High,
    /// Required content on a criterion that already passes
    Medium,
    /// Recommended content
    Low,
}

impl Urgency {
    /// Sort key: high first
    pub fn rank(&self) -> u8 {
        match self {
            Urgency::High => 0,
            Urgency::Medium => 1,
            Urgency::Low => 2,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Urgency::High => "🔴",
            Urgency::Medium => "🟡",
            Urgency::Low => "🟢",
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Urgency::High => "high",
            Urgency::Medium => "medium",
            Urgency::Low => "low",
        };
        write!(f, "{}", name)
    }
}
