//! Document-level structure check results

use serde::{Deserialize, Serialize};

use crate::types::CriterionId;

/// Outcome of one structural rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureCheckResult {
    pub id: String,
    pub label: String,
    pub present: bool,
    pub detail: String,
}

/// Coverage adjustment per criterion (zero or negative)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StructurePenalties {
    pub excellence: f64,
    pub impact: f64,
    pub implementation: f64,
}

impl StructurePenalties {
    pub fn get(&self, criterion: CriterionId) -> f64 {
        match criterion {
            CriterionId::Excellence => self.excellence,
            CriterionId::Impact => self.impact,
            CriterionId::Implementation => self.implementation,
        }
    }

    pub fn add(&mut self, criterion: CriterionId, delta: f64) {
        match criterion {
            CriterionId::Excellence => self.excellence += delta,
            CriterionId::Impact => self.impact += delta,
            CriterionId::Implementation => self.implementation += delta,
        }
    }

    pub fn add_all(&mut self, delta: f64) {
        for criterion in CriterionId::ALL {
            self.add(criterion, delta);
        }
    }
}

/// Full output of the structure checker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureReport {
    pub checks: Vec<StructureCheckResult>,
    pub penalties: StructurePenalties,
    pub word_count: usize,
    pub section_count: usize,
}
