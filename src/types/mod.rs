//! Core types for GrantCraft

mod assessment;
mod criterion;
mod gaps;
mod report;
mod scheme;
mod signals;
mod structure;

pub use assessment::CriterionAssessment;
pub use criterion::{CriterionId, Severity, Urgency};
pub use gaps::{ActionItem, MissingItem};
pub use report::ReviewerReport;
pub use scheme::{SchemeCriterion, SchemeDescriptor, DEFAULT_SCHEME_ID};
pub use signals::{RawCheckResult, SignalResult};
pub use structure::{StructureCheckResult, StructurePenalties, StructureReport};
