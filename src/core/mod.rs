//! Core modules for GrantCraft

pub mod api;
pub mod catalogue;
pub mod gaps;
pub mod render;
pub mod report;
pub mod rubric;
pub mod scorer;
pub mod structure;

pub use api::{create_router, run_server};
pub use catalogue::{catalogue, sat, Signal, SignalCatalogue, SignalCheck};
pub use gaps::{simulated_score_delta, GapAnalyzer};
pub use render::MarkdownRenderer;
pub use report::{draft_digest, score, ReportAssembler};
pub use scorer::{score_from_coverage, CriterionScorer};
pub use structure::{count_sections, count_words, StructureChecker};
