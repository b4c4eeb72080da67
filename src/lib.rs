//! GrantCraft: deterministic reviewer for grant proposal drafts
//!
//! Draft text + scheme descriptor → structure checks → criterion scores →
//! gap analysis → self-describing `ReviewerReport` (structured + Markdown).

pub mod config;
pub mod core;
pub mod error;
pub mod telemetry;
pub mod types;

pub use crate::core::score;

// =============================================================================
// SIGNAL CLASSIFICATION
// =============================================================================

/// Signals at or above this confidence are reported as strengths
pub const STRENGTH_CONFIDENCE: f64 = 0.65;

/// Signals below this confidence are reported as weaknesses (required signals always are)
pub const WEAKNESS_CONFIDENCE: f64 = 0.40;

/// Signals below this confidence become missing items
pub const MISSING_CONFIDENCE_FLOOR: f64 = 0.40;

/// Confidence a missing signal is assumed to reach when estimating its score impact
pub const SIMULATED_TARGET_CONFIDENCE: f64 = 0.75;

/// Highest score a criterion can reach
pub const MAX_CRITERION_SCORE: f64 = 5.0;

/// Per-criterion signal weights must sum to 1.0 within this tolerance
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

// =============================================================================
// STRUCTURE RULES
// =============================================================================

/// Drafts below this word count are penalised on every criterion
pub const MIN_WORD_COUNT: usize = 500;

/// Applied to the owning criterion when its section heading is missing
pub const PENALTY_MISSING_HEADING: f64 = -0.05;

/// Applied to every criterion when sections are out of order
pub const PENALTY_SECTION_ORDER: f64 = -0.02;

/// Applied to every criterion when the draft is below MIN_WORD_COUNT
pub const PENALTY_SHORT_DRAFT: f64 = -0.10;

// =============================================================================
// EVIDENCE & ACTION PLAN
// =============================================================================

/// Maximum evidence excerpts kept per signal
pub const EVIDENCE_MAX_SNIPPETS: usize = 3;

/// Maximum characters per evidence excerpt (ellipsis included)
pub const EVIDENCE_MAX_CHARS: usize = 120;

/// The action plan never lists more than this many items
pub const MAX_ACTION_ITEMS: usize = 8;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
