//! Structure Checker: whole-document rules independent of any signal
//!
//! Rules, in output order:
//! - one heading-presence rule per section (penalises its own criterion)
//! - section order Excellence → Impact → Implementation (penalises all)
//! - minimum word count (penalises all)

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::types::{CriterionId, StructureCheckResult, StructurePenalties, StructureReport};
use crate::{MIN_WORD_COUNT, PENALTY_MISSING_HEADING, PENALTY_SECTION_ORDER, PENALTY_SHORT_DRAFT};

lazy_static! {
    // =========================================================================
    // Section headings tolerate numbering ("## 1. Excellence") and
    // section-word prefixes ("# Section 2: Impact")
    // =========================================================================
    static ref RE_EXCELLENCE_HEADING: Regex = Regex::new(
        r"(?im)^#+\s*(?:1[.\s]\s*|Section\s+1\s*[.:]?\s*)?Excellence\b"
    ).unwrap();
    static ref RE_IMPACT_HEADING: Regex = Regex::new(
        r"(?im)^#+\s*(?:2[.\s]\s*|Section\s+2\s*[.:]?\s*)?Impact\b"
    ).unwrap();
    static ref RE_IMPLEMENTATION_HEADING: Regex = Regex::new(
        r"(?im)^#+\s*(?:3[.\s]\s*|Section\s+3\s*[.:]?\s*)?Implementation\b"
    ).unwrap();

    static ref RE_ANY_HEADING: Regex = Regex::new(r"(?m)^#+\s+.+").unwrap();
}

fn heading_pattern(criterion: CriterionId) -> &'static Regex {
    match criterion {
        CriterionId::Excellence => &RE_EXCELLENCE_HEADING,
        CriterionId::Impact => &RE_IMPACT_HEADING,
        CriterionId::Implementation => &RE_IMPLEMENTATION_HEADING,
    }
}

/// Whitespace-separated tokens
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Markdown heading lines
pub fn count_sections(text: &str) -> usize {
    RE_ANY_HEADING.find_iter(text).count()
}

/// Runs the fixed structural rule set
#[derive(Debug, Default)]
pub struct StructureChecker;

impl StructureChecker {
    pub fn new() -> Self {
        Self
    }

    pub fn check(&self, draft: &str) -> StructureReport {
        let mut checks = Vec::with_capacity(5);
        let mut penalties = StructurePenalties::default();
        let mut positions: Vec<Option<usize>> = Vec::with_capacity(3);

        for criterion in CriterionId::ALL {
            let found = heading_pattern(criterion).find(draft).map(|m| m.start());
            positions.push(found);
            let present = found.is_some();
            checks.push(StructureCheckResult {
                id: format!("has_{}_heading", criterion.as_str()),
                label: format!(
                    "Section {} ({}) heading present",
                    criterion.section_number(),
                    criterion.title()
                ),
                present,
                detail: if present {
                    "Heading found.".to_string()
                } else {
                    "Heading not found; section may be missing or mis-titled.".to_string()
                },
            });
            if !present {
                penalties.add(criterion, PENALTY_MISSING_HEADING);
            }
        }

        let order_correct = match positions.as_slice() {
            [Some(excellence), Some(impact), Some(implementation)] => {
                excellence < impact && impact < implementation
            }
            _ => false,
        };
        checks.push(StructureCheckResult {
            id: "section_order_correct".to_string(),
            label: "Sections in correct order (Excellence → Impact → Implementation)".to_string(),
            present: order_correct,
            detail: if order_correct {
                "Sections appear in the expected order.".to_string()
            } else {
                "Sections are missing or appear out of order; reviewers may be disoriented."
                    .to_string()
            },
        });
        if !order_correct {
            penalties.add_all(PENALTY_SECTION_ORDER);
        }

        let word_count = count_words(draft);
        let long_enough = word_count >= MIN_WORD_COUNT;
        checks.push(StructureCheckResult {
            id: "minimum_word_count".to_string(),
            label: format!(
                "Draft meets minimum word count ({} words, minimum {})",
                word_count, MIN_WORD_COUNT
            ),
            present: long_enough,
            detail: if long_enough {
                format!("Draft has {} words; adequate length for analysis.", word_count)
            } else {
                format!(
                    "Draft has only {} words; too thin for meaningful scoring. Most sections appear empty.",
                    word_count
                )
            },
        });
        if !long_enough {
            penalties.add_all(PENALTY_SHORT_DRAFT);
        }

        debug!(
            word_count,
            order_correct,
            excellence = penalties.excellence,
            impact = penalties.impact,
            implementation = penalties.implementation,
            "structure checked"
        );

        StructureReport {
            checks,
            penalties,
            word_count,
            section_count: count_sections(draft),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
