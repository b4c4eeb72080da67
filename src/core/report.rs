//! Report Assembler: one pure pass from draft text to `ReviewerReport`

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::core::gaps::GapAnalyzer;
use crate::core::render::MarkdownRenderer;
use crate::core::scorer::CriterionScorer;
use crate::core::structure::StructureChecker;
use crate::error::ScoringError;
use crate::types::{CriterionAssessment, CriterionId, ReviewerReport, SchemeDescriptor};

/// Score a draft against a scheme, stamped with the current time
pub fn score(draft: &str, scheme: &SchemeDescriptor) -> Result<ReviewerReport, ScoringError> {
    ReportAssembler::new().generate(draft, scheme)
}

/// Hex SHA-256 of the draft text
pub fn draft_digest(draft: &str) -> String {
    let hash = Sha256::digest(draft.as_bytes());
    hash.iter().map(|b| format!("{:02x}", b)).collect()
}

#[derive(Debug, Default)]
pub struct ReportAssembler {
    structure: StructureChecker,
    scorer: CriterionScorer,
    gaps: GapAnalyzer,
    renderer: MarkdownRenderer,
}

impl ReportAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble with `Utc::now()` as the generation timestamp
    pub fn generate(
        &self,
        draft: &str,
        scheme: &SchemeDescriptor,
    ) -> Result<ReviewerReport, ScoringError> {
        self.assemble(draft, scheme, Utc::now())
    }

    /// Deterministic: identical inputs give an identical report, markdown included
    pub fn assemble(
        &self,
        draft: &str,
        scheme: &SchemeDescriptor,
        generated_at: DateTime<Utc>,
    ) -> Result<ReviewerReport, ScoringError> {
        let structure = self.structure.check(draft);

        let criteria = CriterionId::ALL
            .iter()
            .map(|&criterion| {
                self.scorer
                    .score(criterion, draft, scheme, structure.penalties.get(criterion))
            })
            .collect::<Result<Vec<CriterionAssessment>, ScoringError>>()?;

        let total: f64 = criteria.iter().map(|c| c.score).sum();
        let overall_score = (total * 10.0).round() / 10.0;
        let overall_max_score: f64 = criteria.iter().map(|c| c.max_score).sum();
        let overall_threshold = scheme.overall_threshold();
        let overall_passed =
            criteria.iter().all(|c| c.passed) && overall_score >= overall_threshold;

        let all_strengths = prefixed(&criteria, |c| &c.strengths);
        let all_weaknesses = prefixed(&criteria, |c| &c.weaknesses);

        let missing_items = self.gaps.missing_items(&criteria);
        let action_items = self.gaps.action_items(&criteria, &missing_items);

        debug!(
            scheme = %scheme.id,
            overall_score,
            overall_passed,
            missing = missing_items.len(),
            actions = action_items.len(),
            "report assembled"
        );

        let mut report = ReviewerReport {
            generated_at,
            scheme_id: scheme.id.clone(),
            scheme_name: scheme.name.clone(),
            draft_digest: draft_digest(draft),
            draft_word_count: structure.word_count,
            draft_section_count: structure.section_count,
            structure_checks: structure.checks,
            criteria,
            overall_score,
            overall_max_score,
            overall_threshold,
            overall_passed,
            all_strengths,
            all_weaknesses,
            missing_items,
            action_items,
            markdown_report: String::new(),
        };
        report.markdown_report = self.renderer.render(&report);
        Ok(report)
    }
}

/// Flatten bullets across criteria as "[Title] bullet"
fn prefixed<F>(criteria: &[CriterionAssessment], pick: F) -> Vec<String>
where
    F: Fn(&CriterionAssessment) -> &Vec<String>,
{
    criteria
        .iter()
        .flat_map(|c| pick(c).iter().map(move |b| format!("[{}] {}", c.title, b)))
        .collect()
}
