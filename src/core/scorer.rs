//! Criterion Scorer
//!
//! ```text
//! rawCoverage      = Σ(weight × confidence) / Σ(weight)
//! adjustedCoverage = clamp(rawCoverage + structureAdjustment, 0, 1)
//! score            = clamp(round(adjustedCoverage × 10) / 2, 0, 5)
//! ```
//!
//! Breakpoints: 0.55 → 3.0 (threshold), 0.49 → 2.5, 0.80 → 4.0.

use tracing::debug;

use crate::core::catalogue::{catalogue, SignalCatalogue};
use crate::core::rubric;
use crate::error::ScoringError;
use crate::types::{CriterionAssessment, CriterionId, SchemeDescriptor, SignalResult};
use crate::{MAX_CRITERION_SCORE, STRENGTH_CONFIDENCE, WEAKNESS_CONFIDENCE};

/// Map coverage to a 0–5 score in 0.5 steps; input is clamped to [0, 1] first
pub fn score_from_coverage(coverage: f64) -> f64 {
    if coverage.is_nan() {
        return 0.0;
    }
    let clamped = coverage.clamp(0.0, 1.0);
    ((clamped * 10.0).round() / 2.0).clamp(0.0, MAX_CRITERION_SCORE)
}

/// Scores one criterion at a time against the shared catalogue
#[derive(Debug)]
pub struct CriterionScorer {
    catalogue: &'static SignalCatalogue,
}

impl Default for CriterionScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl CriterionScorer {
    pub fn new() -> Self {
        Self {
            catalogue: catalogue(),
        }
    }

    /// Score `criterion` for `draft`. Fails only when the scheme does not define the criterion.
    pub fn score(
        &self,
        criterion: CriterionId,
        draft: &str,
        scheme: &SchemeDescriptor,
        structure_penalty: f64,
    ) -> Result<CriterionAssessment, ScoringError> {
        let scheme_criterion = scheme.criterion(criterion)?;

        let signals: Vec<SignalResult> = self
            .catalogue
            .for_criterion(criterion)
            .map(|signal| signal.run(draft))
            .collect();

        let total_weight: f64 = signals.iter().map(|s| s.weight).sum();
        let weighted_sum: f64 = signals.iter().map(|s| s.contribution()).sum();
        let raw_coverage = if total_weight > 0.0 {
            weighted_sum / total_weight
        } else {
            0.0
        };

        let adjusted_coverage = (raw_coverage + structure_penalty).clamp(0.0, 1.0);
        let score = score_from_coverage(adjusted_coverage);
        let passed = score >= scheme_criterion.threshold;

        let derivation = derivation(
            &signals,
            weighted_sum,
            total_weight,
            raw_coverage,
            structure_penalty,
            adjusted_coverage,
            score,
        );
        let (strengths, weaknesses) = classify(&signals);

        debug!(
            criterion = criterion.as_str(),
            raw_coverage,
            adjusted_coverage,
            score,
            passed,
            "criterion scored"
        );

        Ok(CriterionAssessment {
            criterion,
            title: scheme_criterion.title.clone(),
            score,
            threshold: scheme_criterion.threshold,
            max_score: scheme_criterion.max_score,
            passed,
            raw_coverage,
            adjusted_coverage,
            structure_adjustment: structure_penalty,
            derivation,
            rationale: rubric::rationale(criterion, score, &scheme_criterion.title),
            signals,
            strengths,
            weaknesses,
        })
    }
}

/// Verbatim recomputation trace: every displayed number feeds the next line
fn derivation(
    signals: &[SignalResult],
    weighted_sum: f64,
    total_weight: f64,
    raw_coverage: f64,
    adjustment: f64,
    adjusted_coverage: f64,
    score: f64,
) -> String {
    let mut lines = vec!["rawCoverage = Σ(weight × confidence) / Σ(weight)".to_string()];
    for s in signals {
        lines.push(format!(
            "  {:<36} w={:.2}  conf={:.3}  → {:.4}",
            s.label,
            s.weight,
            s.confidence,
            s.contribution()
        ));
    }
    lines.push(format!("  {}", "─".repeat(70)));
    lines.push(format!(
        "  Σ(weight × confidence) = {:.4}   Σ(weight) = {:.2}",
        weighted_sum, total_weight
    ));
    lines.push(format!("  rawCoverage             = {:.4}", raw_coverage));
    lines.push(format!(
        "  structureAdjustment     = {}{:.4}",
        if adjustment >= 0.0 { "+" } else { "" },
        adjustment
    ));
    lines.push(format!("  adjustedCoverage        = {:.4}", adjusted_coverage));
    lines.push(format!(
        "  score = round({:.4} × 5 × 2) / 2 = round({:.3}) / 2 = {}",
        adjusted_coverage,
        adjusted_coverage * 10.0,
        score
    ));
    lines.join("\n")
}

/// Strength at ≥ 0.65; weakness when load-bearing or below 0.40; otherwise neutral
fn classify(signals: &[SignalResult]) -> (Vec<String>, Vec<String>) {
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    for s in signals {
        let bullet = format!("**{}**: {}", s.label, s.detail);
        if s.confidence >= STRENGTH_CONFIDENCE {
            strengths.push(bullet);
        } else if s.required_for_threshold || s.confidence < WEAKNESS_CONFIDENCE {
            weaknesses.push(bullet);
        }
    }
    (strengths, weaknesses)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_breakpoints() {
        assert_eq!(score_from_coverage(0.0), 0.0);
        assert_eq!(score_from_coverage(1.0), 5.0);
        assert_eq!(score_from_coverage(0.8), 4.0);
        assert_eq!(score_from_coverage(0.55), 3.0);
        assert_eq!(score_from_coverage(0.49), 2.5);
    }

    #[test]
    fn test_coverage_is_clamped() {
        assert_eq!(score_from_coverage(-0.3), 0.0);
        assert_eq!(score_from_coverage(1.7), 5.0);
        assert_eq!(score_from_coverage(f64::NAN), 0.0);
    }

    #[test]
    fn test_coverage_mapping_is_monotonic_half_steps() {
        let mut last = 0.0;
        for i in 0..=1000 {
            let s = score_from_coverage(i as f64 / 1000.0);
            assert!((0.0..=5.0).contains(&s));
            assert_eq!((s * 2.0).fract(), 0.0);
            assert!(s >= last);
            last = s;
        }
    }

    #[test]
    fn test_unknown_criterion_fails_loudly() {
        let mut scheme = SchemeDescriptor::horizon_europe();
        scheme.criteria.retain(|c| c.id == CriterionId::Excellence);
        let err = CriterionScorer::new()
            .score(CriterionId::Impact, "text", &scheme, 0.0)
            .unwrap_err();
        assert!(matches!(err, ScoringError::UnknownCriterion { criterion: CriterionId::Impact, .. }));
    }

    #[test]
    fn test_empty_draft_scores_zero() {
        let scheme = SchemeDescriptor::horizon_europe();
        for criterion in CriterionId::ALL {
            let a = CriterionScorer::new().score(criterion, "", &scheme, -0.17).unwrap();
            assert_eq!(a.score, 0.0);
            assert_eq!(a.raw_coverage, 0.0);
            assert_eq!(a.adjusted_coverage, 0.0);
            assert!(!a.passed);
            assert!(a.strengths.is_empty());
            assert_eq!(a.weaknesses.len(), a.signals.len());
        }
    }

    #[test]
    fn test_penalty_is_applied_and_reported() {
        let scheme = SchemeDescriptor::horizon_europe();
        let draft = "O1: a. O2: b. O3: c. O4: d. O5: e.";
        let a = CriterionScorer::new().score(CriterionId::Excellence, draft, &scheme, -0.05).unwrap();
        assert!((a.raw_coverage - 0.20).abs() < 1e-9);
        assert!((a.adjusted_coverage - 0.15).abs() < 1e-9);
        assert_eq!(a.structure_adjustment, -0.05);
        assert!(a.derivation.contains("structureAdjustment     = -0.0500"));
        assert!(a.derivation.contains("rawCoverage             = 0.2000"));
    }

    #[test]
    fn test_derivation_lists_every_signal() {
        let scheme = SchemeDescriptor::horizon_europe();
        let a = CriterionScorer::new().score(CriterionId::Implementation, "WP1", &scheme, 0.0).unwrap();
        for s in &a.signals {
            assert!(a.derivation.contains(&s.label));
        }
        assert!(a.derivation.lines().last().unwrap().starts_with("  score = round("));
    }

    #[test]
    fn test_strength_and_weakness_classification() {
        let scheme = SchemeDescriptor::horizon_europe();
        let a = CriterionScorer::new()
            .score(CriterionId::Impact, "A Data Management Plan (D1.1) will be submitted by Month 6.", &scheme, 0.0)
            .unwrap();
        assert!(a.strengths.iter().any(|s| s.starts_with("**Data Management Plan**")));
        assert!(a.weaknesses.iter().any(|s| s.starts_with("**KPI table")));
    }
}
