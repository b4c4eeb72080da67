//! Gap Analyzer: missing items and the "next 30 minutes" action plan
//!
//! Every impact estimate re-runs [`score_from_coverage`] with one signal raised
//! to the simulated target confidence. It is a single-signal marginal estimate:
//! gains from fixing several signals at once are not additive.

use std::cmp::Ordering;

use crate::core::scorer::score_from_coverage;
use crate::types::{
    ActionItem, CriterionAssessment, MissingItem, Severity, SignalResult, Urgency,
};
use crate::{MAX_ACTION_ITEMS, MISSING_CONFIDENCE_FLOOR, SIMULATED_TARGET_CONFIDENCE};

/// Score change if `signal` alone reached the simulated target confidence
pub fn simulated_score_delta(assessment: &CriterionAssessment, signal: &SignalResult) -> f64 {
    let coverage_delta = signal.weight * (SIMULATED_TARGET_CONFIDENCE - signal.confidence);
    let simulated = score_from_coverage(assessment.adjusted_coverage + coverage_delta);
    (simulated - assessment.score).max(0.0)
}

#[derive(Debug, Default)]
pub struct GapAnalyzer;

impl GapAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Signals below the confidence floor; required first, then by weight
    pub fn missing_items(&self, assessments: &[CriterionAssessment]) -> Vec<MissingItem> {
        let mut items: Vec<MissingItem> = assessments
            .iter()
            .flat_map(|assessment| {
                assessment
                    .signals
                    .iter()
                    .filter(|s| s.confidence < MISSING_CONFIDENCE_FLOOR)
                    .map(move |signal| missing_item(assessment, signal))
            })
            .collect();

        // stable: ties keep catalogue order
        items.sort_by(|a, b| {
            a.severity
                .rank()
                .cmp(&b.severity.rank())
                .then_with(|| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal))
        });
        items
    }

    /// Top MAX_ACTION_ITEMS by urgency tier, then score gain per minute
    pub fn action_items(
        &self,
        assessments: &[CriterionAssessment],
        missing: &[MissingItem],
    ) -> Vec<ActionItem> {
        let mut ranked: Vec<ActionItem> = missing
            .iter()
            .filter_map(|item| {
                let assessment = assessments.iter().find(|a| a.criterion == item.criterion)?;
                let signal = assessment.signal(&item.signal_id)?;
                Some(action_item(assessment, signal, item))
            })
            .collect();

        ranked.sort_by(|a, b| {
            a.urgency
                .rank()
                .cmp(&b.urgency.rank())
                .then_with(|| b.roi.partial_cmp(&a.roi).unwrap_or(Ordering::Equal))
        });
        ranked.truncate(MAX_ACTION_ITEMS);
        for (idx, item) in ranked.iter_mut().enumerate() {
            item.priority = idx + 1;
        }
        ranked
    }
}

fn missing_item(assessment: &CriterionAssessment, signal: &SignalResult) -> MissingItem {
    let delta = simulated_score_delta(assessment, signal);
    let impact = if delta > 0.0 {
        format!("+{:.1} on {}", delta, assessment.title)
    } else {
        format!("+0.0 on {} (below the next 0.5 step)", assessment.title)
    };
    MissingItem {
        signal_id: signal.signal_id.clone(),
        label: signal.label.clone(),
        criterion: signal.criterion,
        criterion_title: assessment.title.clone(),
        severity: if signal.required_for_threshold {
            Severity::Required
        } else {
            Severity::Recommended
        },
        weight: signal.weight,
        how_to_fix: signal.how_to_fix.clone(),
        time_estimate_minutes: signal.time_estimate_minutes,
        estimated_score_delta: delta,
        estimated_score_impact: impact,
    }
}

fn action_item(
    assessment: &CriterionAssessment,
    signal: &SignalResult,
    item: &MissingItem,
) -> ActionItem {
    let urgency = match (item.severity, assessment.passed) {
        (Severity::Required, false) => Urgency::High,
        (Severity::Required, true) => Urgency::Medium,
        (Severity::Recommended, _) => Urgency::Low,
    };
    let roi = if item.time_estimate_minutes > 0 {
        item.estimated_score_delta / item.time_estimate_minutes as f64
    } else {
        0.0
    };
    let score_impact = if item.estimated_score_delta > 0.0 {
        format!("{}: +{:.1}", assessment.title, item.estimated_score_delta)
    } else {
        format!("Improves {} coverage", assessment.title)
    };
    ActionItem {
        priority: 0,
        criterion: item.criterion,
        section: signal.section_hint.clone(),
        action: item.how_to_fix.clone(),
        time_estimate_minutes: item.time_estimate_minutes,
        score_impact,
        urgency,
        roi,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scorer::CriterionScorer;
    use crate::types::{CriterionId, SchemeDescriptor};

    fn assess(draft: &str, penalty: f64) -> Vec<CriterionAssessment> {
        let scheme = SchemeDescriptor::horizon_europe();
        let scorer = CriterionScorer::new();
        CriterionId::ALL
            .iter()
            .map(|c| scorer.score(*c, draft, &scheme, penalty).unwrap())
            .collect()
    }

    #[test]
    fn test_empty_draft_lists_every_signal() {
        let assessments = assess("", 0.0);
        let missing = GapAnalyzer::new().missing_items(&assessments);
        assert_eq!(missing.len(), 22);
        let first_recommended = missing
            .iter()
            .position(|m| m.severity == Severity::Recommended)
            .unwrap();
        assert!(missing[..first_recommended]
            .iter()
            .all(|m| m.severity == Severity::Required));
        assert!(missing[first_recommended..]
            .iter()
            .all(|m| m.severity == Severity::Recommended));
    }

    #[test]
    fn test_missing_items_sorted_by_weight_within_severity() {
        let missing = GapAnalyzer::new().missing_items(&assess("", 0.0));
        for pair in missing.windows(2) {
            if pair[0].severity == pair[1].severity {
                assert!(pair[0].weight >= pair[1].weight);
            }
        }
        assert_eq!(missing[0].signal_id, "objectives_listed");
    }

    #[test]
    fn test_simulated_delta_uses_scoring_formula() {
        let assessments = assess("", 0.0);
        let excellence = &assessments[0];
        let objectives = excellence.signal("objectives_listed").unwrap();
        // 0.20 × 0.75 = 0.15 coverage → round(1.5) / 2 = 1.0
        assert_eq!(simulated_score_delta(excellence, objectives), 1.0);
        let trl = excellence.signal("trl_mentioned").unwrap();
        // 0.10 × 0.75 = 0.075 → round(0.75) / 2 = 0.5
        assert_eq!(simulated_score_delta(excellence, trl), 0.5);
    }

    #[test]
    fn test_action_plan_is_capped_and_numbered() {
        let assessments = assess("", 0.0);
        let analyzer = GapAnalyzer::new();
        let missing = analyzer.missing_items(&assessments);
        let actions = analyzer.action_items(&assessments, &missing);
        assert_eq!(actions.len(), MAX_ACTION_ITEMS);
        for (idx, action) in actions.iter().enumerate() {
            assert_eq!(action.priority, idx + 1);
        }
        // every criterion fails, so required items are high urgency and come first
        assert_eq!(actions[0].urgency, Urgency::High);
        for pair in actions.windows(2) {
            assert!(pair[0].urgency.rank() <= pair[1].urgency.rank());
            if pair[0].urgency == pair[1].urgency {
                assert!(pair[0].roi >= pair[1].roi);
            }
        }
    }

    #[test]
    fn test_zero_delta_impact_wording() {
        let mut assessments = assess("", 0.0);
        // 0.251 → 1.5; timeline adds 0.08 × 0.75 = 0.06 → 0.311 → still 1.5
        assessments[2].adjusted_coverage = 0.251;
        assessments[2].score = 1.5;
        let analyzer = GapAnalyzer::new();
        let missing = analyzer.missing_items(&assessments);
        let item = missing.iter().find(|m| m.signal_id == "timeline_gantt").unwrap();
        assert_eq!(item.estimated_score_delta, 0.0);
        assert!(item.estimated_score_impact.contains("below the next 0.5 step"));

        let actions = analyzer.action_items(&assessments, &missing);
        assert!(actions.iter().all(|a| a.roi >= 0.0));
    }
}
