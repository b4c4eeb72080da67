//! Excellence signals (§1): objectives, methodology, state of the art

use lazy_static::lazy_static;
use regex::Regex;

use super::{count, distinct, flag, sat, vocabulary_check, yes_no, Evidence, Signal};
use crate::types::{CriterionId, RawCheckResult};

lazy_static! {
    // =========================================================================
    // Objectives: "O1:", "SO2.", "Objective 3)"
    // =========================================================================
    static ref RE_OBJECTIVE: Regex = Regex::new(
        r"\b(?:SO|O|[Oo]bjective\s)(\d{1,2})\s*[:.)–-]"
    ).unwrap();

    // =========================================================================
    // Technology readiness: "TRL 4", "TRL: 5", and progressions "TRL 3 → TRL 6"
    // =========================================================================
    static ref RE_TRL_MENTION: Regex = Regex::new(
        r"\bTRL\s*(?:level\s*)?(?:is\s*|of\s*|[:=]\s*)?[1-9]\b"
    ).unwrap();
    static ref RE_TRL_PROGRESSION: Regex = Regex::new(
        r"\bTRL\s*[1-9]\s*(?:-->|->|→|⇒|–>|(?i:to))\s*(?:TRL\s*)?[1-9]\b"
    ).unwrap();

    // =========================================================================
    // Methodology vocabulary and a dedicated heading
    // =========================================================================
    static ref RE_METHOD: Regex = Regex::new(
        r"(?i)\b(?:methodolog(?:y|ies|ical)|approach(?:es)?|methods?|framework|workflow|pipeline|techniques?|protocols?|experimental design|research design|we will (?:use|employ|apply|combine)|employs?|combining)\b"
    ).unwrap();
    static ref RE_METHOD_HEADING: Regex = Regex::new(
        r"(?im)^#+[^\n]*\b(?:methodology|approach|methods?)\b"
    ).unwrap();

    // =========================================================================
    // Alternatives considered and enumerated options "(a) ... (b) ..."
    // =========================================================================
    static ref RE_ALTERNATIVE: Regex = Regex::new(
        r"(?i)\b(?:alternatives?|considered|rejected|instead of|compared (?:with|to)|trade-?offs?)\b"
    ).unwrap();
    static ref RE_ENUMERATED_OPTION: Regex = Regex::new(r"\([a-e]\)\s").unwrap();

    // =========================================================================
    // Validation vocabulary and quantified thresholds
    // =========================================================================
    static ref RE_VALIDATION: Regex = Regex::new(
        r"(?i)\b(?:validation criteria|success criteria|success indicators?|acceptance criteria|validat(?:e|ed|ing|ion)|benchmarks?|accuracy|RMSE|held-out|test sets?)\b"
    ).unwrap();
    static ref RE_QUANTIFIED: Regex = Regex::new(
        r"(?:≥|≤|>=|<=|at least )\s?\d+(?:\.\d+)?\s?%?"
    ).unwrap();

    // =========================================================================
    // State of the art: gaps named, positioning against existing work
    // =========================================================================
    static ref RE_GAP: Regex = Regex::new(
        r"(?i)\b(?:gaps?|limitations?|shortcomings?|bottlenecks?|fail(?:s|ed)? to|lack(?:s|ing)?|unable to|insufficient)\b"
    ).unwrap();
    static ref RE_SOTA: Regex = Regex::new(
        r"(?i)\b(?:state[- ]of[- ]the[- ]art|advances? beyond|beyond (?:the )?(?:state|current|existing|prior)|existing (?:solutions|approaches|methods|tools)|current (?:approaches|solutions|methods|tools)|prior work)\b"
    ).unwrap();

    // =========================================================================
    // Preliminary results and track record
    // =========================================================================
    static ref RE_PRELIMINARY: Regex = Regex::new(
        r"(?i)\b(?:preliminary (?:results|data|work|findings)|proof[- ]of[- ]concept|pilot stud(?:y|ies)|prior results|feasibility (?:study|studies)|demonstrates? feasibility|previous (?:project|projects|work|results)|our (?:previous|prior|earlier) work|track record)\b"
    ).unwrap();
}

pub(super) fn signals() -> Vec<Signal> {
    vec![
        Signal {
            id: "objectives_listed",
            label: "Numbered objectives",
            description: "Specific, numbered objectives (O1, O2, ...) stated up front",
            criterion: CriterionId::Excellence,
            weight: 0.20,
            required_for_threshold: true,
            section_hint: "1.1 Objectives and ambition",
            how_to_fix: "List 4-6 numbered objectives (O1: ..., O2: ...), each measurable and linked to a work package.",
            time_estimate_minutes: 20,
            check: Box::new(check_objectives),
        },
        Signal {
            id: "trl_mentioned",
            label: "TRL positioning",
            description: "Technology readiness level stated, ideally as a start → end progression",
            criterion: CriterionId::Excellence,
            weight: 0.10,
            required_for_threshold: false,
            section_hint: "1.1 Objectives and ambition",
            how_to_fix: "State the current TRL and the target TRL at project end, e.g. \"TRL 3 → TRL 6 by Month 42\".",
            time_estimate_minutes: 10,
            check: Box::new(check_trl),
        },
        Signal {
            id: "methodology_described",
            label: "Methodology described",
            description: "Concrete methods, techniques and research design",
            criterion: CriterionId::Excellence,
            weight: 0.18,
            required_for_threshold: true,
            section_hint: "1.2 Methodology",
            how_to_fix: "Add a Methodology subsection naming the methods, data sources and experimental design for each objective.",
            time_estimate_minutes: 30,
            check: Box::new(check_methodology),
        },
        Signal {
            id: "alternative_approaches",
            label: "Alternatives considered",
            description: "Alternative approaches compared and reasons for rejecting them",
            criterion: CriterionId::Excellence,
            weight: 0.10,
            required_for_threshold: false,
            section_hint: "1.2 Methodology",
            how_to_fix: "Name two alternative approaches, e.g. \"(a) ... rejected because ...; (b) ...\", and justify your choice.",
            time_estimate_minutes: 15,
            check: Box::new(check_alternatives),
        },
        Signal {
            id: "validation_criteria",
            label: "Validation criteria",
            description: "Quantified success or validation criteria for the approach",
            criterion: CriterionId::Excellence,
            weight: 0.12,
            required_for_threshold: false,
            section_hint: "1.2 Methodology",
            how_to_fix: "Define quantified validation criteria (e.g. \"accuracy ≥ 85% on held-out test sets\") for each objective.",
            time_estimate_minutes: 15,
            check: Box::new(check_validation),
        },
        Signal {
            id: "sota_gap_identified",
            label: "State-of-the-art gap",
            description: "Limitations of existing work and how the project goes beyond them",
            criterion: CriterionId::Excellence,
            weight: 0.18,
            required_for_threshold: true,
            section_hint: "1.3 Beyond the state of the art",
            how_to_fix: "Describe what current approaches fail to do, name the gap explicitly, and state how the project advances beyond it.",
            time_estimate_minutes: 25,
            check: Box::new(check_sota_gap),
        },
        Signal {
            id: "preliminary_results",
            label: "Preliminary results",
            description: "Proof-of-concept, pilot data or prior work demonstrating feasibility",
            criterion: CriterionId::Excellence,
            weight: 0.12,
            required_for_threshold: false,
            section_hint: "1.3 Beyond the state of the art",
            how_to_fix: "Cite preliminary results or a proof-of-concept (with a number) that shows the approach is feasible.",
            time_estimate_minutes: 20,
            check: Box::new(check_preliminary),
        },
    ]
}

/// sat(distinct objective numbers, 5)
fn check_objectives(text: &str) -> RawCheckResult {
    let n = distinct(&RE_OBJECTIVE, text);
    if n == 0 {
        return RawCheckResult::absent("No numbered objectives found (expected O1:, O2:, ...).");
    }
    let confidence = sat(n, 5);
    RawCheckResult::new(
        confidence,
        Evidence::new().matches(&RE_OBJECTIVE, text).into_vec(),
        format!("{} distinct numbered objective(s): sat({}, 5) = {:.2}", n, n, confidence),
    )
}

/// 0.5 × sat(TRL mentions, 2) + 0.5 × progression
fn check_trl(text: &str) -> RawCheckResult {
    let mentions = count(&RE_TRL_MENTION, text);
    let progression = RE_TRL_PROGRESSION.is_match(text);
    if mentions == 0 && !progression {
        return RawCheckResult::absent("No technology readiness level mentioned.");
    }
    let confidence = (0.5 * sat(mentions, 2) + 0.5 * flag(progression)).min(1.0);
    RawCheckResult::new(
        confidence,
        Evidence::new()
            .matches(&RE_TRL_PROGRESSION, text)
            .matches(&RE_TRL_MENTION, text)
            .into_vec(),
        format!(
            "{} TRL mention(s), progression {}: 0.5 × sat({}, 2) + 0.5 × {} = {:.2}",
            mentions,
            yes_no(progression),
            mentions,
            flag(progression),
            confidence
        ),
    )
}

/// 0.8 × sat(method vocabulary, 5) + 0.2 × heading
fn check_methodology(text: &str) -> RawCheckResult {
    let n = count(&RE_METHOD, text);
    let heading = RE_METHOD_HEADING.is_match(text);
    if n == 0 && !heading {
        return RawCheckResult::absent("No methodology description found.");
    }
    let confidence = (0.8 * sat(n, 5) + 0.2 * flag(heading)).min(1.0);
    RawCheckResult::new(
        confidence,
        Evidence::new()
            .matches(&RE_METHOD_HEADING, text)
            .matches(&RE_METHOD, text)
            .into_vec(),
        format!(
            "{} method term(s), methodology heading {}: 0.8 × sat({}, 5) + 0.2 × {} = {:.2}",
            n,
            yes_no(heading),
            n,
            flag(heading),
            confidence
        ),
    )
}

/// 0.7 × sat(alternative vocabulary, 3) + 0.3 × sat(enumerated options, 2)
fn check_alternatives(text: &str) -> RawCheckResult {
    let k = count(&RE_ALTERNATIVE, text);
    let e = count(&RE_ENUMERATED_OPTION, text);
    if k == 0 && e == 0 {
        return RawCheckResult::absent("No alternative approaches discussed.");
    }
    let confidence = (0.7 * sat(k, 3) + 0.3 * sat(e, 2)).min(1.0);
    RawCheckResult::new(
        confidence,
        Evidence::new()
            .matches(&RE_ALTERNATIVE, text)
            .matches(&RE_ENUMERATED_OPTION, text)
            .into_vec(),
        format!(
            "{} alternative term(s), {} enumerated option(s): 0.7 × sat({}, 3) + 0.3 × sat({}, 2) = {:.2}",
            k, e, k, e, confidence
        ),
    )
}

/// 0.6 × sat(validation vocabulary, 3) + 0.4 × sat(quantified thresholds, 3)
fn check_validation(text: &str) -> RawCheckResult {
    let k = count(&RE_VALIDATION, text);
    let q = count(&RE_QUANTIFIED, text);
    if k == 0 && q == 0 {
        return RawCheckResult::absent("No validation or success criteria found.");
    }
    let confidence = (0.6 * sat(k, 3) + 0.4 * sat(q, 3)).min(1.0);
    RawCheckResult::new(
        confidence,
        Evidence::new()
            .matches(&RE_VALIDATION, text)
            .matches(&RE_QUANTIFIED, text)
            .into_vec(),
        format!(
            "{} validation term(s), {} quantified threshold(s): 0.6 × sat({}, 3) + 0.4 × sat({}, 3) = {:.2}",
            k, q, k, q, confidence
        ),
    )
}

/// 0.6 × sat(gap vocabulary, 3) + 0.4 × sat(state-of-the-art positioning, 2)
fn check_sota_gap(text: &str) -> RawCheckResult {
    let g = count(&RE_GAP, text);
    let s = count(&RE_SOTA, text);
    if g == 0 && s == 0 {
        return RawCheckResult::absent("No state-of-the-art gap analysis found.");
    }
    let confidence = (0.6 * sat(g, 3) + 0.4 * sat(s, 2)).min(1.0);
    RawCheckResult::new(
        confidence,
        Evidence::new()
            .matches(&RE_GAP, text)
            .matches(&RE_SOTA, text)
            .into_vec(),
        format!(
            "{} gap term(s), {} positioning phrase(s): 0.6 × sat({}, 3) + 0.4 × sat({}, 2) = {:.2}",
            g, s, g, s, confidence
        ),
    )
}

fn check_preliminary(text: &str) -> RawCheckResult {
    vocabulary_check(text, &RE_PRELIMINARY, 2, "preliminary result")
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_DRAFT: &str = "This project will develop something useful for European research.";

    #[test]
    fn test_five_objectives_saturate() {
        let draft = "
            Project objectives:
            O1: To develop a new AI framework for precision agriculture.
            O2: To validate the framework on benchmark datasets.
            O3: To demonstrate results at pilot sites across Europe.
            O4: To establish open-source release with full documentation.
            O5: To engage ≥3 advisory services for post-project uptake.
        ";
        let result = check_objectives(draft);
        assert!(result.found);
        assert!(result.confidence >= 0.75, "got {}", result.confidence);
    }

    #[test]
    fn test_single_objective_fires_weakly() {
        let result = check_objectives("O1: To develop a new approach.");
        assert!(result.found);
        assert!(result.confidence < 0.5);
        assert_eq!(result.evidence, vec!["O1: To develop a new approach.".to_string()]);
    }

    #[test]
    fn test_no_objectives() {
        let result = check_objectives(MINIMAL_DRAFT);
        assert!(!result.found);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_repeated_objective_counts_once() {
        let result = check_objectives("O1: build.\nO1: build again.\nO2: test.");
        assert!((result.confidence - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_trl_progression_scores_high() {
        let result =
            check_trl("The current TRL is 3. AGRI-ADAPT targets TRL 3 → TRL 6 by project end.");
        assert!(result.confidence >= 0.80, "got {}", result.confidence);
    }

    #[test]
    fn test_trl_single_mention_is_moderate() {
        let result = check_trl("The technology is currently at TRL 4.");
        assert!(result.found);
        assert!(result.confidence > 0.0 && result.confidence < 0.80);
    }

    #[test]
    fn test_trl_alternative_progressions() {
        assert!(check_trl("From TRL 2 to TRL 5 over the project lifetime.").confidence > 0.5);
        assert!(check_trl("TRL 4 --> TRL 7").confidence > 0.5);
        assert_eq!(check_trl("This project addresses challenges in agricultural research.").confidence, 0.0);
    }

    #[test]
    fn test_methodology_heading_adds_bonus() {
        let prose = "Our approach uses a workflow and a pipeline.";
        let with_heading = format!("### 1.2 Methodology\n{}", prose);
        assert!(check_methodology(&with_heading).confidence > check_methodology(prose).confidence);
    }

    #[test]
    fn test_alternatives_detected() {
        let draft = "We considered alternatives: (a) rule-based systems — rejected because too rigid; (b) deep learning — rejected due to data requirements.";
        let result = check_alternatives(draft);
        assert!(result.found);
        assert!(result.confidence > 0.3);
        assert_eq!(
            check_alternatives("The methodology employs machine learning for crop prediction.").confidence,
            0.0
        );
    }

    #[test]
    fn test_sota_gap_detected() {
        let draft = "
            Current approaches fail to model non-stationary climate conditions.
            The gap in adaptive decision support for SME farms is well-documented.
            Existing solutions lack the integration of real-time IoT and EO data.
            Our project addresses these limitations and advances beyond prior work.
        ";
        assert!(check_sota_gap(draft).confidence >= 0.60);
        assert_eq!(
            check_sota_gap("Precision agriculture has many applications in modern farming.").confidence,
            0.0
        );
    }

    #[test]
    fn test_composite_detail_shows_formula() {
        let result = check_validation("Accuracy ≥ 85% on held-out test sets.");
        assert!(result.detail.contains("0.6 × sat("));
        assert!(result.detail.contains("0.4 × sat("));
    }

    #[test]
    fn test_checks_are_deterministic() {
        let draft = "O1: To build. O2: To test. O3: To deploy. TRL 3 to TRL 6.";
        assert_eq!(check_objectives(draft), check_objectives(draft));
        assert_eq!(check_trl(draft), check_trl(draft));
    }
}
