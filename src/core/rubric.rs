//! Rubric rationale strings, one per half-point step for each criterion

use crate::types::CriterionId;

const EXCELLENCE: [&str; 11] = [
    "Not evaluable: key content is missing or completely absent.",
    "Not evaluable: extremely thin content; cannot assess this criterion.",
    "Poor: major weaknesses in all aspects; vague or absent objectives, superficial methodology, no state-of-the-art analysis.",
    "Poor to Fair: most aspects inadequately addressed; significant revision required across the board.",
    "Fair: broadly addressed but with serious weaknesses; partially defined objectives, methodology lacks rigour, state of the art superficial.",
    "Fair to Good: some aspects adequately addressed but one or two subsections still have serious gaps.",
    "Good: clearly addresses the criterion with only minor shortcomings; passes the threshold.",
    "Good to Very Good: well addressed with only isolated gaps that would be easy to fix.",
    "Very Good: well conceived, rigorous methodology, specific objectives, thorough state of the art; minor shortcomings only.",
    "Very Good to Excellent: near-exemplary; any shortcomings are trivial.",
    "Excellent: fully convincing in all aspects; outstanding objectives, methodology and state-of-the-art positioning.",
];

const IMPACT: [&str; 11] = [
    "Not evaluable: impact section is absent or completely generic.",
    "Not evaluable: extremely thin content; cannot assess this criterion.",
    "Poor: no credible impact pathway; generic outcomes; no dissemination plan; no open science commitments.",
    "Poor to Fair: one or two aspects addressed but most are seriously inadequate.",
    "Fair: some outcomes stated but loosely linked to the call; weak dissemination; no KPI table.",
    "Fair to Good: impact case is building but requires more specificity and an open science plan.",
    "Good: outcomes linked to the call, adequate dissemination and exploitation plan; passes the threshold.",
    "Good to Very Good: strong impact case with minor gaps (e.g. missing KPI baselines or a full IP plan).",
    "Very Good: compelling outcomes with quantified KPIs, clear exploitation, detailed open science.",
    "Very Good to Excellent: near-exemplary impact section.",
    "Excellent: outstanding impact case; tight EU alignment; innovative exploitation; exemplary open science.",
];

const IMPLEMENTATION: [&str; 11] = [
    "Not evaluable: work plan and management are absent.",
    "Not evaluable: extremely thin content; cannot assess this criterion.",
    "Poor: incoherent work plan; management unclear; consortium lacks required capabilities.",
    "Poor to Fair: some structure visible but major gaps across all three sub-criteria.",
    "Fair: work plan present but unrealistic; no risk register; consortium roles unclear.",
    "Fair to Good: improving but still missing key elements (risk table, milestone detail or budget justification).",
    "Good: coherent work package structure, milestones and deliverables present, adequate management; passes the threshold.",
    "Good to Very Good: well-structured proposal with only isolated gaps.",
    "Very Good: detailed work packages, verifiable milestones, solid management, complementary consortium, justified budget.",
    "Very Good to Excellent: near-exemplary implementation section.",
    "Excellent: optimal work plan, exemplary management, ideal consortium, fully justified lean budget.",
];

/// Rationale for a score; falls back to a generic sentence off the half-point grid
pub fn rationale(criterion: CriterionId, score: f64, title: &str) -> String {
    let table = match criterion {
        CriterionId::Excellence => &EXCELLENCE,
        CriterionId::Impact => &IMPACT,
        CriterionId::Implementation => &IMPLEMENTATION,
    };
    let doubled = score * 2.0;
    let on_grid = doubled.fract() == 0.0 && (0.0..=10.0).contains(&doubled);
    if on_grid {
        table[doubled as usize].to_string()
    } else {
        format!("Score {}/5 on {}.", score, title)
    }
}
