//! Result Normalization & Compliance Filter.
//!
//! A pure, single-pass transform from the model's loosely shaped output to the
//! report that gets displayed:
//!
//! 1. `score` is floored at [`SCORE_FLOOR`] (no upper clamp).
//! 2. Error findings, and findings whose description talks about legal matters,
//!    are matched against the ordered category table in [`super::laws`]. A match
//!    becomes a `legal_warning` carrying the country's law reference; no match is
//!    downgraded to a `suggestion`.
//! 3. Non-critical visual issues describing micro-visual noise (padding, kerning,
//!    ...) are dropped; survivors default to `warning` severity.
//! 4. `scoreReasoning` is filled in when the model did not supply one.
//!
//! Keyword matching is case-insensitive substring matching. False positives
//! and negatives are expected; this labels findings, it does not judge them.

use serde_json::Value;

use crate::report::laws::{match_category, CountryLawTable};
use crate::report::model::{AnalysisResult, DetailItem, DetailKind, Severity, VisualIssue};

pub const SCORE_FLOOR: i64 = 50;

/// Phrases that mark a description as talking about legal matters.
const LEGAL_TERMS: &[&str] = &[
    "legal",
    "law ",
    "laws",
    "compliance",
    "regulation",
    "regulatory",
    "violation",
    "violates",
];

/// Visual findings too minor to surface unless marked critical.
const MICRO_VISUAL_TERMS: &[&str] = &[
    "padding",
    "margin",
    "pixel",
    "whitespace",
    "kerning",
    "alignment",
    "spacing",
];

const FLOORED_REASONING: &str = "Significant issues were found. The score is held at the \
    50-point baseline so the report stays actionable; address the flagged items first.";

const STANDARD_REASONING: &str = "Score reflects overall usability, visual quality and \
    cultural fit for the target market, after legal findings were labelled.";

/// Normalizes a raw model response for `country`. Accepts any JSON value.
pub fn normalize_value(raw: &Value, country: &str, laws: &CountryLawTable) -> AnalysisResult {
    normalize(&AnalysisResult::from_value(raw), country, laws)
}

/// Returns a new, normalized copy of `result`. The input is not modified.
pub fn normalize(result: &AnalysisResult, country: &str, laws: &CountryLawTable) -> AnalysisResult {
    let score = floor_score(result.score);

    let details = result
        .details
        .iter()
        .map(|item| classify_detail(item, country, laws))
        .collect();

    let visual_issues = result
        .visual_issues
        .iter()
        .filter(|issue| !is_micro_visual_noise(issue))
        .map(|issue| {
            let mut issue = issue.clone();
            issue.severity_or_default(Severity::Warning);
            issue
        })
        .collect();

    let score_reasoning = result
        .score_reasoning
        .clone()
        .or_else(|| Some(default_reasoning(score).to_string()));

    AnalysisResult {
        score,
        details,
        visual_issues,
        score_reasoning,
        ..result.clone()
    }
}

pub fn floor_score(score: i64) -> i64 {
    score.max(SCORE_FLOOR)
}

fn default_reasoning(floored_score: i64) -> &'static str {
    if floored_score == SCORE_FLOOR {
        FLOORED_REASONING
    } else {
        STANDARD_REASONING
    }
}

fn mentions_legal_terms(text: &str) -> bool {
    let text = text.to_lowercase();
    LEGAL_TERMS.iter().any(|t| text.contains(t))
}

fn classify_detail(item: &DetailItem, country: &str, laws: &CountryLawTable) -> DetailItem {
    // Already-labelled findings are left alone so normalizing twice is stable.
    if item.kind == Some(DetailKind::LegalWarning) {
        return item.clone();
    }

    let is_candidate = item.kind == Some(DetailKind::Error) || mentions_legal_terms(&item.desc);
    if !is_candidate {
        return item.clone();
    }

    let mut out = item.clone();
    match match_category(&format!("{} {}", item.title, item.desc)) {
        Some(category) => {
            let law = laws.laws_for(country).reference(category).to_string();
            out.set_kind(DetailKind::LegalWarning);
            out.set_severity(Severity::Critical);
            out.desc = format!("[Violates {law}] {}", item.desc);
            out.set_law_reference(law);
        }
        None => {
            // Not illegal, just bad practice.
            out.set_kind(DetailKind::Suggestion);
        }
    }
    out
}

fn is_micro_visual_noise(issue: &VisualIssue) -> bool {
    if issue.severity == Some(Severity::Critical) {
        return false;
    }
    let text = format!("{} {}", issue.title, issue.description).to_lowercase();
    MICRO_VISUAL_TERMS.iter().any(|t| text.contains(t))
        || (text.contains("font size") && !text.contains("legibility"))
}
