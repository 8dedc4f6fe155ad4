//! Report data model.
//!
//! The model's response follows a prompt-requested shape that nothing enforces, so
//! `AnalysisResult::from_value` never fails: missing, null or mistyped fields fall
//! back to empty lists, zero or `None`. Fields the report does not interpret are
//! carried through untouched in `extra`, including a `type` or `severity` value
//! outside the known set. Deserializing goes through the same lenient path.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Number of axes on the benchmark radar chart.
pub const RADAR_AXES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct AnalysisResult {
    pub score: i64,
    pub quote: String,
    pub metrics: Map<String, Value>,
    pub details: Vec<DetailItem>,
    pub visual_issues: Vec<VisualIssue>,
    pub benchmark: Benchmark,
    pub localizer_kit: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_reasoning: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailKind {
    Error,
    Suggestion,
    LegalWarning,
}

impl DetailKind {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "suggestion" => Some(Self::Suggestion),
            "legal_warning" => Some(Self::LegalWarning),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Some(Self::Critical),
            "warning" => Some(Self::Warning),
            "info" => Some(Self::Info),
            _ => None,
        }
    }
}

/// One textual finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailItem {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub id: Value,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<DetailKind>,
    pub title: String,
    pub desc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub law_reference: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A marker on the audited image. Coordinates are percentages of the image
/// dimensions and are not range-checked here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualIssue {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub id: Value,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub title: String,
    pub description: String,
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub aspect: String,
    pub us: String,
    pub them: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Benchmark {
    pub competitors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitor_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_avg_score: Option<f64>,
    pub radar_data: [f64; RADAR_AXES],
    pub comparison: Vec<ComparisonRow>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient construction from untrusted JSON
// ────────────────────────────────────────────────────────────────────────────

fn text(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn object(value: Option<&Value>) -> Map<String, Value> {
    match value {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    }
}

fn array(value: Option<&Value>) -> &[Value] {
    match value {
        Some(Value::Array(items)) => items,
        _ => &[],
    }
}

/// Copies every key of `obj` not listed in `known`. Callers drop a typed key
/// from the result only once its value has been understood.
fn remainder(obj: &Map<String, Value>, known: &[&str]) -> Map<String, Value> {
    obj.iter()
        .filter(|(k, _)| !known.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn severity(obj: &Map<String, Value>) -> Option<Severity> {
    obj.get("severity")
        .and_then(Value::as_str)
        .and_then(Severity::parse)
}

impl From<Value> for AnalysisResult {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

impl AnalysisResult {
    const KNOWN: &'static [&'static str] = &[
        "score",
        "quote",
        "metrics",
        "details",
        "visualIssues",
        "benchmark",
        "localizerKit",
        "scoreReasoning",
    ];

    /// Builds a result from whatever the model returned. Never fails; a
    /// non-object input yields an empty result.
    pub fn from_value(value: &Value) -> Self {
        let obj = object(Some(value));

        let score = number(obj.get("score"))
            .filter(|s| s.is_finite())
            .map(|s| s.round() as i64)
            .unwrap_or(0);

        let score_reasoning = obj
            .get("scoreReasoning")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string);

        Self {
            score,
            quote: text(&obj, "quote"),
            metrics: object(obj.get("metrics")),
            details: array(obj.get("details"))
                .iter()
                .filter_map(Value::as_object)
                .map(DetailItem::from_object)
                .collect(),
            visual_issues: array(obj.get("visualIssues"))
                .iter()
                .filter_map(Value::as_object)
                .map(VisualIssue::from_object)
                .collect(),
            benchmark: Benchmark::from_object(&object(obj.get("benchmark"))),
            localizer_kit: obj.get("localizerKit").cloned().unwrap_or(Value::Null),
            score_reasoning,
            extra: remainder(&obj, Self::KNOWN),
        }
    }
}

impl DetailItem {
    const KNOWN: &'static [&'static str] = &["id", "title", "desc"];

    fn from_object(obj: &Map<String, Value>) -> Self {
        let kind = obj
            .get("type")
            .and_then(Value::as_str)
            .and_then(DetailKind::parse);
        let severity = severity(obj);
        let law_reference = obj
            .get("lawReference")
            .and_then(Value::as_str)
            .map(str::to_string);

        let mut extra = remainder(obj, Self::KNOWN);
        if kind.is_some() {
            extra.remove("type");
        }
        if severity.is_some() {
            extra.remove("severity");
        }
        if law_reference.is_some() {
            extra.remove("lawReference");
        }

        Self {
            id: obj.get("id").cloned().unwrap_or(Value::Null),
            kind,
            title: text(obj, "title"),
            desc: text(obj, "desc"),
            severity,
            law_reference,
            extra,
        }
    }

    /// Sets the kind, replacing any unrecognised `type` carried in `extra`.
    pub fn set_kind(&mut self, kind: DetailKind) {
        self.extra.remove("type");
        self.kind = Some(kind);
    }

    pub fn set_severity(&mut self, severity: Severity) {
        self.extra.remove("severity");
        self.severity = Some(severity);
    }

    pub fn set_law_reference(&mut self, law: String) {
        self.extra.remove("lawReference");
        self.law_reference = Some(law);
    }
}

impl VisualIssue {
    const KNOWN: &'static [&'static str] = &[
        "id",
        "x",
        "y",
        "w",
        "h",
        "title",
        "description",
        "recommendation",
    ];

    fn from_object(obj: &Map<String, Value>) -> Self {
        let coord = |key: &str| number(obj.get(key)).unwrap_or(0.0);
        let severity = severity(obj);
        let mut extra = remainder(obj, Self::KNOWN);
        if severity.is_some() {
            extra.remove("severity");
        }
        Self {
            id: obj.get("id").cloned().unwrap_or(Value::Null),
            x: coord("x"),
            y: coord("y"),
            w: coord("w"),
            h: coord("h"),
            title: text(obj, "title"),
            description: text(obj, "description"),
            recommendation: text(obj, "recommendation"),
            severity,
            extra,
        }
    }

    /// Severity after normalization: an unrecognised value counts as absent
    /// and is replaced by the default.
    pub fn severity_or_default(&mut self, default: Severity) {
        if self.severity.is_none() {
            self.extra.remove("severity");
            self.severity = Some(default);
        }
    }
}

impl Benchmark {
    const KNOWN: &'static [&'static str] = &[
        "competitors",
        "competitorName",
        "competitorScore",
        "marketAvgScore",
        "radarData",
        "comparison",
    ];

    fn from_object(obj: &Map<String, Value>) -> Self {
        let mut radar_data = [0.0; RADAR_AXES];
        for (slot, value) in radar_data.iter_mut().zip(array(obj.get("radarData"))) {
            *slot = number(Some(value)).unwrap_or(0.0);
        }

        Self {
            competitors: array(obj.get("competitors"))
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            competitor_name: obj
                .get("competitorName")
                .and_then(Value::as_str)
                .map(str::to_string),
            competitor_score: number(obj.get("competitorScore")),
            market_avg_score: number(obj.get("marketAvgScore")),
            radar_data,
            comparison: array(obj.get("comparison"))
                .iter()
                .filter_map(Value::as_object)
                .map(|row| ComparisonRow {
                    aspect: text(row, "aspect"),
                    us: text(row, "us"),
                    them: text(row, "them"),
                    notes: text(row, "notes"),
                })
                .collect(),
            extra: remainder(obj, Self::KNOWN),
        }
    }
}
