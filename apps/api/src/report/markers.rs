//! Marker placement for visual issues drawn over the audited image.

use serde::Serialize;
use serde_json::Value;

use crate::report::model::{Severity, VisualIssue};

pub const MARKER_MIN_PERCENT: f64 = 2.0;
pub const MARKER_MAX_PERCENT: f64 = 98.0;

/// Layout offsets for one issue marker, in percent of the image size.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerLayout {
    pub id: Value,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

/// Keeps a marker coordinate inside the image. Non-finite input lands on the minimum.
pub fn clamp_marker_coordinate(value: f64) -> f64 {
    if value.is_nan() {
        return MARKER_MIN_PERCENT;
    }
    value.clamp(MARKER_MIN_PERCENT, MARKER_MAX_PERCENT)
}

impl From<&VisualIssue> for MarkerLayout {
    fn from(issue: &VisualIssue) -> Self {
        Self {
            id: issue.id.clone(),
            left: clamp_marker_coordinate(issue.x),
            top: clamp_marker_coordinate(issue.y),
            width: issue.w,
            height: issue.h,
            severity: issue.severity,
        }
    }
}

pub fn layout_markers(issues: &[VisualIssue]) -> Vec<MarkerLayout> {
    issues.iter().map(MarkerLayout::from).collect()
}
