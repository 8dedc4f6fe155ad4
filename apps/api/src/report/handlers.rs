use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::report::markers::{layout_markers, MarkerLayout};
use crate::report::model::AnalysisResult;
use crate::report::normalize::normalize_value;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    pub result: Value,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub result: AnalysisResult,
    pub markers: Vec<MarkerLayout>,
}

/// POST /api/normalize
///
/// Applies the compliance filter to a raw image-audit result and lays out
/// its issue markers. Pure; makes no upstream call.
pub async fn handle_normalize(
    State(state): State<AppState>,
    Json(request): Json<NormalizeRequest>,
) -> Result<Json<NormalizeResponse>, AppError> {
    if !request.result.is_object() {
        return Err(AppError::Validation(
            "result must be a JSON object".to_string(),
        ));
    }

    let result = normalize_value(&request.result, &request.country, &state.laws);
    let markers = layout_markers(&result.visual_issues);

    Ok(Json(NormalizeResponse { result, markers }))
}
