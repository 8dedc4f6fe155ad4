//! Axum route handlers for the relay endpoints.
//!
//! Each handler validates its input, picks one credential, builds the prompt,
//! makes a single model call and returns the parsed JSON object as the model
//! wrote it. Nothing is retried.

use axum::{extract::State, Json};
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::{fill, JSON_ONLY_INSTRUCTION};
use crate::relay::image::parse_image_payload;
use crate::relay::models::{
    BrandCheckRequest, ContentAuditRequest, ContentAuditResponse, ImageAuditRequest,
    ScrapedSummary,
};
use crate::relay::prompts::{
    BRAND_CHECK_PROMPT_TEMPLATE, CONTENT_AUDIT_PROMPT_TEMPLATE, IMAGE_AUDIT_PROMPT_TEMPLATE,
};
use crate::scraper::{scrape_page, NAVIGATION_TIMEOUT};
use crate::state::AppState;

/// Model replies must be a JSON object; anything else is an upstream failure.
fn json_object(reply: Value) -> Result<Value, AppError> {
    if reply.is_object() {
        Ok(reply)
    } else {
        Err(AppError::Llm(
            "Model response was not a JSON object".to_string(),
        ))
    }
}

/// POST /api/analyze-brand
///
/// Brand-name safety check for one target market.
pub async fn handle_analyze_brand(
    State(state): State<AppState>,
    Json(request): Json<BrandCheckRequest>,
) -> Result<Json<Value>, AppError> {
    let check = request.validate()?;
    let key = state.keys.pick()?;

    info!(brand = %check.brand_name, country = %check.country, "Brand check");

    let prompt = fill(
        BRAND_CHECK_PROMPT_TEMPLATE,
        &[
            ("brand_name", check.brand_name.as_str()),
            ("country", check.country.as_str()),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );

    let report = state.llm.call_json::<Value>(&key, &prompt, None).await?;

    Ok(Json(json_object(report)?))
}

/// POST /api/analyze
///
/// Image audit. The model's JSON object is returned verbatim; normalization
/// is a separate step (`POST /api/normalize`).
pub async fn handle_analyze_image(
    State(state): State<AppState>,
    Json(request): Json<ImageAuditRequest>,
) -> Result<Json<Value>, AppError> {
    let audit = request.validate()?;
    let image = parse_image_payload(&audit.image_base64)?;
    let key = state.keys.pick().map_err(AppError::analysis_failed)?;

    info!(
        industry = %audit.industry,
        country = %audit.country,
        mime_type = %image.mime_type,
        "Image audit"
    );

    let prompt = fill(
        IMAGE_AUDIT_PROMPT_TEMPLATE,
        &[
            ("industry", audit.industry.as_str()),
            ("persona", audit.persona.as_str()),
            ("country", audit.country.as_str()),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );

    let result: Value = state
        .llm
        .call_json(&key, &prompt, Some(&image))
        .await
        .map_err(AppError::analysis_failed)?;

    Ok(Json(json_object(result).map_err(AppError::analysis_failed)?))
}

/// POST /api/audit
///
/// Scrapes the page, then asks the model for a cultural content audit.
pub async fn handle_content_audit(
    State(state): State<AppState>,
    Json(request): Json<ContentAuditRequest>,
) -> Result<Json<ContentAuditResponse>, AppError> {
    let audit = request.validate()?;
    // Misconfiguration fails before a session is opened.
    let key = state.keys.pick()?;

    let page = scrape_page(state.browser.as_ref(), &audit.url, NAVIGATION_TIMEOUT).await?;

    let prompt = fill(
        CONTENT_AUDIT_PROMPT_TEMPLATE,
        &[
            ("country", audit.target_country.as_str()),
            ("keyword", audit.keyword.as_str()),
            ("title", page.title.as_str()),
            ("description", page.meta_description.as_str()),
            ("h1", page.h1.as_str()),
            ("body_text", page.body_text.as_str()),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );

    let analysis = json_object(state.llm.call_json::<Value>(&key, &prompt, None).await?)?;

    info!(
        url = %audit.url,
        score = %analysis.get("overallScore").unwrap_or(&serde_json::Value::Null),
        "Content audit complete"
    );

    Ok(Json(ContentAuditResponse {
        success: true,
        scraped_data: ScrapedSummary {
            title: page.title,
            h1: page.h1,
            description: page.meta_description,
        },
        analysis,
    }))
}
