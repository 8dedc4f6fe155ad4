//! Request and response types for the relay endpoints, with input validation.
//! Model replies are not typed here; handlers pass them through as JSON objects.
//!
//! Validation runs before any credential is picked or network call is made.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;

const DEFAULT_COUNTRY: &str = "Global";
const DEFAULT_INDUSTRY: &str = "General";
const DEFAULT_PERSONA: &str = "General users";
const DEFAULT_KEYWORD: &str = "General";

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Brand-safety check
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandCheckRequest {
    pub brand_name: Option<String>,
    pub country: Option<String>,
}

/// A validated brand check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandCheck {
    pub brand_name: String,
    pub country: String,
}

impl BrandCheckRequest {
    pub fn validate(&self) -> Result<BrandCheck, AppError> {
        match (
            non_blank(self.brand_name.as_deref()),
            non_blank(self.country.as_deref()),
        ) {
            (Some(brand_name), Some(country)) => Ok(BrandCheck {
                brand_name: brand_name.to_string(),
                country: country.to_string(),
            }),
            _ => Err(AppError::Validation(
                "Brand name and country are required".to_string(),
            )),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Image audit
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAuditRequest {
    pub image_base64: Option<String>,
    pub industry: Option<String>,
    pub persona: Option<String>,
    pub country: Option<String>,
}

/// A validated image audit; the image itself is decoded separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAudit {
    pub image_base64: String,
    pub industry: String,
    pub persona: String,
    pub country: String,
}

impl ImageAuditRequest {
    pub fn validate(&self) -> Result<ImageAudit, AppError> {
        let image_base64 = non_blank(self.image_base64.as_deref())
            .ok_or_else(|| AppError::Validation("No image data found".to_string()))?;
        Ok(ImageAudit {
            image_base64: image_base64.to_string(),
            industry: non_blank(self.industry.as_deref())
                .unwrap_or(DEFAULT_INDUSTRY)
                .to_string(),
            persona: non_blank(self.persona.as_deref())
                .unwrap_or(DEFAULT_PERSONA)
                .to_string(),
            country: non_blank(self.country.as_deref())
                .unwrap_or(DEFAULT_COUNTRY)
                .to_string(),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// URL content audit
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAuditRequest {
    pub url: Option<String>,
    pub target_country: Option<String>,
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentAudit {
    pub url: String,
    pub target_country: String,
    pub keyword: String,
}

impl ContentAuditRequest {
    pub fn validate(&self) -> Result<ContentAudit, AppError> {
        let raw = non_blank(self.url.as_deref())
            .ok_or_else(|| AppError::Validation("URL is required".to_string()))?;
        let url = reqwest::Url::parse(raw)
            .map_err(|_| AppError::Validation(format!("Invalid URL: {raw}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::Validation(
                "URL must use http or https".to_string(),
            ));
        }
        Ok(ContentAudit {
            url: url.to_string(),
            target_country: non_blank(self.target_country.as_deref())
                .unwrap_or(DEFAULT_COUNTRY)
                .to_string(),
            keyword: non_blank(self.keyword.as_deref())
                .unwrap_or(DEFAULT_KEYWORD)
                .to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapedSummary {
    pub title: String,
    pub h1: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAuditResponse {
    pub success: bool,
    pub scraped_data: ScrapedSummary,
    /// The model's analysis object, passed through as returned.
    pub analysis: Value,
}
