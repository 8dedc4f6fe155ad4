pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::relay::handlers;
use crate::report::handlers::handle_normalize;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Relay endpoints
        .route("/api/analyze-brand", post(handlers::handle_analyze_brand))
        .route("/api/analyze", post(handlers::handle_analyze_image))
        .route("/api/audit", post(handlers::handle_content_audit))
        // Report post-processing
        .route("/api/normalize", post(handle_normalize))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::Config;
    use crate::llm_client::credentials::{CredentialPool, FixedSelector, KeyRing};
    use crate::llm_client::LlmClient;
    use crate::report::laws::CountryLawTable;
    use crate::scraper::testing::{Behaviour, StubLauncher};
    use crate::scraper::BrowserLauncher;

    fn test_state(api_base: &str, keys: Option<&str>, browser: Arc<dyn BrowserLauncher>) -> AppState {
        let config = Config::from_lookup(|key| match key {
            "GEMINI_API_BASE" => Some(api_base.to_string()),
            "GEMINI_API_KEYS" => keys.map(str::to_string),
            _ => None,
        })
        .unwrap();
        AppState {
            llm: LlmClient::new(&config.api_base).unwrap(),
            keys: KeyRing::new(
                CredentialPool::parse(config.api_keys.as_deref()),
                Arc::new(FixedSelector(1)),
            ),
            browser,
            laws: Arc::new(CountryLawTable::default()),
            config,
        }
    }

    fn model_reply(body: Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": body.to_string()}]}}]
        }))
    }

    async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                Request::post(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let state = test_state("http://unused", None, Arc::new(StubLauncher::new(Behaviour::Succeed)));
        let response = build_router(state)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_brand_check_uses_selected_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("x-goog-api-key", "key-b"))
            .respond_with(model_reply(json!({
                "score": 35, "status": "risk", "meaning": "sounds like a slang insult",
                "pronunciation": "hard", "suggestion": "Try Novara"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let state = test_state(&server.uri(), Some("key-a,key-b"), Arc::new(StubLauncher::new(Behaviour::Succeed)));
        let (status, body) = post_json(
            build_router(state),
            "/api/analyze-brand",
            json!({"brandName": "Nova", "country": "Spain"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "risk");
        assert_eq!(body["suggestion"], "Try Novara");
    }

    #[tokio::test]
    async fn test_brand_check_passes_loose_reply_through() {
        let server = MockServer::start().await;
        let reply = json!({
            "score": "85", "status": "Mostly safe", "meaning": "new star",
            "alternatives": ["Novaro", "Nuvia"]
        });
        Mock::given(method("POST"))
            .respond_with(model_reply(reply.clone()))
            .mount(&server)
            .await;

        let state = test_state(&server.uri(), Some("k"), Arc::new(StubLauncher::new(Behaviour::Succeed)));
        let (status, body) = post_json(
            build_router(state),
            "/api/analyze-brand",
            json!({"brandName": "Nova", "country": "Spain"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, reply);
    }

    #[tokio::test]
    async fn test_brand_check_non_object_reply_is_500() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(model_reply(json!(["safe"])))
            .mount(&server)
            .await;

        let state = test_state(&server.uri(), Some("k"), Arc::new(StubLauncher::new(Behaviour::Succeed)));
        let (status, body) = post_json(
            build_router(state),
            "/api/analyze-brand",
            json!({"brandName": "Nova", "country": "Spain"}),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Model response was not a JSON object");
    }

    #[tokio::test]
    async fn test_brand_check_validation_makes_no_upstream_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let state = test_state(&server.uri(), Some("k"), Arc::new(StubLauncher::new(Behaviour::Succeed)));
        let (status, body) =
            post_json(build_router(state), "/api/analyze-brand", json!({"brandName": "Nova"})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Brand name and country are required");
    }

    #[tokio::test]
    async fn test_missing_credentials_surface_as_500() {
        let state = test_state("http://unused", None, Arc::new(StubLauncher::new(Behaviour::Succeed)));
        let (status, body) = post_json(
            build_router(state),
            "/api/analyze-brand",
            json!({"brandName": "Nova", "country": "Spain"}),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("GEMINI_API_KEYS"));
    }

    #[tokio::test]
    async fn test_brand_check_model_not_found_is_404() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"code": 404, "message": "models/gemini-2.5-flash is not found"}
            })))
            .mount(&server)
            .await;

        let state = test_state(&server.uri(), Some("k"), Arc::new(StubLauncher::new(Behaviour::Succeed)));
        let (status, body) = post_json(
            build_router(state),
            "/api/analyze-brand",
            json!({"brandName": "Nova", "country": "Spain"}),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "MODEL_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_image_audit_returns_model_json_verbatim() {
        let server = MockServer::start().await;
        let reply = json!({"score": 42, "quote": "Busy", "heatmapData": "radial-gradient(red, transparent)"});
        Mock::given(method("POST"))
            .respond_with(model_reply(reply.clone()))
            .mount(&server)
            .await;

        let state = test_state(&server.uri(), Some("k"), Arc::new(StubLauncher::new(Behaviour::Succeed)));
        let (status, body) = post_json(
            build_router(state),
            "/api/analyze",
            json!({"imageBase64": "data:image/png;base64,iVBORw0KGgo=", "country": "Japan"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, reply);
    }

    #[tokio::test]
    async fn test_image_audit_prose_reply_is_analysis_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "Sorry, I can't see the image."}]}}]
            })))
            .mount(&server)
            .await;

        let state = test_state(&server.uri(), Some("k"), Arc::new(StubLauncher::new(Behaviour::Succeed)));
        let (status, body) = post_json(
            build_router(state),
            "/api/analyze",
            json!({"imageBase64": "iVBORw0KGgo="}),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Analysis Failed");
        assert!(body["details"].as_str().unwrap().contains("JSON parse error"));
    }

    #[tokio::test]
    async fn test_content_audit_scrapes_then_analyzes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(model_reply(json!({
                "overallScore": 78, "culturalFitScore": 81, "sentiment": "Positive",
                "summary": "Warm tone", "goodPoints": ["Polite register"],
                "improvements": ["Add Thai meta description"], "culturalInsights": ["Avoid feet imagery"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let launcher = Arc::new(StubLauncher::new(Behaviour::Succeed));
        let closed = launcher.closed.clone();
        let state = test_state(&server.uri(), Some("k"), launcher);
        let (status, body) = post_json(
            build_router(state),
            "/api/audit",
            json!({"url": "https://shop.example.th", "targetCountry": "Thailand"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["scrapedData"]["title"], "Sawasdee Shop");
        assert_eq!(body["scrapedData"]["description"], "Handmade goods");
        assert_eq!(body["analysis"]["overallScore"], 78);
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_content_audit_keeps_unlisted_sentiment_and_extra_fields() {
        let server = MockServer::start().await;
        let analysis = json!({
            "sentiment": "Mixed", "summary": "Uneven tone",
            "readingLevel": "B2"
        });
        Mock::given(method("POST"))
            .respond_with(model_reply(analysis.clone()))
            .mount(&server)
            .await;

        let state = test_state(&server.uri(), Some("k"), Arc::new(StubLauncher::new(Behaviour::Succeed)));
        let (status, body) = post_json(
            build_router(state),
            "/api/audit",
            json!({"url": "https://shop.example.th"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["analysis"], analysis);
    }

    #[tokio::test]
    async fn test_content_audit_scrape_failure_skips_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let launcher = Arc::new(StubLauncher::new(Behaviour::Fail));
        let closed = launcher.closed.clone();
        let state = test_state(&server.uri(), Some("k"), launcher);
        let (status, body) = post_json(
            build_router(state),
            "/api/audit",
            json!({"url": "https://down.example.com"}),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("connection refused"));
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_normalize_endpoint_filters_and_lays_out_markers() {
        let state = test_state("http://unused", None, Arc::new(StubLauncher::new(Behaviour::Succeed)));
        let (status, body) = post_json(
            build_router(state),
            "/api/normalize",
            json!({
                "country": "Germany",
                "result": {
                    "score": 30,
                    "details": [{"type": "error", "title": "Cookie Consent Missing", "desc": "no consent banner shown"}],
                    "visualIssues": [
                        {"id": "v1", "title": "Contrast", "description": "low contrast padding issue", "severity": "warning", "x": 150, "y": -5, "w": 10, "h": 10},
                        {"id": "v2", "title": "Flag colours", "description": "national colours misused", "x": 150, "y": -5, "w": 10, "h": 10}
                    ],
                    "benchmark": {}
                }
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["score"], 50);
        assert_eq!(body["result"]["details"][0]["type"], "legal_warning");
        assert_eq!(body["result"]["details"][0]["lawReference"], "GDPR (DSGVO)");
        assert_eq!(body["result"]["visualIssues"].as_array().unwrap().len(), 1);
        assert_eq!(body["markers"][0]["id"], "v2");
        assert_eq!(body["markers"][0]["left"], 98.0);
        assert_eq!(body["markers"][0]["top"], 2.0);
    }

    #[tokio::test]
    async fn test_normalize_rejects_non_object_result() {
        let state = test_state("http://unused", None, Arc::new(StubLauncher::new(Behaviour::Succeed)));
        let (status, _) = post_json(
            build_router(state),
            "/api/normalize",
            json!({"country": "Germany", "result": "prose"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
