//! HTTP router for the analysis service.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! The service is CORS-enabled for browser frontends.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use super::endpoints;
use super::types::AppState;

/// Build the analysis API router.
pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(endpoints::root))
        .route("/health", get(endpoints::health))
        .route("/ai-status", get(endpoints::ai_status))
        .route("/analyze-text", post(endpoints::analyze_text))
        .route("/demo", get(endpoints::demo))
        .with_state(state)
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::analysis::{AnalysisEngine, ReferenceData};
    use crate::llm::{ChatCompletionsClient, LlmAnalyzer};

    use super::*;

    fn test_state() -> AppState {
        let reference = Arc::new(ReferenceData::standard());
        let engine = Arc::new(AnalysisEngine::new(reference));
        // No API key: the LLM strategy reports unconfigured and dispatch
        // falls back to the rule-based engine.
        let client = ChatCompletionsClient::new("https://api.example.com/v1", None, "gpt-4o-mini", 5);
        let llm = Arc::new(LlmAnalyzer::new(client));
        AppState { engine, llm }
    }

    fn test_app() -> Router {
        app_router(test_state())
    }

    async fn response_json(response: axum::http::Response<Body>) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1 << 20)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn root_returns_banner() {
        let response = test_app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["status"], "running");
        assert!(!json["version"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn health_reports_analyzer_readiness() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["analyzers"]["rule_based"], "ready");
        assert_eq!(json["analyzers"]["llm"], "needs_api_key");
    }

    #[tokio::test]
    async fn ai_status_reflects_missing_key() {
        let response = test_app()
            .oneshot(Request::get("/ai-status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = response_json(response).await;
        assert_eq!(json["api_key_configured"], false);
        assert_eq!(json["status"], "configuration_needed");
    }

    #[tokio::test]
    async fn analyze_text_rule_based_envelope() {
        let body = r#"{"text": "Total Cholesterol: 245 mg/dL and Fasting Glucose: 110 mg/dL", "filename": "labs.txt", "use_llm": false}"#;
        let response = test_app()
            .oneshot(post_json("/analyze-text", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["filename"], "labs.txt");
        assert_eq!(json["analysis_type"], "Rule-based");
        assert_eq!(
            json["analysis"]["extracted_values"]["cholesterol"]["value"],
            245.0
        );
        assert!(json["analysis"]["patient_summary"]["key_findings"].is_array());
        assert!(json["analysis"]["doctor_summary"]["risk_assessment"]["risk_percentage"].is_number());
    }

    #[tokio::test]
    async fn analyze_text_llm_flag_falls_back_when_unconfigured() {
        let body = r#"{"text": "Glucose: 110 mg/dL", "use_llm": true}"#;
        let response = test_app()
            .oneshot(post_json("/analyze-text", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["analysis_type"], "Rule-based");
        assert_eq!(json["filename"], "text_input.txt");
    }

    #[tokio::test]
    async fn blank_text_rejected_before_analysis() {
        let body = r#"{"text": "   "}"#;
        let response = test_app()
            .oneshot(post_json("/analyze-text", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "NO_USABLE_TEXT");
    }

    #[tokio::test]
    async fn demo_runs_bundled_report() {
        let response = test_app()
            .oneshot(Request::get("/demo").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["filename"], "demo_medical_report.pdf");
        assert_eq!(json["analysis_type"], "Rule-based");
        let conditions = json["analysis"]["patient_summary"]["detected_conditions"]
            .as_array()
            .unwrap();
        assert!(conditions
            .iter()
            .any(|c| c["name"] == "Cardiovascular Risk Factors"));
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let response = test_app()
            .oneshot(Request::get("/nonexistent").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
