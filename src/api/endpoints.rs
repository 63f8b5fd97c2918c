use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::config;

use super::demo::{DEMO_FILENAME, DEMO_REPORT};
use super::error::ApiError;
use super::types::{AnalysisEnvelope, AnalysisPayload, AnalyzeTextRequest, AppState};

/// `GET /` — service banner.
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "MediSense - Medical Report Analysis API",
        "status": "running",
        "version": config::APP_VERSION,
    }))
}

/// `GET /health` — analyzer readiness.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let llm_status = if state.llm.is_configured() {
        "ready"
    } else {
        "needs_api_key"
    };
    Json(json!({
        "status": "healthy",
        "analyzers": {
            "rule_based": "ready",
            "llm": llm_status,
        },
    }))
}

/// `GET /ai-status` — LLM configuration status.
pub async fn ai_status(State(state): State<AppState>) -> Json<Value> {
    let configured = state.llm.is_configured();
    let status = if configured { "ready" } else { "configuration_needed" };
    Json(json!({
        "api_key_configured": configured,
        "model": state.llm.model(),
        "status": status,
        "features": {
            "document_analysis": configured,
        },
    }))
}

/// `POST /analyze-text` — analyze plain text through the selected strategy.
///
/// Blank text is the "extraction failed" surface: rejected before the core
/// runs. Otherwise the caller-supplied flag picks the strategy; the LLM path
/// is only taken when it is actually configured.
pub async fn analyze_text(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalysisEnvelope>, ApiError> {
    dispatch(&state, &request.text, &request.filename, request.use_llm).await
}

/// `GET /demo` — run the bundled demo report through the same dispatch.
pub async fn demo(State(state): State<AppState>) -> Result<Json<AnalysisEnvelope>, ApiError> {
    dispatch(&state, DEMO_REPORT, DEMO_FILENAME, true).await
}

async fn dispatch(
    state: &AppState,
    text: &str,
    filename: &str,
    use_llm: bool,
) -> Result<Json<AnalysisEnvelope>, ApiError> {
    if text.trim().is_empty() {
        return Err(ApiError::NoUsableText);
    }

    let (analysis, analysis_type) = if use_llm && state.llm.is_configured() {
        tracing::info!(filename, "Using LLM-powered analysis");
        (
            AnalysisPayload::Llm(Box::new(state.llm.analyze(text).await)),
            "LLM-powered",
        )
    } else {
        tracing::info!(filename, "Using rule-based analysis");
        (
            AnalysisPayload::RuleBased(Box::new(state.engine.analyze(text, filename))),
            "Rule-based",
        )
    };

    Ok(Json(AnalysisEnvelope {
        success: true,
        filename: filename.to_string(),
        analysis,
        analysis_type,
    }))
}
