use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use medisense::analysis::{AnalysisEngine, ReferenceData};
use medisense::api::{app_router, AppState};
use medisense::llm::{ChatCompletionsClient, LlmAnalyzer};
use medisense::config;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    // Reference tables are loaded once and shared read-only across requests.
    let reference = Arc::new(ReferenceData::standard());
    let engine = Arc::new(AnalysisEngine::new(reference));
    let llm = Arc::new(LlmAnalyzer::new(ChatCompletionsClient::from_env()));

    if !llm.is_configured() {
        tracing::warn!("OPENAI_API_KEY not set; LLM analysis disabled, rule-based only");
    }

    let state = AppState { engine, llm };
    let addr = config::bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");
    tracing::info!(%addr, "MediSense API listening");

    axum::serve(listener, app_router(state))
        .await
        .expect("Server error");
}
