use std::env;

/// Application-level constants
pub const APP_NAME: &str = "MediSense";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> &'static str {
    "medisense=info,tower_http=warn"
}

/// Server bind address.
pub fn bind_addr() -> String {
    env::var("MEDISENSE_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string())
}

/// API key for the LLM strategy. Absent means the strategy is disabled and
/// requests fall back to the rule-based engine.
pub fn llm_api_key() -> Option<String> {
    env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty())
}

/// Base URL of the OpenAI-compatible chat-completions endpoint.
pub fn llm_base_url() -> String {
    env::var("MEDISENSE_LLM_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".to_string())
}

pub fn llm_model() -> String {
    env::var("MEDISENSE_LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string())
}

/// Bounded timeout for LLM requests, in seconds.
pub fn llm_timeout_secs() -> u64 {
    env::var("MEDISENSE_LLM_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(30)
}
