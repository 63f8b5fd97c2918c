use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisEngine, AnalysisResult};
use crate::llm::{ChatCompletionsClient, LlmAnalysis, LlmAnalyzer};

/// Shared handler state: the deterministic engine and the optional LLM
/// strategy, both behind `Arc` for cheap per-request cloning.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<AnalysisEngine>,
    pub llm: Arc<LlmAnalyzer<ChatCompletionsClient>>,
}

fn default_filename() -> String {
    "text_input.txt".to_string()
}

fn default_use_llm() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub text: String,
    #[serde(default = "default_filename")]
    pub filename: String,
    #[serde(default = "default_use_llm")]
    pub use_llm: bool,
}

/// One analysis payload regardless of which strategy produced it.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AnalysisPayload {
    RuleBased(Box<AnalysisResult>),
    Llm(Box<LlmAnalysis>),
}

/// Response envelope shared by both strategies.
#[derive(Debug, Serialize)]
pub struct AnalysisEnvelope {
    pub success: bool,
    pub filename: String,
    pub analysis: AnalysisPayload,
    pub analysis_type: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_apply() {
        let request: AnalyzeTextRequest =
            serde_json::from_str(r#"{"text": "Glucose: 110 mg/dL"}"#).unwrap();
        assert_eq!(request.filename, "text_input.txt");
        assert!(request.use_llm);
    }

    #[test]
    fn request_overrides_accepted() {
        let request: AnalyzeTextRequest = serde_json::from_str(
            r#"{"text": "x", "filename": "labs.pdf", "use_llm": false}"#,
        )
        .unwrap();
        assert_eq!(request.filename, "labs.pdf");
        assert!(!request.use_llm);
    }
}
