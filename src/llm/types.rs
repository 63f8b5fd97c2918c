use serde::{Deserialize, Serialize};

/// Errors from the LLM-backed analysis strategy. These never reach the API
/// caller as failures; the analyzer converts them into a degraded response.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("LLM API key not configured")]
    NotConfigured,
    #[error("LLM request failed: {0}")]
    Request(String),
    #[error("LLM returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Failed to parse LLM response: {0}")]
    ResponseParsing(String),
}

/// Output schema of the LLM-backed strategy. Mirrors the deterministic
/// engine's role behind the shared response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmAnalysis {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub findings: Vec<LlmFinding>,
    #[serde(default)]
    pub risk_assessment: LlmRiskAssessment,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub follow_up: Vec<String>,
    #[serde(default)]
    pub lifestyle_advice: Vec<String>,
    #[serde(default)]
    pub provider_questions: Vec<String>,
    #[serde(default)]
    pub confidence_score: u32,
    #[serde(default)]
    pub analysis_method: String,
    #[serde(default)]
    pub model_used: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub ai_powered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmFinding {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub interpretation: String,
    #[serde(default)]
    pub severity: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmRiskAssessment {
    #[serde(default)]
    pub overall_risk: String,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    #[serde(default)]
    pub immediate_concerns: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_deserializes_with_missing_fields() {
        let analysis: LlmAnalysis =
            serde_json::from_str(r#"{"summary": "brief overview"}"#).unwrap();
        assert_eq!(analysis.summary, "brief overview");
        assert!(analysis.findings.is_empty());
        assert!(!analysis.ai_powered);
        assert!(analysis.note.is_none());
    }

    #[test]
    fn finding_fields_default() {
        let finding: LlmFinding =
            serde_json::from_str(r#"{"description": "Glucose", "value": "110 mg/dL"}"#).unwrap();
        assert_eq!(finding.description, "Glucose");
        assert!(finding.severity.is_empty());
    }
}
