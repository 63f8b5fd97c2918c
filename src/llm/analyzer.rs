use chrono::Utc;

use super::client::ChatClient;
use super::types::{LlmAnalysis, LlmFinding, LlmRiskAssessment};

const SYSTEM_PROMPT: &str = "You are MediSense AI, an advanced medical AI assistant designed to help analyze medical documents and provide healthcare insights.

IMPORTANT GUIDELINES:
- Always emphasize that you provide informational support, not medical diagnosis
- Recommend consulting qualified healthcare professionals for medical decisions
- Be thorough, accurate, and empathetic in your responses
- Use medical terminology appropriately while remaining accessible
- Highlight any concerning findings that may need immediate attention
- Provide evidence-based recommendations when possible

Always maintain professional medical ethics and patient safety as top priorities.";

/// Maximum document length forwarded to the model.
const MAX_DOCUMENT_CHARS: usize = 2000;

/// LLM-backed analysis strategy.
///
/// An alternate, optional strategy behind the same response envelope as the
/// deterministic engine. `analyze` never fails: any error is converted into
/// a fixed, clearly-marked degraded response with `ai_powered = false`.
pub struct LlmAnalyzer<C: ChatClient> {
    client: C,
}

impl<C: ChatClient> LlmAnalyzer<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    pub async fn analyze(&self, text: &str) -> LlmAnalysis {
        if !self.client.is_configured() {
            return self.degraded_response(text, None);
        }

        let prompt = analysis_prompt(text);
        let reply = match self.client.complete(SYSTEM_PROMPT, &prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "LLM analysis failed, returning degraded response");
                return self.degraded_response(text, Some(e.to_string()));
            }
        };

        let mut analysis = match parse_reply(&reply) {
            Some(analysis) => analysis,
            None => {
                tracing::warn!("LLM reply carried no parseable JSON, structuring raw text");
                structured_from_text(&reply)
            }
        };

        analysis.confidence_score = 90;
        analysis.analysis_method = "AI-powered with medical knowledge base".to_string();
        analysis.model_used = self.client.model().to_string();
        analysis.timestamp = Utc::now().to_rfc3339();
        analysis.ai_powered = true;
        analysis
    }

    fn degraded_response(&self, text: &str, error: Option<String>) -> LlmAnalysis {
        let summary = match &error {
            Some(e) => format!("Document processed ({} characters) - AI Error: {e}", text.len()),
            None => format!(
                "Document processed ({} characters) - AI configuration needed",
                text.len()
            ),
        };

        LlmAnalysis {
            summary,
            findings: vec![LlmFinding {
                description: "Document Upload".to_string(),
                value: format!("{} characters processed", text.len()),
                interpretation:
                    "Document successfully received. Configure an API key for AI-powered analysis."
                        .to_string(),
                severity: "informational".to_string(),
            }],
            risk_assessment: LlmRiskAssessment {
                overall_risk: "Unable to assess - AI configuration required".to_string(),
                risk_factors: vec!["AI analysis unavailable".to_string()],
                immediate_concerns: vec![],
            },
            recommendations: vec![
                "Configure OPENAI_API_KEY environment variable".to_string(),
                "Restart the application after API key configuration".to_string(),
                "Consult healthcare provider for professional interpretation".to_string(),
            ],
            follow_up: vec!["Set up AI configuration for enhanced analysis".to_string()],
            lifestyle_advice: vec!["Maintain general healthy lifestyle practices".to_string()],
            provider_questions: vec!["Discuss document with healthcare provider".to_string()],
            confidence_score: 20,
            analysis_method: "Basic processing (AI unavailable)".to_string(),
            model_used: String::new(),
            timestamp: Utc::now().to_rfc3339(),
            ai_powered: false,
            note: Some("Enable AI features by configuring an API key".to_string()),
        }
    }
}

fn analysis_prompt(text: &str) -> String {
    let truncated: String = text.chars().take(MAX_DOCUMENT_CHARS).collect();
    format!(
        r#"Analyze the following medical document comprehensively:

DOCUMENT TO ANALYZE:
{truncated}

Please provide a detailed medical analysis in JSON format with these exact fields:
{{
    "summary": "Brief overview of the document and key findings",
    "findings": [
        {{
            "description": "Name of the finding/test/measurement",
            "value": "Measured or observed value",
            "interpretation": "Clinical interpretation and significance",
            "severity": "normal/mild/moderate/severe/critical"
        }}
    ],
    "risk_assessment": {{
        "overall_risk": "low/moderate/high/critical",
        "risk_factors": ["List of identified risk factors"],
        "immediate_concerns": ["Any findings requiring urgent attention"]
    }},
    "recommendations": [
        "Specific actionable recommendations based on findings"
    ],
    "follow_up": [
        "Required follow-up actions, tests, or appointments"
    ],
    "lifestyle_advice": [
        "Lifestyle modifications and preventive measures"
    ],
    "provider_questions": [
        "Questions to ask healthcare provider about these results"
    ]
}}"#
    )
}

/// Extract and deserialize the first JSON object span in the model reply.
fn parse_reply(reply: &str) -> Option<LlmAnalysis> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&reply[start..=end]).ok()
}

/// Build a structured response from a free-text reply that carried no JSON.
fn structured_from_text(reply: &str) -> LlmAnalysis {
    let clip = |s: &str, n: usize| -> String { s.chars().take(n).collect() };

    LlmAnalysis {
        summary: clip(reply, 200),
        findings: vec![LlmFinding {
            description: "AI Medical Analysis".to_string(),
            value: "Comprehensive review completed".to_string(),
            interpretation: clip(reply, 400),
            severity: "informational".to_string(),
        }],
        risk_assessment: LlmRiskAssessment {
            overall_risk: "See detailed analysis".to_string(),
            risk_factors: vec!["Detailed analysis provided".to_string()],
            immediate_concerns: vec![],
        },
        recommendations: vec![
            "Consult healthcare provider for interpretation".to_string()
        ],
        follow_up: vec!["Discuss results with healthcare provider".to_string()],
        lifestyle_advice: vec!["Follow general health guidelines".to_string()],
        provider_questions: vec!["Review AI analysis with your doctor".to_string()],
        confidence_score: 0,
        analysis_method: String::new(),
        model_used: String::new(),
        timestamp: String::new(),
        ai_powered: false,
        note: None,
    }
}
