use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// BodySystem
// ---------------------------------------------------------------------------

/// Body system a lab test belongs to; used to group findings in the
/// clinician summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodySystem {
    Lipid,
    Metabolic,
    Diabetes,
    Cardiovascular,
    Hematology,
    Kidney,
    Liver,
    Endocrine,
    Nutritional,
    TumorMarker,
    General,
}

impl BodySystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lipid => "lipid",
            Self::Metabolic => "metabolic",
            Self::Diabetes => "diabetes",
            Self::Cardiovascular => "cardiovascular",
            Self::Hematology => "hematology",
            Self::Kidney => "kidney",
            Self::Liver => "liver",
            Self::Endocrine => "endocrine",
            Self::Nutritional => "nutritional",
            Self::TumorMarker => "tumor_marker",
            Self::General => "general",
        }
    }
}

// ---------------------------------------------------------------------------
// Extracted values and demographics
// ---------------------------------------------------------------------------

/// A single lab measurement pulled out of the report text.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedValue {
    pub value: f64,
    pub unit: String,
}

/// Insertion-ordered collection of extracted values keyed by test id.
/// The first regex match per test wins; later mentions are ignored.
#[derive(Debug, Clone, Default)]
pub struct ExtractedValues {
    entries: Vec<(String, ExtractedValue)>,
}

impl ExtractedValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value unless the test was already extracted.
    pub fn insert(&mut self, test_id: &str, value: f64, unit: String) {
        if self.get(test_id).is_none() {
            self.entries
                .push((test_id.to_string(), ExtractedValue { value, unit }));
        }
    }

    pub fn get(&self, test_id: &str) -> Option<&ExtractedValue> {
        self.entries
            .iter()
            .find(|(id, _)| id == test_id)
            .map(|(_, v)| v)
    }

    /// Numeric value for a test, if extracted.
    pub fn value(&self, test_id: &str) -> Option<f64> {
        self.get(test_id).map(|v| v.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExtractedValue)> {
        self.entries.iter().map(|(id, v)| (id.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ExtractedValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, value) in &self.entries {
            map.serialize_entry(id, value)?;
        }
        map.end()
    }
}

/// Patient demographics; every field is independently matched and optional.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Demographics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_date: Option<String>,
}

impl Demographics {
    pub fn is_empty(&self) -> bool {
        self.age.is_none()
            && self.gender.is_none()
            && self.patient_name.is_none()
            && self.report_date.is_none()
    }
}

// ---------------------------------------------------------------------------
// Findings
// ---------------------------------------------------------------------------

/// Where a quantitative value sits relative to its normal band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValueStatus {
    Low,
    Normal,
    High,
}

impl ValueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Normal => "Normal",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal,
    Mild,
    Moderate,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Critical => "critical",
        }
    }
}

/// A single observation tagged with a severity: either a lab value compared
/// against its reference band, or a snippet of report text around a severity
/// keyword.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Finding {
    Quantitative(QuantFinding),
    Textual(TextualFinding),
}

impl Finding {
    pub fn severity(&self) -> Severity {
        match self {
            Self::Quantitative(f) => f.severity,
            Self::Textual(f) => f.severity,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuantFinding {
    pub test: String,
    pub value: String,
    pub status: ValueStatus,
    pub severity: Severity,
    pub reference_range: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextualFinding {
    pub finding: String,
    pub severity: Severity,
    pub source: String,
}

// ---------------------------------------------------------------------------
// Detected conditions
// ---------------------------------------------------------------------------

/// Rule-derived confidence tier, not a probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Confidence {
    Moderate,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

/// A named clinical pattern inferred from extracted values.
#[derive(Debug, Clone, Serialize)]
pub struct DetectedCondition {
    pub name: String,
    pub confidence: Confidence,
    pub evidence: Vec<String>,
    pub explanation: String,
    pub complications_risk: String,
    pub management: String,
}

// ---------------------------------------------------------------------------
// Risk assessment
// ---------------------------------------------------------------------------

/// Ordered overall risk scale shared by both scoring procedures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskLevel {
    Low,
    #[serde(rename = "Low-Moderate")]
    LowModerate,
    Moderate,
    #[serde(rename = "Moderate-High")]
    ModerateHigh,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::LowModerate => "Low-Moderate",
            Self::Moderate => "Moderate",
            Self::ModerateHigh => "Moderate-High",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityDistribution {
    pub critical: usize,
    pub moderate: usize,
    pub mild: usize,
    pub normal: usize,
}

/// Risk assessment derived from findings; consumed by the clinician summary.
#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    pub overall_risk: RiskLevel,
    pub risk_score: u32,
    pub risk_percentage: u32,
    pub risk_factors: Vec<String>,
    pub severity_distribution: SeverityDistribution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Urgency {
    Routine,
    Prompt,
    Urgent,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Routine => "Routine",
            Self::Prompt => "Prompt",
            Self::Urgent => "Urgent",
        }
    }
}

/// Risk analysis derived from detected conditions; consumed by the patient
/// summary. Kept as a distinct operation from [`RiskAssessment`] — the two
/// scorers feed different audiences and use different weight scales.
#[derive(Debug, Clone, Serialize)]
pub struct ConditionRiskAnalysis {
    pub overall_risk: RiskLevel,
    pub risk_score: u32,
    pub risk_percentage: u32,
    pub risk_description: String,
    pub risk_factors: Vec<String>,
    pub urgency: Urgency,
}

// ---------------------------------------------------------------------------
// Narrative summaries
// ---------------------------------------------------------------------------

/// Plain-language interpretation of one lab value for the patient summary.
#[derive(Debug, Clone, Serialize)]
pub struct ValueAnalysis {
    pub test: String,
    pub value: String,
    pub status: String,
    pub severity: String,
    pub summary: String,
    pub clinical_significance: String,
    pub reference_range: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatientSummary {
    pub demographics: Demographics,
    pub key_findings: Vec<String>,
    pub detailed_analysis: Vec<ValueAnalysis>,
    pub detected_conditions: Vec<DetectedCondition>,
    pub risk_analysis: ConditionRiskAnalysis,
    pub recommendations: Vec<String>,
    pub next_steps: Vec<String>,
    pub lifestyle_modifications: Vec<String>,
    pub monitoring_plan: Vec<String>,
}

/// One row of the clinician-facing lab value table.
#[derive(Debug, Clone, Serialize)]
pub struct LabValueRow {
    pub test: String,
    pub value: String,
    pub reference: String,
    pub status: String,
    pub category: BodySystem,
}

/// Findings for one body system, in first-occurrence order.
#[derive(Debug, Clone, Serialize)]
pub struct SystemFindings {
    pub system: BodySystem,
    pub findings: Vec<Finding>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClinicalAssessment {
    pub report_type: String,
    pub patient_demographics: Demographics,
    pub significant_findings: Vec<Finding>,
    pub normal_findings: Vec<Finding>,
    pub systems_reviewed: Vec<BodySystem>,
    pub clinical_interpretation: String,
    pub differential_diagnoses: Vec<String>,
    pub recommended_workup: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorSummary {
    pub clinical_assessment: ClinicalAssessment,
    pub lab_values_summary: Vec<LabValueRow>,
    pub risk_assessment: RiskAssessment,
    pub findings_by_system: Vec<SystemFindings>,
    pub follow_up_recommendations: Vec<String>,
    pub specialist_referrals: Vec<String>,
    pub medication_considerations: Vec<String>,
}

// ---------------------------------------------------------------------------
// Report type and final result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    LabReport,
    Imaging,
    Cardiology,
    Pathology,
    Consultation,
    General,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LabReport => "lab_report",
            Self::Imaging => "imaging",
            Self::Cardiology => "cardiology",
            Self::Pathology => "pathology",
            Self::Consultation => "consultation",
            Self::General => "general",
        }
    }

    /// Human-readable title, e.g. "Lab Report".
    pub fn title(&self) -> &'static str {
        match self {
            Self::LabReport => "Lab Report",
            Self::Imaging => "Imaging",
            Self::Cardiology => "Cardiology",
            Self::Pathology => "Pathology",
            Self::Consultation => "Consultation",
            Self::General => "General",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessingMetadata {
    pub text_length: usize,
    pub filename: String,
    pub timestamp: String,
}

/// The sole externally visible artifact of the analysis core.
/// Assembled fresh per document; create-once, return, discard.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub patient_summary: PatientSummary,
    pub doctor_summary: DoctorSummary,
    pub report_type: ReportType,
    pub extracted_values: ExtractedValues,
    pub analysis_confidence: f64,
    pub processing_metadata: ProcessingMetadata,
}

/// Format a numeric value without a trailing `.0` for whole numbers.
pub(crate) fn fmt_num(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracted_values_first_match_wins() {
        let mut values = ExtractedValues::new();
        values.insert("glucose", 110.0, "mg/dL".into());
        values.insert("glucose", 95.0, "mg/dL".into());
        assert_eq!(values.value("glucose"), Some(110.0));
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn extracted_values_serializes_as_map() {
        let mut values = ExtractedValues::new();
        values.insert("glucose", 110.0, "mg/dL".into());
        let json = serde_json::to_value(&values).unwrap();
        assert_eq!(json["glucose"]["value"], 110.0);
        assert_eq!(json["glucose"]["unit"], "mg/dL");
    }

    #[test]
    fn risk_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::LowModerate);
        assert!(RiskLevel::LowModerate < RiskLevel::Moderate);
        assert!(RiskLevel::Moderate < RiskLevel::ModerateHigh);
        assert!(RiskLevel::ModerateHigh < RiskLevel::High);
    }

    #[test]
    fn risk_level_serializes_with_hyphens() {
        assert_eq!(
            serde_json::to_value(RiskLevel::ModerateHigh).unwrap(),
            "Moderate-High"
        );
        assert_eq!(serde_json::to_value(RiskLevel::Low).unwrap(), "Low");
    }

    #[test]
    fn fmt_num_trims_whole_numbers() {
        assert_eq!(fmt_num(130.0), "130");
        assert_eq!(fmt_num(6.2), "6.2");
        assert_eq!(fmt_num(0.6), "0.6");
    }
}
