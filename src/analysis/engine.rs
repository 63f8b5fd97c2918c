use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;

use super::conditions::detect_conditions;
use super::confidence::confidence_score;
use super::doctor::build_doctor_summary;
use super::extract::{detect_report_type, extract_demographics, extract_lab_values};
use super::findings::analyze_findings;
use super::normalize::clean_text;
use super::patient::build_patient_summary;
use super::reference::ReferenceData;
use super::risk::{assess_condition_risk, assess_findings_risk};
use super::types::{AnalysisResult, ProcessingMetadata};

/// Deterministic rule-based analysis engine.
///
/// Stateless per call: `analyze` is a pure function of its input text and the
/// immutable reference tables, safe for concurrent use from any number of
/// parallel requests.
pub struct AnalysisEngine {
    reference: Arc<ReferenceData>,
}

impl AnalysisEngine {
    pub fn new(reference: Arc<ReferenceData>) -> Self {
        Self { reference }
    }

    /// Analyze free-text medical report content.
    ///
    /// Total function: any input, including empty or non-medical text, yields
    /// a well-formed (if sparse) result.
    pub fn analyze(&self, text: &str, filename: &str) -> AnalysisResult {
        let start = Instant::now();

        let text = clean_text(text);
        let report_type = detect_report_type(&text);
        let values = extract_lab_values(&text, &self.reference);
        let demographics = extract_demographics(&text);

        let findings = analyze_findings(&text, &values, &self.reference);
        let risk_assessment = assess_findings_risk(&values, &findings);

        let conditions = detect_conditions(&values);
        let risk_analysis = assess_condition_risk(&conditions);

        let patient_summary = build_patient_summary(
            demographics.clone(),
            &values,
            &conditions,
            risk_analysis,
            &self.reference,
        );
        let doctor_summary = build_doctor_summary(
            demographics,
            &values,
            &findings,
            risk_assessment,
            report_type,
            &self.reference,
        );

        let analysis_confidence = confidence_score(&text, &values);

        tracing::info!(
            report_type = report_type.as_str(),
            values = values.len(),
            findings = findings.len(),
            conditions = conditions.len(),
            processing_ms = start.elapsed().as_millis() as u64,
            "Document analysis complete"
        );

        AnalysisResult {
            patient_summary,
            doctor_summary,
            report_type,
            analysis_confidence,
            processing_metadata: ProcessingMetadata {
                text_length: text.len(),
                filename: filename.to_string(),
                timestamp: Utc::now().to_rfc3339(),
            },
            extracted_values: values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::{Confidence, RiskLevel, Urgency};

    const LIPID_PANEL_REPORT: &str = "LABORATORY RESULTS: \
        Total Cholesterol: 245 mg/dL, LDL Cholesterol: 165 mg/dL, \
        HDL Cholesterol: 42 mg/dL, Fasting Glucose: 110 mg/dL, \
        HbA1c: 6.2%, Blood Pressure: 145/92 mmHg";

    fn engine() -> AnalysisEngine {
        AnalysisEngine::new(Arc::new(ReferenceData::standard()))
    }

    #[test]
    fn lipid_panel_end_to_end() {
        let result = engine().analyze(LIPID_PANEL_REPORT, "lipid_panel.pdf");

        let values = &result.extracted_values;
        assert_eq!(values.value("cholesterol"), Some(245.0));
        assert_eq!(values.value("ldl"), Some(165.0));
        assert_eq!(values.value("hdl"), Some(42.0));
        assert_eq!(values.value("glucose"), Some(110.0));
        assert_eq!(values.value("hba1c"), Some(6.2));
        assert_eq!(values.value("blood_pressure_systolic"), Some(145.0));
        assert_eq!(values.value("blood_pressure_diastolic"), Some(92.0));

        // Glucose and HbA1c are both in the prediabetic band; the two signals
        // together cross the diagnosis threshold.
        let conditions = &result.patient_summary.detected_conditions;
        let diabetes = conditions
            .iter()
            .find(|c| c.name == "Diabetes Mellitus")
            .expect("diabetes rule should fire on two prediabetic signals");
        assert_eq!(diabetes.confidence, Confidence::High);

        // Systolic 145, cholesterol 245, LDL 165 all trigger; HDL 42 does not.
        let cv = conditions
            .iter()
            .find(|c| c.name == "Cardiovascular Risk Factors")
            .expect("cv rule should fire");
        assert_eq!(cv.confidence, Confidence::High);
        assert_eq!(cv.evidence.len(), 3);

        // Diabetes High (+4) + Cardiovascular High (+3) = 7.
        let risk = &result.patient_summary.risk_analysis;
        assert_eq!(risk.risk_score, 7);
        assert_eq!(risk.overall_risk, RiskLevel::High);
        assert_eq!(risk.urgency, Urgency::Urgent);

        assert_eq!(result.report_type.as_str(), "lab_report");
        assert!(result.analysis_confidence > 0.5);
    }

    #[test]
    fn analysis_is_idempotent() {
        let engine = engine();
        let a = engine.analyze(LIPID_PANEL_REPORT, "report.pdf");
        let b = engine.analyze(LIPID_PANEL_REPORT, "report.pdf");

        assert_eq!(
            serde_json::to_value(&a.extracted_values).unwrap(),
            serde_json::to_value(&b.extracted_values).unwrap()
        );
        assert_eq!(
            serde_json::to_value(&a.patient_summary.detected_conditions).unwrap(),
            serde_json::to_value(&b.patient_summary.detected_conditions).unwrap()
        );
        assert_eq!(
            serde_json::to_value(&a.doctor_summary.risk_assessment).unwrap(),
            serde_json::to_value(&b.doctor_summary.risk_assessment).unwrap()
        );
        assert_eq!(
            serde_json::to_value(&a.patient_summary.risk_analysis).unwrap(),
            serde_json::to_value(&b.patient_summary.risk_analysis).unwrap()
        );
    }

    #[test]
    fn blank_input_yields_sparse_result() {
        let result = engine().analyze("", "empty.txt");
        assert!(result.extracted_values.is_empty());
        assert!(result.patient_summary.detected_conditions.is_empty());
        assert!(result.analysis_confidence <= 0.3);
        assert_eq!(result.report_type.as_str(), "general");
        assert_eq!(
            result.patient_summary.risk_analysis.overall_risk,
            RiskLevel::Low
        );
    }

    #[test]
    fn non_medical_text_never_fails() {
        let result = engine().analyze(
            "The quick brown fox jumps over the lazy dog. Nothing medical here at all.",
            "note.txt",
        );
        assert!(result.extracted_values.is_empty());
        assert!(result.analysis_confidence <= 0.3);
    }

    #[test]
    fn metadata_reflects_cleaned_text_and_filename() {
        let result = engine().analyze("  Glucose:   110 mg/dL  ", "labs.pdf");
        assert_eq!(result.processing_metadata.filename, "labs.pdf");
        assert_eq!(result.processing_metadata.text_length, "Glucose: 110 mg/dL".len());
        assert!(!result.processing_metadata.timestamp.is_empty());
    }

    #[test]
    fn doctor_summary_consumes_finding_based_scorer() {
        let result = engine().analyze(LIPID_PANEL_REPORT, "report.pdf");
        let risk = &result.doctor_summary.risk_assessment;
        // Cholesterol 245 (+3), LDL 165 (+3), BP 145/92 (+3), glucose 110 (+2),
        // HbA1c 6.2 (+2) = 13.
        assert_eq!(risk.risk_score, 13);
        assert_eq!(risk.overall_risk, RiskLevel::High);
        assert!(risk.risk_factors.contains(&"High total cholesterol".to_string()));
        assert!(risk.risk_factors.contains(&"Prediabetic HbA1c".to_string()));
    }
}
