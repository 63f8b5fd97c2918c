use super::reference::ReferenceData;
use super::types::{
    fmt_num, BodySystem, ClinicalAssessment, Demographics, DoctorSummary, ExtractedValues,
    Finding, LabValueRow, ReportType, RiskAssessment, RiskLevel, Severity, SystemFindings,
};

const MAX_ABNORMAL_IN_NARRATIVE: usize = 5;
const MAX_DIFFERENTIALS: usize = 8;
const MAX_WORKUP: usize = 10;

/// Build the clinician-facing summary from the analysis outputs.
pub fn build_doctor_summary(
    demographics: Demographics,
    values: &ExtractedValues,
    findings: &[Finding],
    risk_assessment: RiskAssessment,
    report_type: ReportType,
    reference: &ReferenceData,
) -> DoctorSummary {
    let findings_by_system = group_by_system(findings, values, reference);
    let systems_reviewed = findings_by_system.iter().map(|s| s.system).collect();

    let significant_findings: Vec<Finding> = findings
        .iter()
        .filter(|f| matches!(f.severity(), Severity::Moderate | Severity::Critical))
        .cloned()
        .collect();
    let normal_findings: Vec<Finding> = findings
        .iter()
        .filter(|f| f.severity() == Severity::Normal)
        .cloned()
        .collect();

    let clinical_interpretation =
        clinical_assessment_text(values, &risk_assessment, &demographics, reference);

    let mut differential_diagnoses = differential_diagnoses(values);
    differential_diagnoses.truncate(MAX_DIFFERENTIALS);
    let mut recommended_workup = recommended_workup(values);
    recommended_workup.truncate(MAX_WORKUP);

    let clinical_assessment = ClinicalAssessment {
        report_type: report_type.title().to_string(),
        patient_demographics: demographics,
        significant_findings,
        normal_findings,
        systems_reviewed,
        clinical_interpretation,
        differential_diagnoses,
        recommended_workup,
    };

    DoctorSummary {
        clinical_assessment,
        lab_values_summary: summarize_lab_values(values, reference),
        follow_up_recommendations: professional_recommendations(&risk_assessment, findings),
        specialist_referrals: specialist_referrals(values),
        medication_considerations: medication_considerations(values),
        risk_assessment,
        findings_by_system,
    }
}

/// Group quantitative findings by body system, in first-occurrence order.
/// Textual findings carry no system and are left out of the grouping.
fn group_by_system(
    findings: &[Finding],
    values: &ExtractedValues,
    reference: &ReferenceData,
) -> Vec<SystemFindings> {
    let mut groups: Vec<SystemFindings> = Vec::new();

    for finding in findings {
        let Finding::Quantitative(quant) = finding else {
            continue;
        };
        let system = values
            .iter()
            .find_map(|(test_id, _)| {
                let range = reference.get(test_id)?;
                (range.label == quant.test).then_some(range.system)
            })
            .unwrap_or(BodySystem::General);

        match groups.iter_mut().find(|g| g.system == system) {
            Some(group) => group.findings.push(finding.clone()),
            None => groups.push(SystemFindings {
                system,
                findings: vec![finding.clone()],
            }),
        }
    }

    groups
}

/// Concatenated clinical-assessment narrative: demographics, critical
/// values, abnormal values, overall risk, and detected clinical patterns.
fn clinical_assessment_text(
    values: &ExtractedValues,
    risk: &RiskAssessment,
    demographics: &Demographics,
    reference: &ReferenceData,
) -> String {
    let mut parts = Vec::new();

    if !demographics.is_empty() {
        let mut demo = String::from("Patient demographics: ");
        if let Some(age) = demographics.age {
            demo.push_str(&format!("Age {age}, "));
        }
        if let Some(gender) = &demographics.gender {
            demo.push_str(&format!("{gender}, "));
        }
        parts.push(demo.trim_end_matches(", ").to_string());
    }

    let mut abnormal_values = Vec::new();
    let mut critical_values = Vec::new();
    for (test_id, extracted) in values.iter() {
        let Some(range) = reference.get(test_id) else {
            continue;
        };
        let (low, high) = range.normal;
        let value = extracted.value;
        if value < low || value > high {
            let entry = format!("{} {} {}", range.label, fmt_num(value), extracted.unit);
            // Markedly out of range: beyond 150% of the upper or below 50%
            // of the lower bound.
            if value > high * 1.5 || value < low * 0.5 {
                critical_values.push(entry);
            } else {
                abnormal_values.push(entry);
            }
        }
    }

    if !critical_values.is_empty() {
        parts.push(format!(
            "CRITICAL VALUES: {} - require immediate clinical correlation",
            critical_values.join(", ")
        ));
    }
    if !abnormal_values.is_empty() {
        abnormal_values.truncate(MAX_ABNORMAL_IN_NARRATIVE);
        parts.push(format!("Abnormal findings: {}", abnormal_values.join(", ")));
    }

    parts.push(format!(
        "Overall clinical risk assessment: {}",
        risk.overall_risk.as_str()
    ));

    let patterns = detect_clinical_patterns(values);
    if !patterns.is_empty() {
        parts.push(format!("Clinical pattern analysis: {patterns}"));
    }

    parts.join(". ") + "."
}

/// Detect co-occurrence patterns across extracted values, joined into one
/// sentence fragment.
fn detect_clinical_patterns(values: &ExtractedValues) -> String {
    let mut patterns = Vec::new();

    let mut metabolic_indicators = 0;
    if values.value("glucose").is_some_and(|v| v >= 100.0) {
        metabolic_indicators += 1;
    }
    if values.value("triglycerides").is_some_and(|v| v >= 150.0) {
        metabolic_indicators += 1;
    }
    if values.value("hdl").is_some_and(|v| v < 40.0) {
        metabolic_indicators += 1;
    }
    if values
        .value("blood_pressure_systolic")
        .is_some_and(|v| v >= 130.0)
    {
        metabolic_indicators += 1;
    }
    if metabolic_indicators >= 3 {
        patterns.push("metabolic syndrome pattern present");
    } else if metabolic_indicators == 2 {
        patterns.push("partial metabolic syndrome pattern");
    }

    if values.value("glucose").is_some_and(|v| v >= 126.0)
        || values.value("hba1c").is_some_and(|v| v >= 6.5)
    {
        patterns.push("diabetes mellitus pattern");
    } else if values.value("glucose").is_some_and(|v| v >= 100.0)
        || values.value("hba1c").is_some_and(|v| v >= 5.7)
    {
        patterns.push("prediabetes pattern");
    }

    let mut cv_risk_factors = 0;
    if values.value("cholesterol").is_some_and(|v| v >= 200.0) {
        cv_risk_factors += 1;
    }
    if values.value("ldl").is_some_and(|v| v >= 130.0) {
        cv_risk_factors += 1;
    }
    if values.value("hdl").is_some_and(|v| v < 40.0) {
        cv_risk_factors += 1;
    }
    if cv_risk_factors >= 2 {
        patterns.push("high cardiovascular risk profile");
    }

    if values.value("alt").is_some_and(|v| v > 56.0)
        || values.value("ast").is_some_and(|v| v > 40.0)
    {
        patterns.push("hepatic enzyme elevation pattern");
    }

    patterns.join(", ")
}

/// Differential diagnoses per abnormal-value cluster.
fn differential_diagnoses(values: &ExtractedValues) -> Vec<String> {
    let mut differentials = Vec::new();

    if values.value("glucose").is_some_and(|v| v >= 126.0)
        || values.value("hba1c").is_some_and(|v| v >= 6.5)
    {
        differentials.extend(
            [
                "Type 2 Diabetes Mellitus (most likely given age/pattern)",
                "Type 1 Diabetes Mellitus (consider if younger patient or rapid onset)",
                "Secondary diabetes (medication-induced, pancreatic disease)",
            ]
            .map(String::from),
        );
    }

    let cv_abnormal = values.value("cholesterol").is_some_and(|v| v >= 240.0)
        || values.value("ldl").is_some_and(|v| v >= 160.0)
        || values
            .value("blood_pressure_systolic")
            .is_some_and(|v| v >= 140.0);
    if cv_abnormal {
        differentials.extend(
            [
                "Primary hyperlipidemia/dyslipidemia",
                "Essential hypertension",
                "Metabolic syndrome",
                "Familial hypercholesterolemia (if very high cholesterol)",
            ]
            .map(String::from),
        );
    }

    if values.value("creatinine").is_some_and(|v| v >= 1.5)
        || values.value("bun").is_some_and(|v| v >= 30.0)
    {
        differentials.extend(
            [
                "Chronic kidney disease",
                "Acute kidney injury",
                "Diabetic nephropathy",
                "Hypertensive nephropathy",
            ]
            .map(String::from),
        );
    }

    if values.value("alt").is_some_and(|v| v > 100.0)
        || values.value("ast").is_some_and(|v| v > 80.0)
    {
        differentials.extend(
            [
                "Non-alcoholic fatty liver disease",
                "Medication-induced hepatotoxicity",
                "Viral hepatitis",
                "Alcoholic liver disease",
            ]
            .map(String::from),
        );
    }

    differentials
}

/// Recommended additional workup, threshold-triggered per domain.
fn recommended_workup(values: &ExtractedValues) -> Vec<String> {
    let mut workup = Vec::new();

    if values.value("glucose").is_some_and(|v| v >= 100.0)
        || values.value("hba1c").is_some_and(|v| v >= 5.7)
    {
        workup.extend(
            [
                "Fasting glucose confirmation if not already done",
                "Comprehensive diabetic panel (microalbumin, diabetic eye exam)",
                "Lipid panel if not recent",
                "Diabetic foot exam",
            ]
            .map(String::from),
        );
    }

    if values.value("cholesterol").is_some_and(|v| v >= 200.0)
        || values
            .value("blood_pressure_systolic")
            .is_some_and(|v| v >= 130.0)
    {
        workup.extend(
            [
                "Cardiovascular risk stratification (ASCVD risk calculator)",
                "EKG to assess for cardiac changes",
                "Consider echocardiogram if indicated",
                "Ankle-brachial index if peripheral artery disease suspected",
            ]
            .map(String::from),
        );
    }

    if values.value("creatinine").is_some_and(|v| v >= 1.2) {
        workup.extend(
            [
                "Estimated GFR calculation",
                "Urinalysis with microscopy",
                "Urine microalbumin",
                "Renal ultrasound if GFR <60",
            ]
            .map(String::from),
        );
    }

    workup.extend(
        [
            "Complete metabolic panel if not done within 1 year",
            "Thyroid function testing if not recent",
            "Vitamin D level assessment",
        ]
        .map(String::from),
    );

    workup
}

fn specialist_referrals(values: &ExtractedValues) -> Vec<String> {
    let mut referrals = Vec::new();

    if values.value("glucose").is_some_and(|v| v >= 126.0)
        || values.value("hba1c").is_some_and(|v| v >= 6.5)
    {
        referrals.push("Endocrinology - for diabetes management and optimization".to_string());
    } else if values.value("glucose").is_some_and(|v| v >= 100.0)
        || values.value("hba1c").is_some_and(|v| v >= 5.7)
    {
        referrals
            .push("Endocrinology or Diabetes Educator - for prediabetes management".to_string());
    }

    let high_cv_risk = values.value("cholesterol").is_some_and(|v| v >= 240.0)
        || values.value("ldl").is_some_and(|v| v >= 160.0)
        || values
            .value("blood_pressure_systolic")
            .is_some_and(|v| v >= 160.0);
    if high_cv_risk {
        referrals
            .push("Cardiology - for cardiovascular risk assessment and management".to_string());
    }

    if values.value("creatinine").is_some_and(|v| v >= 1.5) {
        referrals.push("Nephrology - for kidney function evaluation".to_string());
    }

    if values.value("alt").is_some_and(|v| v > 100.0)
        || values.value("ast").is_some_and(|v| v > 100.0)
    {
        referrals
            .push("Gastroenterology/Hepatology - for liver function evaluation".to_string());
    }

    referrals
}

fn medication_considerations(values: &ExtractedValues) -> Vec<String> {
    let mut medications = Vec::new();

    if values.value("glucose").is_some_and(|v| v >= 126.0)
        || values.value("hba1c").is_some_and(|v| v >= 6.5)
    {
        medications.extend(
            [
                "Consider metformin as first-line diabetes therapy",
                "Evaluate need for additional antidiabetic agents based on HbA1c goal",
                "Consider insulin therapy if severe hyperglycemia",
            ]
            .map(String::from),
        );
    }

    if values.value("cholesterol").is_some_and(|v| v >= 200.0) {
        medications.push("Consider statin therapy for cholesterol management".to_string());
    }

    if values
        .value("blood_pressure_systolic")
        .is_some_and(|v| v >= 130.0)
        || values
            .value("blood_pressure_diastolic")
            .is_some_and(|v| v >= 80.0)
    {
        medications.extend(
            [
                "Consider ACE inhibitor or ARB for blood pressure management",
                "Evaluate need for additional antihypertensive agents",
            ]
            .map(String::from),
        );
    }

    let mut cv_risk_factors = 0;
    if values.value("cholesterol").is_some_and(|v| v >= 200.0) {
        cv_risk_factors += 1;
    }
    if values.value("glucose").is_some_and(|v| v >= 100.0) {
        cv_risk_factors += 1;
    }
    if values
        .value("blood_pressure_systolic")
        .is_some_and(|v| v >= 130.0)
    {
        cv_risk_factors += 1;
    }
    if cv_risk_factors >= 2 {
        medications.push(
            "Consider low-dose aspirin for cardiovascular protection (if no contraindications)"
                .to_string(),
        );
    }

    medications
}

fn summarize_lab_values(values: &ExtractedValues, reference: &ReferenceData) -> Vec<LabValueRow> {
    let mut rows = Vec::new();

    for (test_id, extracted) in values.iter() {
        let Some(range) = reference.get(test_id) else {
            continue;
        };
        let status = if extracted.value < range.normal.0 {
            "Low"
        } else if extracted.value > range.normal.1 {
            "Elevated"
        } else {
            "Normal"
        };
        rows.push(LabValueRow {
            test: range.label.to_string(),
            value: format!("{} {}", fmt_num(extracted.value), extracted.unit),
            reference: format!(
                "{}-{} {}",
                fmt_num(range.normal.0),
                fmt_num(range.normal.1),
                range.unit
            ),
            status: status.to_string(),
            category: range.system,
        });
    }

    rows
}

fn professional_recommendations(risk: &RiskAssessment, findings: &[Finding]) -> Vec<String> {
    let mut recommendations = Vec::new();

    if risk.overall_risk == RiskLevel::High {
        recommendations.push("Consider immediate clinical correlation and intervention".to_string());
        recommendations.push("Patient may benefit from specialist referral".to_string());
    } else if risk.overall_risk == RiskLevel::Moderate {
        recommendations.push("Close monitoring and follow-up recommended".to_string());
        recommendations
            .push("Consider lifestyle interventions and possible pharmacotherapy".to_string());
    }

    if findings.iter().any(|f| f.severity() == Severity::Critical) {
        recommendations.push("Critical values noted - consider immediate clinical action".to_string());
    }

    recommendations.extend(
        [
            "Correlate with clinical presentation and patient history",
            "Consider serial monitoring of abnormal values",
            "Patient counseling on lifestyle modifications recommended",
        ]
        .map(String::from),
    );

    recommendations
}
