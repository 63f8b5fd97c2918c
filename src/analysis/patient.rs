use super::conditions::general_analysis_insights;
use super::reference::{ReferenceData, ReferenceRange};
use super::types::{
    fmt_num, Confidence, ConditionRiskAnalysis, Demographics, DetectedCondition, ExtractedValues,
    PatientSummary, RiskLevel, Urgency, ValueAnalysis,
};

const MAX_KEY_FINDINGS: usize = 8;
const MAX_RECOMMENDATIONS: usize = 6;

// ---------------------------------------------------------------------------
// Per-test interpretation tables
// ---------------------------------------------------------------------------

/// Which side of a threshold a rule fires on. Rules are evaluated
/// top-to-bottom, first match wins; `Default` always matches.
enum Band {
    AtLeast(f64),
    Below(f64),
    Default,
}

impl Band {
    fn matches(&self, value: f64) -> bool {
        match self {
            Self::AtLeast(t) => value >= *t,
            Self::Below(t) => value < *t,
            Self::Default => true,
        }
    }
}

/// One row of a per-test interpretation table. The summary template carries
/// a `{value}` placeholder; the clinical significance is fixed text.
struct ValueRule {
    band: Band,
    status: &'static str,
    severity: &'static str,
    summary: &'static str,
    significance: &'static str,
}

static GLUCOSE_RULES: &[ValueRule] = &[
    ValueRule {
        band: Band::AtLeast(126.0),
        status: "Diabetic Range",
        severity: "high",
        summary: "Fasting glucose of {value} mg/dL indicates diabetes (≥126 mg/dL)",
        significance: "This level strongly suggests diabetes mellitus. Immediate medical attention and diabetes management are required.",
    },
    ValueRule {
        band: Band::AtLeast(100.0),
        status: "Prediabetic Range",
        severity: "moderate",
        summary: "Fasting glucose of {value} mg/dL indicates prediabetes (100-125 mg/dL)",
        significance: "This level indicates impaired glucose tolerance, which is a precursor to diabetes. Lifestyle changes can help prevent progression.",
    },
    ValueRule {
        band: Band::Default,
        status: "Normal",
        severity: "normal",
        summary: "Fasting glucose of {value} mg/dL is within normal range (70-99 mg/dL)",
        significance: "Glucose metabolism appears normal. Continue healthy lifestyle habits.",
    },
];

static HBA1C_RULES: &[ValueRule] = &[
    ValueRule {
        band: Band::AtLeast(6.5),
        status: "Diabetic Range",
        severity: "high",
        summary: "HbA1c of {value}% indicates diabetes (≥6.5%)",
        significance: "This reflects average blood sugar over 2-3 months and confirms diabetes diagnosis.",
    },
    ValueRule {
        band: Band::AtLeast(5.7),
        status: "Prediabetic Range",
        severity: "moderate",
        summary: "HbA1c of {value}% indicates prediabetes (5.7-6.4%)",
        significance: "This indicates increased risk for developing diabetes within 5 years.",
    },
    ValueRule {
        band: Band::Default,
        status: "Normal",
        severity: "normal",
        summary: "HbA1c of {value}% is optimal (<5.7%)",
        significance: "Excellent long-term glucose control.",
    },
];

static CHOLESTEROL_RULES: &[ValueRule] = &[
    ValueRule {
        band: Band::AtLeast(240.0),
        status: "High",
        severity: "high",
        summary: "Total cholesterol of {value} mg/dL is high (≥240 mg/dL)",
        significance: "Significantly increases risk of heart disease and stroke. Medical intervention likely needed.",
    },
    ValueRule {
        band: Band::AtLeast(200.0),
        status: "Borderline High",
        severity: "moderate",
        summary: "Total cholesterol of {value} mg/dL is borderline high (200-239 mg/dL)",
        significance: "Moderate cardiovascular risk. Dietary changes and monitoring recommended.",
    },
    ValueRule {
        band: Band::Default,
        status: "Normal",
        severity: "normal",
        summary: "Total cholesterol of {value} mg/dL is desirable (<200 mg/dL)",
        significance: "Good cardiovascular risk profile regarding cholesterol.",
    },
];

static LDL_RULES: &[ValueRule] = &[
    ValueRule {
        band: Band::AtLeast(160.0),
        status: "High",
        severity: "high",
        summary: "LDL cholesterol of {value} mg/dL is high (≥160 mg/dL)",
        significance: "\"Bad\" cholesterol is significantly elevated, substantially increasing heart disease risk.",
    },
    ValueRule {
        band: Band::AtLeast(130.0),
        status: "Borderline High",
        severity: "moderate",
        summary: "LDL cholesterol of {value} mg/dL is borderline high (130-159 mg/dL)",
        significance: "Moderately elevated \"bad\" cholesterol requires attention to prevent cardiovascular disease.",
    },
    ValueRule {
        band: Band::AtLeast(100.0),
        status: "Near Optimal",
        severity: "mild",
        summary: "LDL cholesterol of {value} mg/dL is near optimal (100-129 mg/dL)",
        significance: "Slightly elevated but manageable with lifestyle modifications.",
    },
    ValueRule {
        band: Band::Default,
        status: "Optimal",
        severity: "normal",
        summary: "LDL cholesterol of {value} mg/dL is optimal (<100 mg/dL)",
        significance: "Excellent \"bad\" cholesterol level, protective against heart disease.",
    },
];

static HDL_RULES: &[ValueRule] = &[
    ValueRule {
        band: Band::Below(40.0),
        status: "Low",
        severity: "moderate",
        summary: "HDL cholesterol of {value} mg/dL is low (<40 mg/dL for men, <50 mg/dL for women)",
        significance: "\"Good\" cholesterol is too low, reducing protection against heart disease.",
    },
    ValueRule {
        band: Band::AtLeast(60.0),
        status: "High (Protective)",
        severity: "optimal",
        summary: "HDL cholesterol of {value} mg/dL is high (≥60 mg/dL)",
        significance: "Excellent \"good\" cholesterol level, strongly protective against heart disease.",
    },
    ValueRule {
        band: Band::Default,
        status: "Acceptable",
        severity: "normal",
        summary: "HDL cholesterol of {value} mg/dL is acceptable",
        significance: "Adequate \"good\" cholesterol level.",
    },
];

static SYSTOLIC_RULES: &[ValueRule] = &[
    ValueRule {
        band: Band::AtLeast(140.0),
        status: "Stage 2 Hypertension",
        severity: "high",
        summary: "Systolic BP of {value} mmHg indicates Stage 2 hypertension (≥140 mmHg)",
        significance: "High blood pressure significantly increases risk of heart attack, stroke, and kidney disease. Medication likely needed.",
    },
    ValueRule {
        band: Band::AtLeast(130.0),
        status: "Stage 1 Hypertension",
        severity: "moderate",
        summary: "Systolic BP of {value} mmHg indicates Stage 1 hypertension (130-139 mmHg)",
        significance: "Elevated blood pressure increases cardiovascular risk. Lifestyle changes and possible medication needed.",
    },
    ValueRule {
        band: Band::AtLeast(120.0),
        status: "Elevated",
        severity: "mild",
        summary: "Systolic BP of {value} mmHg is elevated (120-129 mmHg)",
        significance: "Blood pressure is higher than optimal. Lifestyle modifications can help prevent progression to hypertension.",
    },
    ValueRule {
        band: Band::Default,
        status: "Normal",
        severity: "normal",
        summary: "Systolic BP of {value} mmHg is normal (<120 mmHg)",
        significance: "Excellent blood pressure reading, protective against cardiovascular disease.",
    },
];

fn rules_for(test_id: &str) -> Option<&'static [ValueRule]> {
    match test_id {
        "glucose" => Some(GLUCOSE_RULES),
        "hba1c" => Some(HBA1C_RULES),
        "cholesterol" => Some(CHOLESTEROL_RULES),
        "ldl" => Some(LDL_RULES),
        "hdl" => Some(HDL_RULES),
        "blood_pressure_systolic" => Some(SYSTOLIC_RULES),
        _ => None,
    }
}

fn render(template: &str, value: f64) -> String {
    template.replace("{value}", &fmt_num(value))
}

/// Plain-language interpretation of one extracted value. Tests without a
/// dedicated rule table fall through to the generic above/below/within
/// template.
pub(crate) fn analyze_value(
    range: &ReferenceRange,
    value: f64,
    unit: &str,
) -> ValueAnalysis {
    if let Some(rules) = rules_for(range.test_id) {
        let rule = rules
            .iter()
            .find(|r| r.band.matches(value))
            .expect("rule tables end with a catch-all rule");
        return ValueAnalysis {
            test: range.label.to_string(),
            value: format!("{} {}", fmt_num(value), unit),
            status: rule.status.to_string(),
            severity: rule.severity.to_string(),
            summary: render(rule.summary, value),
            clinical_significance: rule.significance.to_string(),
            reference_range: format!(
                "{}-{} {}",
                fmt_num(range.normal.0),
                fmt_num(range.normal.1),
                range.unit
            ),
        };
    }

    let label_lower = range.label.to_lowercase();
    let (status, severity, summary, significance) = if value < range.normal.0 {
        (
            "Low",
            "mild",
            format!("{} of {} {} is below normal range", range.label, fmt_num(value), unit),
            format!("Low {label_lower} may indicate underlying medical condition requiring evaluation."),
        )
    } else if value > range.normal.1 {
        (
            "High",
            "moderate",
            format!("{} of {} {} is above normal range", range.label, fmt_num(value), unit),
            format!("Elevated {label_lower} may indicate underlying medical condition requiring evaluation."),
        )
    } else {
        (
            "Normal",
            "normal",
            format!("{} of {} {} is within normal range", range.label, fmt_num(value), unit),
            format!("Normal {label_lower} level indicates good function in this area."),
        )
    };

    ValueAnalysis {
        test: range.label.to_string(),
        value: format!("{} {}", fmt_num(value), unit),
        status: status.to_string(),
        severity: severity.to_string(),
        summary,
        clinical_significance: significance,
        reference_range: format!(
            "{}-{} {}",
            fmt_num(range.normal.0),
            fmt_num(range.normal.1),
            range.unit
        ),
    }
}

// ---------------------------------------------------------------------------
// Summary assembly
// ---------------------------------------------------------------------------

/// Build the patient-facing summary from the analysis outputs.
pub fn build_patient_summary(
    demographics: Demographics,
    values: &ExtractedValues,
    conditions: &[DetectedCondition],
    risk_analysis: ConditionRiskAnalysis,
    reference: &ReferenceData,
) -> PatientSummary {
    let mut key_findings = Vec::new();
    let mut detailed_analysis = Vec::new();

    for (test_id, extracted) in values.iter() {
        if let Some(range) = reference.get(test_id) {
            let analysis = analyze_value(range, extracted.value, &extracted.unit);
            key_findings.push(analysis.summary.clone());
            detailed_analysis.push(analysis);
        }
    }

    for condition in conditions {
        key_findings.push(format!(
            "Analysis suggests possible {}: {}",
            condition.name, condition.explanation
        ));
    }

    let mut recommendations = intelligent_recommendations(conditions, &risk_analysis);
    recommendations.truncate(MAX_RECOMMENDATIONS);

    if key_findings.is_empty() {
        key_findings = general_analysis_insights(values, reference);
    }
    key_findings.truncate(MAX_KEY_FINDINGS);

    let next_steps = specific_next_steps(conditions, &risk_analysis);
    let lifestyle_modifications = lifestyle_recommendations(conditions);
    let monitoring_plan = monitoring_plan(conditions);

    PatientSummary {
        demographics,
        key_findings,
        detailed_analysis,
        detected_conditions: conditions.to_vec(),
        risk_analysis,
        recommendations,
        next_steps,
        lifestyle_modifications,
        monitoring_plan,
    }
}

/// Condition-specific action items, prioritized; deduplicated only by
/// truncation to the top N.
fn intelligent_recommendations(
    conditions: &[DetectedCondition],
    risk: &ConditionRiskAnalysis,
) -> Vec<String> {
    let mut recommendations: Vec<String> = Vec::new();

    for condition in conditions {
        if condition.name.contains("Diabetes") {
            recommendations.extend(
                [
                    "Schedule appointment with endocrinologist or diabetes specialist within 1-2 weeks",
                    "Begin blood glucose monitoring as directed by healthcare provider",
                    "Start diabetes-friendly diet plan with carbohydrate counting",
                    "Discuss diabetes medications (metformin, insulin) with doctor",
                ]
                .map(String::from),
            );
        } else if condition.name.contains("Prediabetes") {
            recommendations.extend(
                [
                    "Implement diabetes prevention program - aim to lose 5-10% of body weight",
                    "Increase physical activity to 150 minutes moderate exercise per week",
                    "Adopt low-glycemic diet rich in whole grains, vegetables, and lean proteins",
                    "Monitor fasting glucose every 3-6 months",
                ]
                .map(String::from),
            );
        } else if condition.name.contains("Cardiovascular") {
            recommendations.extend(
                [
                    "Schedule cardiology consultation for comprehensive risk assessment",
                    "Consider statin therapy discussion with physician for cholesterol management",
                    "Implement DASH diet (low sodium, rich in fruits/vegetables)",
                    "Begin regular aerobic exercise program as approved by doctor",
                ]
                .map(String::from),
            );
        } else if condition.name.contains("Kidney") {
            recommendations.extend(
                [
                    "Schedule nephrology consultation for kidney function evaluation",
                    "Ensure adequate hydration unless otherwise directed",
                    "Monitor and control blood pressure if elevated",
                    "Review all medications with doctor to avoid kidney-toxic drugs",
                ]
                .map(String::from),
            );
        }
    }

    if risk.overall_risk >= RiskLevel::ModerateHigh {
        recommendations.extend(
            [
                "Schedule comprehensive medical evaluation within 1-2 weeks",
                "Consider consultation with relevant specialists based on conditions identified",
                "Implement aggressive lifestyle modifications immediately",
            ]
            .map(String::from),
        );
    }

    recommendations.extend(
        [
            "Maintain regular sleep schedule (7-9 hours per night)",
            "Stay well-hydrated (8-10 glasses of water daily)",
            "Consider stress management techniques (meditation, yoga)",
            "Schedule regular preventive care appointments",
        ]
        .map(String::from),
    );

    recommendations
}

/// Urgency-gated next steps.
fn specific_next_steps(
    conditions: &[DetectedCondition],
    risk: &ConditionRiskAnalysis,
) -> Vec<String> {
    let mut next_steps = Vec::new();

    if risk.urgency == Urgency::Urgent {
        next_steps.push(
            "URGENT: Contact your healthcare provider immediately or visit emergency room if symptoms present"
                .to_string(),
        );
    }

    if risk.urgency == Urgency::Urgent || risk.urgency == Urgency::Prompt {
        next_steps.push(
            "Schedule follow-up appointment with your primary care physician within 1-2 weeks"
                .to_string(),
        );
    } else {
        next_steps.push("Discuss these results at your next routine medical appointment".to_string());
    }

    for condition in conditions {
        if condition.confidence == Confidence::High {
            if condition.name.contains("Diabetes") {
                next_steps.push(
                    "Request referral to certified diabetes educator for comprehensive diabetes management"
                        .to_string(),
                );
            } else if condition.name.contains("Cardiovascular") {
                next_steps.push(
                    "Request cardiovascular risk assessment and consider stress testing".to_string(),
                );
            }
        }
    }

    next_steps.extend(
        [
            "Bring this analysis report to your healthcare provider for review",
            "Ask your doctor about any values or conditions you don't understand",
            "Request copy of all lab results for your personal health records",
        ]
        .map(String::from),
    );

    next_steps
}

fn lifestyle_recommendations(conditions: &[DetectedCondition]) -> Vec<String> {
    let mut lifestyle = Vec::new();

    let diabetes_detected = conditions
        .iter()
        .any(|c| c.name.contains("Diabetes") || c.name.contains("Prediabetes"));
    if diabetes_detected {
        lifestyle.extend(
            [
                "Follow diabetes-friendly eating plan with consistent meal timing",
                "Monitor carbohydrate intake and learn carb counting",
                "Engage in post-meal walking to help control blood sugar spikes",
            ]
            .map(String::from),
        );
    }

    let cv_detected = conditions.iter().any(|c| c.name.contains("Cardiovascular"));
    if cv_detected {
        lifestyle.extend(
            [
                "Adopt Mediterranean-style diet rich in omega-3 fatty acids",
                "Limit sodium intake to less than 2,300mg per day (ideally 1,500mg)",
                "Include 30 minutes of aerobic activity 5 days per week",
            ]
            .map(String::from),
        );
    }

    lifestyle.extend(
        [
            "Maintain healthy weight through balanced nutrition and regular exercise",
            "Avoid tobacco use and limit alcohol consumption",
            "Practice stress-reduction techniques daily",
        ]
        .map(String::from),
    );

    lifestyle
}

fn monitoring_plan(conditions: &[DetectedCondition]) -> Vec<String> {
    let mut plan = Vec::new();

    for condition in conditions {
        if condition.name.contains("Diabetes") {
            plan.extend(
                [
                    "Check fasting glucose 2-3 times per week initially",
                    "Monitor HbA1c every 3 months until stable, then every 6 months",
                    "Annual eye exam for diabetic retinopathy screening",
                ]
                .map(String::from),
            );
        } else if condition.name.contains("Cardiovascular") {
            plan.extend(
                [
                    "Check blood pressure weekly at home if elevated",
                    "Repeat lipid panel in 6-8 weeks after starting interventions",
                    "Annual cardiovascular risk assessment",
                ]
                .map(String::from),
            );
        } else if condition.name.contains("Kidney") {
            plan.extend(
                [
                    "Monitor kidney function (creatinine, BUN) every 3-6 months",
                    "Check urine for protein annually",
                ]
                .map(String::from),
            );
        }
    }

    plan.extend(
        [
            "Schedule comprehensive metabolic panel annually for general health monitoring",
            "Track weight, blood pressure, and any symptoms between visits",
        ]
        .map(String::from),
    );

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::risk::assess_condition_risk;

    fn reference() -> ReferenceData {
        ReferenceData::standard()
    }

    fn analyze(test_id: &str, value: f64) -> ValueAnalysis {
        let data = reference();
        let range = data.get(test_id).unwrap();
        analyze_value(range, value, range.unit)
    }

    #[test]
    fn glucose_rules_first_match_wins() {
        assert_eq!(analyze("glucose", 130.0).status, "Diabetic Range");
        assert_eq!(analyze("glucose", 110.0).status, "Prediabetic Range");
        assert_eq!(analyze("glucose", 90.0).status, "Normal");
        assert!(analyze("glucose", 110.0)
            .summary
            .contains("110 mg/dL indicates prediabetes"));
    }

    #[test]
    fn ldl_near_optimal_band() {
        let analysis = analyze("ldl", 115.0);
        assert_eq!(analysis.status, "Near Optimal");
        assert_eq!(analysis.severity, "mild");
    }

    #[test]
    fn hdl_low_beats_protective() {
        assert_eq!(analyze("hdl", 35.0).status, "Low");
        assert_eq!(analyze("hdl", 65.0).status, "High (Protective)");
        assert_eq!(analyze("hdl", 50.0).status, "Acceptable");
    }

    #[test]
    fn systolic_stages() {
        assert_eq!(analyze("blood_pressure_systolic", 145.0).status, "Stage 2 Hypertension");
        assert_eq!(analyze("blood_pressure_systolic", 132.0).status, "Stage 1 Hypertension");
        assert_eq!(analyze("blood_pressure_systolic", 124.0).status, "Elevated");
        assert_eq!(analyze("blood_pressure_systolic", 118.0).status, "Normal");
    }

    #[test]
    fn generic_fallback_for_other_tests() {
        let analysis = analyze("creatinine", 1.4);
        assert_eq!(analysis.status, "High");
        assert!(analysis.summary.contains("above normal range"));

        let analysis = analyze("hemoglobin", 10.0);
        assert_eq!(analysis.status, "Low");
        assert!(analysis
            .clinical_significance
            .contains("may indicate underlying medical condition"));
    }

    #[test]
    fn summary_caps_findings_and_recommendations() {
        let mut values = ExtractedValues::new();
        for (id, v) in [
            ("cholesterol", 245.0),
            ("ldl", 165.0),
            ("hdl", 35.0),
            ("triglycerides", 180.0),
            ("glucose", 130.0),
            ("hba1c", 7.0),
            ("creatinine", 1.6),
            ("bun", 35.0),
            ("alt", 80.0),
            ("ast", 60.0),
        ] {
            values.insert(id, v, "mg/dL".into());
        }
        let conditions = crate::analysis::conditions::detect_conditions(&values);
        let risk = assess_condition_risk(&conditions);
        let summary =
            build_patient_summary(Demographics::default(), &values, &conditions, risk, &reference());

        assert_eq!(summary.key_findings.len(), MAX_KEY_FINDINGS);
        assert_eq!(summary.recommendations.len(), MAX_RECOMMENDATIONS);
        assert!(!summary.detailed_analysis.is_empty());
        assert!(!summary.monitoring_plan.is_empty());
    }

    #[test]
    fn urgent_risk_gates_next_steps() {
        let mut values = ExtractedValues::new();
        values.insert("glucose", 130.0, "mg/dL".into());
        values.insert("hba1c", 7.0, "%".into());
        values.insert("cholesterol", 245.0, "mg/dL".into());
        values.insert("ldl", 165.0, "mg/dL".into());
        let conditions = crate::analysis::conditions::detect_conditions(&values);
        let risk = assess_condition_risk(&conditions);
        assert_eq!(risk.urgency, Urgency::Urgent);

        let summary =
            build_patient_summary(Demographics::default(), &values, &conditions, risk, &reference());
        assert!(summary.next_steps[0].starts_with("URGENT"));
    }

    #[test]
    fn empty_document_yields_general_insights() {
        let values = ExtractedValues::new();
        let risk = assess_condition_risk(&[]);
        let summary =
            build_patient_summary(Demographics::default(), &values, &[], risk, &reference());
        assert!(summary.key_findings[0].contains("not clearly identified"));
        assert!(summary.detailed_analysis.is_empty());
        assert!(summary.detected_conditions.is_empty());
    }
}
