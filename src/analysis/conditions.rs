use super::reference::ReferenceData;
use super::types::{fmt_num, Confidence, DetectedCondition, ExtractedValues};

/// Run the fixed condition-detection battery against extracted values.
///
/// Each rule set is independent and evaluated against extracted values only,
/// never against textual findings. The explanation/complications/management
/// templates are fixed data selected by which branch fired.
pub fn detect_conditions(values: &ExtractedValues) -> Vec<DetectedCondition> {
    let mut conditions = Vec::new();

    detect_diabetes(values, &mut conditions);
    detect_cardiovascular(values, &mut conditions);
    detect_kidney(values, &mut conditions);

    conditions
}

/// Two-signal diabetes rule: a diabetic-range value contributes 2 points, a
/// prediabetic-range value 1; two points make the diagnosis.
fn detect_diabetes(values: &ExtractedValues, out: &mut Vec<DetectedCondition>) {
    let mut indicators = 0;
    let mut evidence = Vec::new();

    if let Some(glucose) = values.value("glucose") {
        if glucose >= 126.0 {
            indicators += 2;
            evidence.push(format!(
                "Fasting glucose {} mg/dL (diabetic range)",
                fmt_num(glucose)
            ));
        } else if glucose >= 100.0 {
            indicators += 1;
            evidence.push(format!(
                "Fasting glucose {} mg/dL (prediabetic range)",
                fmt_num(glucose)
            ));
        }
    }

    if let Some(hba1c) = values.value("hba1c") {
        if hba1c >= 6.5 {
            indicators += 2;
            evidence.push(format!("HbA1c {}% (diabetic range)", fmt_num(hba1c)));
        } else if hba1c >= 5.7 {
            indicators += 1;
            evidence.push(format!("HbA1c {}% (prediabetic range)", fmt_num(hba1c)));
        }
    }

    if indicators >= 2 {
        out.push(DetectedCondition {
            name: "Diabetes Mellitus".to_string(),
            confidence: Confidence::High,
            evidence,
            explanation: "Multiple lab values indicate diabetes. This is a chronic condition requiring ongoing medical management.".to_string(),
            complications_risk: "High risk for cardiovascular disease, kidney disease, nerve damage, and eye problems if not well controlled.".to_string(),
            management: "Requires comprehensive diabetes management including medication, diet modification, regular monitoring, and lifestyle changes.".to_string(),
        });
    } else if indicators == 1 {
        out.push(DetectedCondition {
            name: "Prediabetes".to_string(),
            confidence: Confidence::Moderate,
            evidence,
            explanation: "Lab values suggest impaired glucose metabolism. This is a reversible condition with proper intervention.".to_string(),
            complications_risk: "Increased risk of developing Type 2 diabetes within 5-10 years without intervention.".to_string(),
            management: "Lifestyle modifications including weight loss, increased physical activity, and dietary changes can prevent progression to diabetes.".to_string(),
        });
    }
}

/// Four independent cardiovascular checks, one point each.
fn detect_cardiovascular(values: &ExtractedValues, out: &mut Vec<DetectedCondition>) {
    let mut risk = 0;
    let mut evidence = Vec::new();

    if let Some(systolic) = values.value("blood_pressure_systolic") {
        if systolic >= 130.0 {
            risk += 1;
            evidence.push(format!("Systolic BP {} mmHg", fmt_num(systolic)));
        }
    }
    if let Some(cholesterol) = values.value("cholesterol") {
        if cholesterol >= 200.0 {
            risk += 1;
            evidence.push(format!("Total cholesterol {} mg/dL", fmt_num(cholesterol)));
        }
    }
    if let Some(ldl) = values.value("ldl") {
        if ldl >= 130.0 {
            risk += 1;
            evidence.push(format!("LDL cholesterol {} mg/dL", fmt_num(ldl)));
        }
    }
    if let Some(hdl) = values.value("hdl") {
        if hdl < 40.0 {
            risk += 1;
            evidence.push(format!("HDL cholesterol {} mg/dL (low)", fmt_num(hdl)));
        }
    }

    if risk >= 2 {
        out.push(DetectedCondition {
            name: "Cardiovascular Risk Factors".to_string(),
            confidence: Confidence::High,
            evidence,
            explanation: "Multiple cardiovascular risk factors are present, significantly increasing the risk of heart disease and stroke.".to_string(),
            complications_risk: "High risk for heart attack, stroke, peripheral artery disease, and other cardiovascular events.".to_string(),
            management: "Requires aggressive risk factor modification including medication management, lifestyle changes, and regular monitoring.".to_string(),
        });
    } else if risk == 1 {
        out.push(DetectedCondition {
            name: "Mild Cardiovascular Risk".to_string(),
            confidence: Confidence::Moderate,
            evidence,
            explanation: "Some cardiovascular risk factors are present that should be addressed.".to_string(),
            complications_risk: "Moderately increased risk for cardiovascular events.".to_string(),
            management: "Lifestyle modifications and possibly medication to reduce cardiovascular risk.".to_string(),
        });
    }
}

/// Kidney rule: markedly elevated creatinine alone is enough; mildly
/// elevated creatinine needs a corroborating BUN. No High tier is defined.
fn detect_kidney(values: &ExtractedValues, out: &mut Vec<DetectedCondition>) {
    let mut risk = 0;
    let mut evidence = Vec::new();

    if let Some(creatinine) = values.value("creatinine") {
        if creatinine >= 1.5 {
            risk += 2;
            evidence.push(format!("Creatinine {} mg/dL (elevated)", fmt_num(creatinine)));
        } else if creatinine >= 1.2 {
            risk += 1;
            evidence.push(format!(
                "Creatinine {} mg/dL (mildly elevated)",
                fmt_num(creatinine)
            ));
        }
    }
    if let Some(bun) = values.value("bun") {
        if bun >= 30.0 {
            risk += 1;
            evidence.push(format!("BUN {} mg/dL (elevated)", fmt_num(bun)));
        }
    }

    if risk >= 2 {
        out.push(DetectedCondition {
            name: "Possible Kidney Disease".to_string(),
            confidence: Confidence::Moderate,
            evidence,
            explanation: "Lab values suggest possible kidney function impairment requiring further evaluation.".to_string(),
            complications_risk: "Progressive kidney disease can lead to chronic kidney disease and eventual need for dialysis.".to_string(),
            management: "Requires nephrology evaluation, monitoring of kidney function, and management of underlying causes.".to_string(),
        });
    }
}

/// Fallback insights for documents where nothing specific was found:
/// either the document format was not recognizable, or every recognized
/// value sat in its normal band.
pub fn general_analysis_insights(
    values: &ExtractedValues,
    reference: &ReferenceData,
) -> Vec<String> {
    if values.is_empty() {
        return vec![
            "Report analysis complete - specific lab values not clearly identified in this document format".to_string(),
            "Consider requesting structured lab report with clear value formatting for more detailed analysis".to_string(),
        ];
    }

    let total_count = values.len();
    let normal_count = values
        .iter()
        .filter(|(test_id, extracted)| {
            reference
                .get(test_id)
                .is_some_and(|r| extracted.value >= r.normal.0 && extracted.value <= r.normal.1)
        })
        .count();

    if normal_count == total_count {
        vec![
            format!("Excellent news: All {total_count} analyzed lab values are within normal ranges"),
            "Current health markers suggest good metabolic and organ function".to_string(),
            "Continue current healthy lifestyle habits to maintain these optimal levels".to_string(),
        ]
    } else if normal_count as f64 >= total_count as f64 * 0.8 {
        vec![
            format!("Generally positive results: {normal_count} of {total_count} lab values are normal"),
            "Most health markers are in good ranges with some areas needing attention".to_string(),
        ]
    } else {
        vec![
            format!("Mixed results: {normal_count} of {total_count} lab values are within normal ranges"),
            "Several health markers require medical evaluation and possible intervention".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values_of(pairs: &[(&str, f64)]) -> ExtractedValues {
        let mut values = ExtractedValues::new();
        for (id, v) in pairs {
            values.insert(id, *v, "mg/dL".into());
        }
        values
    }

    #[test]
    fn glucose_130_alone_is_diabetes_high_confidence() {
        let conditions = detect_conditions(&values_of(&[("glucose", 130.0)]));
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].name, "Diabetes Mellitus");
        assert_eq!(conditions[0].confidence, Confidence::High);
        assert!(conditions[0].evidence[0].contains("130"));
    }

    #[test]
    fn two_prediabetic_signals_make_the_diagnosis() {
        let conditions = detect_conditions(&values_of(&[("glucose", 110.0), ("hba1c", 6.2)]));
        assert_eq!(conditions[0].name, "Diabetes Mellitus");
        assert_eq!(conditions[0].evidence.len(), 2);
    }

    #[test]
    fn single_prediabetic_signal_is_prediabetes() {
        let conditions = detect_conditions(&values_of(&[("hba1c", 5.9)]));
        assert_eq!(conditions[0].name, "Prediabetes");
        assert_eq!(conditions[0].confidence, Confidence::Moderate);
        assert!(conditions[0].evidence[0].contains("prediabetic range"));
    }

    #[test]
    fn glucose_at_126_is_diabetic_range() {
        let conditions = detect_conditions(&values_of(&[("glucose", 126.0)]));
        assert_eq!(conditions[0].name, "Diabetes Mellitus");
    }

    #[test]
    fn normal_glucose_detects_nothing() {
        let conditions = detect_conditions(&values_of(&[("glucose", 90.0)]));
        assert!(conditions.is_empty());
    }

    #[test]
    fn single_cv_signal_is_mild_risk() {
        for (test, value) in [
            ("blood_pressure_systolic", 135.0),
            ("cholesterol", 210.0),
            ("ldl", 140.0),
            ("hdl", 35.0),
        ] {
            let conditions = detect_conditions(&values_of(&[(test, value)]));
            assert_eq!(conditions[0].name, "Mild Cardiovascular Risk", "test: {test}");
            assert_eq!(conditions[0].confidence, Confidence::Moderate);
        }
    }

    #[test]
    fn two_cv_signals_are_high_confidence() {
        let conditions = detect_conditions(&values_of(&[("cholesterol", 210.0), ("ldl", 140.0)]));
        assert_eq!(conditions[0].name, "Cardiovascular Risk Factors");
        assert_eq!(conditions[0].confidence, Confidence::High);
        assert_eq!(conditions[0].evidence.len(), 2);
    }

    #[test]
    fn hdl_at_40_does_not_count() {
        let conditions = detect_conditions(&values_of(&[("hdl", 40.0)]));
        assert!(conditions.is_empty());
    }

    #[test]
    fn kidney_needs_two_points() {
        assert!(detect_conditions(&values_of(&[("creatinine", 1.3)])).is_empty());

        let conditions = detect_conditions(&values_of(&[("creatinine", 1.6)]));
        assert_eq!(conditions[0].name, "Possible Kidney Disease");
        assert_eq!(conditions[0].confidence, Confidence::Moderate);

        let conditions = detect_conditions(&values_of(&[("creatinine", 1.3), ("bun", 35.0)]));
        assert_eq!(conditions[0].name, "Possible Kidney Disease");
    }

    #[test]
    fn insights_for_unstructured_document() {
        let insights = general_analysis_insights(&ExtractedValues::new(), &ReferenceData::standard());
        assert!(insights[0].contains("not clearly identified in this document format"));
    }

    #[test]
    fn insights_report_exact_normal_counts() {
        let reference = ReferenceData::standard();

        let all_normal = values_of(&[("glucose", 90.0), ("cholesterol", 180.0)]);
        let insights = general_analysis_insights(&all_normal, &reference);
        assert!(insights[0].contains("All 2 analyzed lab values"));

        let mixed = values_of(&[("glucose", 90.0), ("cholesterol", 250.0)]);
        let insights = general_analysis_insights(&mixed, &reference);
        assert!(insights[0].contains("1 of 2 lab values"));
    }
}
