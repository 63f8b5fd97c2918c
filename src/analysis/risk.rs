use super::types::{
    Confidence, ConditionRiskAnalysis, DetectedCondition, ExtractedValues, Finding, RiskAssessment,
    RiskLevel, Severity, SeverityDistribution, Urgency,
};

// The two scoring procedures below are deliberately kept as distinct named
// operations: the finding-based assessment feeds the clinician summary and
// the condition-based analysis feeds the patient summary. Their weight
// scales differ and must not be reconciled.

/// Score overall risk from extracted values and findings.
pub fn assess_findings_risk(values: &ExtractedValues, findings: &[Finding]) -> RiskAssessment {
    let mut risk_factors = Vec::new();
    let mut overall_score = 0u32;

    let (cv_score, cv_factors) = cardiovascular_score(values);
    overall_score += cv_score;
    risk_factors.extend(cv_factors);

    let (dm_score, dm_factors) = diabetes_score(values);
    overall_score += dm_score;
    risk_factors.extend(dm_factors);

    let distribution = severity_distribution(findings);

    let overall_risk = if overall_score >= 8 || distribution.critical > 0 {
        RiskLevel::High
    } else if overall_score >= 5 || distribution.moderate > 2 {
        RiskLevel::Moderate
    } else if overall_score >= 2 || distribution.mild > 1 {
        RiskLevel::LowModerate
    } else {
        RiskLevel::Low
    };

    RiskAssessment {
        overall_risk,
        risk_score: overall_score,
        risk_percentage: finding_risk_percentage(overall_score, &distribution, findings.len()),
        risk_factors,
        severity_distribution: distribution,
    }
}

fn cardiovascular_score(values: &ExtractedValues) -> (u32, Vec<String>) {
    let mut score = 0;
    let mut factors = Vec::new();

    match values.value("cholesterol") {
        Some(c) if c > 240.0 => {
            score += 3;
            factors.push("High total cholesterol".to_string());
        }
        Some(c) if c > 200.0 => {
            score += 2;
            factors.push("Borderline high cholesterol".to_string());
        }
        _ => {}
    }

    match values.value("ldl") {
        Some(l) if l > 160.0 => {
            score += 3;
            factors.push("High LDL cholesterol".to_string());
        }
        Some(l) if l > 130.0 => {
            score += 2;
            factors.push("Borderline high LDL".to_string());
        }
        _ => {}
    }

    // Lower HDL is worse.
    if values.value("hdl").is_some_and(|h| h < 40.0) {
        score += 2;
        factors.push("Low HDL cholesterol".to_string());
    }

    if values
        .value("blood_pressure_systolic")
        .is_some_and(|s| s > 140.0)
        || values
            .value("blood_pressure_diastolic")
            .is_some_and(|d| d > 90.0)
    {
        score += 3;
        factors.push("High blood pressure".to_string());
    }

    (score, factors)
}

fn diabetes_score(values: &ExtractedValues) -> (u32, Vec<String>) {
    let mut score = 0;
    let mut factors = Vec::new();

    match values.value("glucose") {
        Some(g) if g >= 126.0 => {
            score += 4;
            factors.push("Diabetic range glucose".to_string());
        }
        Some(g) if g >= 100.0 => {
            score += 2;
            factors.push("Prediabetic glucose".to_string());
        }
        _ => {}
    }

    match values.value("hba1c") {
        Some(h) if h >= 6.5 => {
            score += 4;
            factors.push("Diabetic range HbA1c".to_string());
        }
        Some(h) if h >= 5.7 => {
            score += 2;
            factors.push("Prediabetic HbA1c".to_string());
        }
        _ => {}
    }

    (score, factors)
}

fn severity_distribution(findings: &[Finding]) -> SeverityDistribution {
    let mut distribution = SeverityDistribution::default();
    for finding in findings {
        match finding.severity() {
            Severity::Critical => distribution.critical += 1,
            Severity::Moderate => distribution.moderate += 1,
            Severity::Mild => distribution.mild += 1,
            Severity::Normal => distribution.normal += 1,
        }
    }
    distribution
}

/// Bounded dynamic risk percentage for the finding-based scorer.
/// Rule-derived and explainable, not a calibrated probability.
fn finding_risk_percentage(
    score: u32,
    distribution: &SeverityDistribution,
    finding_count: usize,
) -> u32 {
    let mut percentage = score * 7
        + distribution.critical as u32 * 25
        + distribution.moderate as u32 * 10
        + distribution.mild as u32 * 3;
    if finding_count > 5 {
        percentage += 5;
    }
    percentage.max(5).max(score * 3).min(95)
}

/// Score overall risk from the detected-condition list.
pub fn assess_condition_risk(conditions: &[DetectedCondition]) -> ConditionRiskAnalysis {
    let mut overall_score = 0u32;
    let mut risk_factors = Vec::new();

    for condition in conditions {
        match condition.confidence {
            Confidence::High => {
                if condition.name.contains("Diabetes") {
                    overall_score += 4;
                    risk_factors.push(
                        "Diabetes significantly increases cardiovascular and complications risk"
                            .to_string(),
                    );
                } else if condition.name.contains("Cardiovascular") {
                    overall_score += 3;
                    risk_factors.push("Multiple cardiovascular risk factors present".to_string());
                } else if condition.name.contains("Kidney") {
                    overall_score += 2;
                    risk_factors.push("Possible kidney function impairment".to_string());
                }
            }
            Confidence::Moderate => {
                overall_score += 1;
                risk_factors.push(format!("Moderate risk for {}", condition.name.to_lowercase()));
            }
        }
    }

    let (overall_risk, risk_description) = if overall_score >= 6 {
        (
            RiskLevel::High,
            "Multiple serious medical conditions detected requiring immediate medical attention and aggressive management.",
        )
    } else if overall_score >= 4 {
        (
            RiskLevel::ModerateHigh,
            "Significant medical conditions present that require prompt medical evaluation and management.",
        )
    } else if overall_score >= 2 {
        (
            RiskLevel::Moderate,
            "Some medical concerns identified that warrant medical evaluation and monitoring.",
        )
    } else if overall_score >= 1 {
        (
            RiskLevel::LowModerate,
            "Minor medical concerns that should be discussed with healthcare provider.",
        )
    } else {
        (
            RiskLevel::Low,
            "Lab values appear generally within acceptable ranges.",
        )
    };

    let urgency = if overall_score >= 6 {
        Urgency::Urgent
    } else if overall_score >= 4 {
        Urgency::Prompt
    } else {
        Urgency::Routine
    };

    ConditionRiskAnalysis {
        overall_risk,
        risk_score: overall_score,
        risk_percentage: condition_risk_percentage(
            overall_score,
            conditions.len(),
            risk_factors.len(),
        ),
        risk_description: risk_description.to_string(),
        risk_factors,
        urgency,
    }
}

/// Bounded dynamic risk percentage for the condition-based scorer.
fn condition_risk_percentage(score: u32, condition_count: usize, factor_count: usize) -> u32 {
    let percentage = score * 8
        + (condition_count as u32 * 5).min(15)
        + (factor_count as u32 * 3).min(10);
    percentage.max(10).max(score * 5).min(90)
}
