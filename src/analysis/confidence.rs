use std::sync::LazyLock;

use regex::Regex;

use super::types::ExtractedValues;

static RE_UNIT_TOKENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(mg/dl|mmhg|g/dl|u/l|%)").unwrap());

/// Weighted confidence score for an analysis, capped at 1.0.
///
/// Text length, extraction success, and the density of medical unit tokens
/// each contribute a fixed weight.
pub fn confidence_score(text: &str, values: &ExtractedValues) -> f64 {
    let mut score = 0.0;

    if text.len() > 100 {
        score += 0.3;
    }
    if text.len() > 500 {
        score += 0.2;
    }

    if !values.is_empty() {
        score += 0.4;
        if values.len() > 3 {
            score += 0.1;
        }
    }

    let unit_tokens = RE_UNIT_TOKENS.find_iter(text).count();
    if unit_tokens > 0 {
        score += (unit_tokens as f64 * 0.1).min(0.3);
    }

    score.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_scores_zero() {
        assert_eq!(confidence_score("", &ExtractedValues::new()), 0.0);
    }

    #[test]
    fn short_text_without_values_stays_low() {
        let text = "brief note about the patient visit, nothing quantitative here today ok";
        assert!(confidence_score(text, &ExtractedValues::new()) <= 0.3);
    }

    #[test]
    fn extraction_success_dominates() {
        let mut values = ExtractedValues::new();
        values.insert("glucose", 110.0, "mg/dL".into());
        let score = confidence_score("Glucose: 110 mg/dL", &ExtractedValues::new());
        let score_with = confidence_score("Glucose: 110 mg/dL", &values);
        assert!(score_with > score);
        assert!((score_with - score - 0.4).abs() < 1e-9);
    }

    #[test]
    fn unit_token_bonus_is_capped() {
        let text = "a mg/dl b mg/dl c mg/dl d mg/dl e mg/dl";
        // 5 tokens × 0.1 capped at 0.3; text < 100 chars, no values.
        assert!((confidence_score(text, &ExtractedValues::new()) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn full_report_caps_at_one() {
        let mut values = ExtractedValues::new();
        for (id, v) in [
            ("glucose", 110.0),
            ("hba1c", 6.2),
            ("cholesterol", 245.0),
            ("ldl", 165.0),
        ] {
            values.insert(id, v, "mg/dL".into());
        }
        let text = format!(
            "{} mg/dl mmhg g/dl u/l % extensive laboratory report text",
            "x".repeat(600)
        );
        assert_eq!(confidence_score(&text, &values), 1.0);
    }
}
