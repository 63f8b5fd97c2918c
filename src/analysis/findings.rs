use super::reference::{ReferenceData, ReferenceRange, SEVERITY_KEYWORDS};
use super::types::{
    fmt_num, ExtractedValues, Finding, QuantFinding, Severity, TextualFinding, ValueStatus,
};

const CONTEXT_WINDOW: usize = 50;
const MIN_SNIPPET_LEN: usize = 20;

/// Classify a value against its normal band.
///
/// Comparison is strict: a value exactly at either bound is Normal. A High
/// value within 120% of the upper bound is mild, beyond that critical; Low
/// values are uniformly mild.
pub(crate) fn classify_value(range: &ReferenceRange, value: f64) -> (ValueStatus, Severity) {
    let (low, high) = range.normal;
    if value < low {
        (ValueStatus::Low, Severity::Mild)
    } else if value > high {
        let severity = if value <= high * 1.2 {
            Severity::Mild
        } else {
            Severity::Critical
        };
        (ValueStatus::High, severity)
    } else {
        (ValueStatus::Normal, Severity::Normal)
    }
}

/// Derive findings from extracted values and report text.
///
/// Quantitative findings come from comparing each recognized value against
/// its reference band; values with no reference entry are skipped. Textual
/// findings are ±50-character windows around severity keywords, kept only
/// when the snippet is long enough to carry context. Overlaps and duplicates
/// are not removed.
pub fn analyze_findings(
    text: &str,
    values: &ExtractedValues,
    reference: &ReferenceData,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (test_id, extracted) in values.iter() {
        let Some(range) = reference.get(test_id) else {
            continue;
        };
        let (status, severity) = classify_value(range, extracted.value);
        findings.push(Finding::Quantitative(QuantFinding {
            test: range.label.to_string(),
            value: format!("{} {}", fmt_num(extracted.value), extracted.unit),
            status,
            severity,
            reference_range: format!(
                "{}-{} {}",
                fmt_num(range.normal.0),
                fmt_num(range.normal.1),
                range.unit
            ),
        }));
    }

    let text_lower = text.to_lowercase();
    for (severity, keywords) in SEVERITY_KEYWORDS {
        for keyword in *keywords {
            if let Some(snippet) = keyword_context(text, &text_lower, keyword) {
                if snippet.len() > MIN_SNIPPET_LEN {
                    findings.push(Finding::Textual(TextualFinding {
                        finding: snippet,
                        severity: *severity,
                        source: "text_analysis".to_string(),
                    }));
                }
            }
        }
    }

    findings
}

/// Extract the window of text around the first occurrence of a keyword.
fn keyword_context(text: &str, text_lower: &str, keyword: &str) -> Option<String> {
    let index = text_lower.find(keyword)?;
    let start = floor_char_boundary(text, index.saturating_sub(CONTEXT_WINDOW));
    let end = ceil_char_boundary(text, (index + keyword.len() + CONTEXT_WINDOW).min(text.len()));
    Some(text[start..end].trim().to_string())
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> ReferenceData {
        ReferenceData::standard()
    }

    fn quant(findings: &[Finding]) -> Vec<&QuantFinding> {
        findings
            .iter()
            .filter_map(|f| match f {
                Finding::Quantitative(q) => Some(q),
                Finding::Textual(_) => None,
            })
            .collect()
    }

    #[test]
    fn value_at_upper_bound_is_normal_for_every_test() {
        let data = reference();
        for range in data.tests() {
            let (status, severity) = classify_value(range, range.normal.1);
            assert_eq!(status, ValueStatus::Normal, "test: {}", range.test_id);
            assert_eq!(severity, Severity::Normal, "test: {}", range.test_id);
        }
    }

    #[test]
    fn value_at_lower_bound_is_normal_for_every_test() {
        let data = reference();
        for range in data.tests() {
            let (status, _) = classify_value(range, range.normal.0);
            assert_eq!(status, ValueStatus::Normal, "test: {}", range.test_id);
        }
    }

    #[test]
    fn high_within_120_percent_is_mild() {
        let data = reference();
        let glucose = data.get("glucose").unwrap();
        // normal high 100: 120 is exactly 120%, still mild.
        assert_eq!(
            classify_value(glucose, 120.0),
            (ValueStatus::High, Severity::Mild)
        );
        assert_eq!(
            classify_value(glucose, 121.0),
            (ValueStatus::High, Severity::Critical)
        );
    }

    #[test]
    fn low_value_is_mild() {
        let data = reference();
        let hemoglobin = data.get("hemoglobin").unwrap();
        assert_eq!(
            classify_value(hemoglobin, 9.0),
            (ValueStatus::Low, Severity::Mild)
        );
    }

    #[test]
    fn quantitative_finding_carries_range_and_value() {
        let mut values = ExtractedValues::new();
        values.insert("cholesterol", 245.0, "mg/dL".into());
        let findings = analyze_findings("", &values, &reference());
        let q = quant(&findings);
        assert_eq!(q.len(), 1);
        assert_eq!(q[0].test, "Cholesterol");
        assert_eq!(q[0].value, "245 mg/dL");
        assert_eq!(q[0].status, ValueStatus::High);
        assert_eq!(q[0].reference_range, "0-200 mg/dL");
    }

    #[test]
    fn unrecognized_test_is_omitted_from_findings() {
        let mut values = ExtractedValues::new();
        values.insert("ferritin", 80.0, "ng/mL".into());
        let findings = analyze_findings("", &values, &reference());
        assert!(quant(&findings).is_empty());
    }

    #[test]
    fn textual_finding_window_around_keyword() {
        let text = "The patient presents with severe chest pain radiating to the left arm today";
        let findings = analyze_findings(text, &ExtractedValues::new(), &reference());
        let textual: Vec<_> = findings
            .iter()
            .filter_map(|f| match f {
                Finding::Textual(t) => Some(t),
                _ => None,
            })
            .collect();
        assert!(textual
            .iter()
            .any(|t| t.severity == Severity::Critical && t.finding.contains("severe chest pain")));
    }

    #[test]
    fn short_snippets_are_discarded() {
        // Keyword at the very start of a short text leaves a truncated window.
        let findings = analyze_findings("severe", &ExtractedValues::new(), &reference());
        assert!(findings.is_empty());
    }
}
