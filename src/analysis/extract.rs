use std::sync::LazyLock;

use regex::Regex;

use super::reference::{ReferenceData, REPORT_TYPE_KEYWORDS};
use super::types::{Demographics, ExtractedValues, ReportType};

/// One extraction pattern: test name (or accepted abbreviation), optional
/// colon, numeric value, optional unit token. Only the first match per
/// pattern is kept.
struct ValuePattern {
    test_id: &'static str,
    regex: LazyLock<Regex>,
}

macro_rules! value_pattern {
    ($id:literal, $re:literal) => {
        ValuePattern {
            test_id: $id,
            regex: LazyLock::new(|| Regex::new($re).unwrap()),
        }
    };
}

static VALUE_PATTERNS: [ValuePattern; 11] = [
    value_pattern!(
        "cholesterol",
        r"(?i)\b(?:total\s*)?cholesterol\s*:?\s*(\d+\.?\d*)(?:\s*(mg/dl|mg%))?"
    ),
    value_pattern!(
        "ldl",
        r"(?i)\bldl(?:\s*cholesterol)?\s*:?\s*(\d+\.?\d*)(?:\s*(mg/dl|mg%))?"
    ),
    value_pattern!(
        "hdl",
        r"(?i)\bhdl(?:\s*cholesterol)?\s*:?\s*(\d+\.?\d*)(?:\s*(mg/dl|mg%))?"
    ),
    value_pattern!(
        "triglycerides",
        r"(?i)\btriglycerides?\s*:?\s*(\d+\.?\d*)(?:\s*(mg/dl|mg%))?"
    ),
    value_pattern!(
        "glucose",
        r"(?i)\bglucose\s*:?\s*(\d+\.?\d*)(?:\s*(mg/dl|mg%))?"
    ),
    value_pattern!("hba1c", r"(?i)\bhba1c\s*:?\s*(\d+\.?\d*)\s*(%)?"),
    value_pattern!(
        "hemoglobin",
        r"(?i)\b(?:hgb|hemoglobin)\s*:?\s*(\d+\.?\d*)(?:\s*(g/dl|g%))?"
    ),
    value_pattern!(
        "creatinine",
        r"(?i)\bcreatinine\s*:?\s*(\d+\.?\d*)(?:\s*(mg/dl|mg%))?"
    ),
    value_pattern!("bun", r"(?i)\bbun\s*:?\s*(\d+\.?\d*)(?:\s*(mg/dl|mg%))?"),
    value_pattern!("alt", r"(?i)\balt\s*:?\s*(\d+\.?\d*)(?:\s*(u/l|iu/l))?"),
    value_pattern!("ast", r"(?i)\bast\s*:?\s*(\d+\.?\d*)(?:\s*(u/l|iu/l))?"),
];

// Blood pressure is the one two-capture pattern: a single match produces
// both the systolic and diastolic entries.
static RE_BLOOD_PRESSURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:bp|blood\s*pressure)\s*:?\s*(\d+)\s*/\s*(\d+)").unwrap());

static RE_AGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bage\s*:?\s*(\d+)").unwrap());
static RE_GENDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:gender|sex)\s*:?\s*(male|female|m|f)\b").unwrap());
static RE_PATIENT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bpatient\s*(?:name)?\s*:?\s*([A-Za-z][A-Za-z\s]*)").unwrap());
static RE_REPORT_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:report\s*)?date\s*:?\s*(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})").unwrap()
});

/// Extract lab measurements from cleaned text.
///
/// Values that fail to parse are silently skipped; absence means the key is
/// omitted entirely. A missing unit token falls back to the reference
/// table's canonical unit.
pub fn extract_lab_values(text: &str, reference: &ReferenceData) -> ExtractedValues {
    let mut values = ExtractedValues::new();

    for pattern in &VALUE_PATTERNS {
        if let Some(caps) = pattern.regex.captures(text) {
            let Ok(value) = caps[1].parse::<f64>() else {
                continue;
            };
            let unit = caps
                .get(2)
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| canonical_unit(pattern.test_id, reference));
            values.insert(pattern.test_id, value, unit);
        }
    }

    if let Some(caps) = RE_BLOOD_PRESSURE.captures(text) {
        if let (Ok(systolic), Ok(diastolic)) = (caps[1].parse::<f64>(), caps[2].parse::<f64>()) {
            values.insert("blood_pressure_systolic", systolic, "mmHg".into());
            values.insert("blood_pressure_diastolic", diastolic, "mmHg".into());
        }
    }

    values
}

fn canonical_unit(test_id: &str, reference: &ReferenceData) -> String {
    reference
        .get(test_id)
        .map(|r| r.unit.to_string())
        .unwrap_or_default()
}

/// Extract patient demographics; each field is matched independently and
/// absent fields are simply left unset.
pub fn extract_demographics(text: &str) -> Demographics {
    let mut demographics = Demographics::default();

    if let Some(caps) = RE_AGE.captures(text) {
        demographics.age = caps[1].parse::<u32>().ok();
    }

    if let Some(caps) = RE_GENDER.captures(text) {
        let gender = caps[1].to_lowercase();
        demographics.gender = Some(if gender == "male" || gender == "m" {
            "Male".to_string()
        } else {
            "Female".to_string()
        });
    }

    if let Some(caps) = RE_PATIENT_NAME.captures(text) {
        let name = caps[1].trim();
        if !name.is_empty() {
            demographics.patient_name = Some(name.to_string());
        }
    }

    if let Some(caps) = RE_REPORT_DATE.captures(text) {
        demographics.report_date = Some(caps[1].to_string());
    }

    demographics
}

/// Detect the report type by keyword membership, in fixed priority order.
pub fn detect_report_type(text: &str) -> ReportType {
    let text_lower = text.to_lowercase();

    for (report_type, keywords) in REPORT_TYPE_KEYWORDS {
        if keywords.iter().any(|k| text_lower.contains(k)) {
            return *report_type;
        }
    }

    ReportType::General
}
