use super::types::{BodySystem, ReportType, Severity};

/// Normal band plus named secondary bands for one lab test.
///
/// Band comparisons in finding classification are strict against the normal
/// bounds: a value exactly at `normal.1` is still Normal. The named bands
/// carry the conventional clinical cut points and are surfaced in narrative
/// text; they are listed here so the exact numbers are auditable in one place.
#[derive(Debug, Clone)]
pub struct ReferenceRange {
    pub test_id: &'static str,
    pub label: &'static str,
    pub normal: (f64, f64),
    pub unit: &'static str,
    pub system: BodySystem,
    pub bands: &'static [(&'static str, (f64, f64))],
}

/// Immutable knowledge tables, built once at startup and shared by reference.
pub struct ReferenceData {
    tests: Vec<ReferenceRange>,
}

impl ReferenceData {
    /// The standard reference table.
    pub fn standard() -> Self {
        let tests = vec![
            ReferenceRange {
                test_id: "cholesterol",
                label: "Cholesterol",
                normal: (0.0, 200.0),
                unit: "mg/dL",
                system: BodySystem::Lipid,
                bands: &[("borderline", (200.0, 239.0)), ("high", (240.0, 999.0))],
            },
            ReferenceRange {
                test_id: "ldl",
                label: "LDL",
                normal: (0.0, 100.0),
                unit: "mg/dL",
                system: BodySystem::Lipid,
                bands: &[("borderline", (100.0, 129.0)), ("high", (130.0, 999.0))],
            },
            ReferenceRange {
                test_id: "hdl",
                label: "HDL",
                normal: (40.0, 999.0),
                unit: "mg/dL",
                system: BodySystem::Lipid,
                bands: &[("low", (0.0, 40.0)), ("optimal", (60.0, 999.0))],
            },
            ReferenceRange {
                test_id: "triglycerides",
                label: "Triglycerides",
                normal: (0.0, 150.0),
                unit: "mg/dL",
                system: BodySystem::Lipid,
                bands: &[("borderline", (150.0, 199.0)), ("high", (200.0, 999.0))],
            },
            ReferenceRange {
                test_id: "glucose",
                label: "Glucose",
                normal: (70.0, 100.0),
                unit: "mg/dL",
                system: BodySystem::Metabolic,
                bands: &[("prediabetes", (100.0, 125.0)), ("diabetes", (126.0, 999.0))],
            },
            ReferenceRange {
                test_id: "hba1c",
                label: "HbA1c",
                normal: (0.0, 5.7),
                unit: "%",
                system: BodySystem::Diabetes,
                bands: &[("prediabetes", (5.7, 6.4)), ("diabetes", (6.5, 999.0))],
            },
            ReferenceRange {
                test_id: "blood_pressure_systolic",
                label: "Blood Pressure Systolic",
                normal: (90.0, 120.0),
                unit: "mmHg",
                system: BodySystem::Cardiovascular,
                bands: &[
                    ("elevated", (120.0, 129.0)),
                    ("stage1", (130.0, 139.0)),
                    ("stage2", (140.0, 999.0)),
                ],
            },
            ReferenceRange {
                test_id: "blood_pressure_diastolic",
                label: "Blood Pressure Diastolic",
                normal: (60.0, 80.0),
                unit: "mmHg",
                system: BodySystem::Cardiovascular,
                bands: &[
                    ("elevated", (80.0, 89.0)),
                    ("stage1", (80.0, 89.0)),
                    ("stage2", (90.0, 999.0)),
                ],
            },
            ReferenceRange {
                test_id: "hemoglobin",
                label: "Hemoglobin",
                normal: (12.0, 16.0),
                unit: "g/dL",
                system: BodySystem::Hematology,
                bands: &[("anemia", (0.0, 12.0)), ("high", (16.0, 999.0))],
            },
            ReferenceRange {
                test_id: "white_blood_cells",
                label: "White Blood Cells",
                normal: (4000.0, 11000.0),
                unit: "cells/μL",
                system: BodySystem::Hematology,
                bands: &[("low", (0.0, 4000.0)), ("high", (11000.0, 999999.0))],
            },
            ReferenceRange {
                test_id: "platelets",
                label: "Platelets",
                normal: (150000.0, 450000.0),
                unit: "cells/μL",
                system: BodySystem::Hematology,
                bands: &[("low", (0.0, 150000.0)), ("high", (450000.0, 999999.0))],
            },
            ReferenceRange {
                test_id: "creatinine",
                label: "Creatinine",
                normal: (0.6, 1.2),
                unit: "mg/dL",
                system: BodySystem::Kidney,
                bands: &[("elevated", (1.2, 1.5)), ("high", (1.5, 999.0))],
            },
            ReferenceRange {
                test_id: "bun",
                label: "BUN",
                normal: (7.0, 20.0),
                unit: "mg/dL",
                system: BodySystem::Kidney,
                bands: &[("elevated", (20.0, 30.0)), ("high", (30.0, 999.0))],
            },
            ReferenceRange {
                test_id: "alt",
                label: "ALT",
                normal: (7.0, 56.0),
                unit: "U/L",
                system: BodySystem::Liver,
                bands: &[("elevated", (56.0, 100.0)), ("high", (100.0, 999.0))],
            },
            ReferenceRange {
                test_id: "ast",
                label: "AST",
                normal: (10.0, 40.0),
                unit: "U/L",
                system: BodySystem::Liver,
                bands: &[("elevated", (40.0, 80.0)), ("high", (80.0, 999.0))],
            },
            ReferenceRange {
                test_id: "bilirubin",
                label: "Bilirubin",
                normal: (0.2, 1.2),
                unit: "mg/dL",
                system: BodySystem::Liver,
                bands: &[("elevated", (1.2, 2.0)), ("high", (2.0, 999.0))],
            },
            ReferenceRange {
                test_id: "tsh",
                label: "TSH",
                normal: (0.4, 4.0),
                unit: "mIU/L",
                system: BodySystem::Endocrine,
                bands: &[("low", (0.0, 0.4)), ("high", (4.0, 999.0))],
            },
            ReferenceRange {
                test_id: "vitamin_d",
                label: "Vitamin D",
                normal: (30.0, 100.0),
                unit: "ng/mL",
                system: BodySystem::Nutritional,
                bands: &[("deficient", (0.0, 20.0)), ("insufficient", (20.0, 30.0))],
            },
            ReferenceRange {
                test_id: "psa",
                label: "PSA",
                normal: (0.0, 4.0),
                unit: "ng/mL",
                system: BodySystem::TumorMarker,
                bands: &[("elevated", (4.0, 10.0)), ("high", (10.0, 999.0))],
            },
        ];
        Self { tests }
    }

    pub fn get(&self, test_id: &str) -> Option<&ReferenceRange> {
        self.tests.iter().find(|t| t.test_id == test_id)
    }

    pub fn tests(&self) -> &[ReferenceRange] {
        &self.tests
    }
}

/// Severity keyword lexicon for textual findings, scanned tier by tier.
pub const SEVERITY_KEYWORDS: &[(Severity, &[&str])] = &[
    (
        Severity::Critical,
        &["critical", "severe", "acute", "emergency", "urgent", "high risk"],
    ),
    (
        Severity::Moderate,
        &["moderate", "elevated", "abnormal", "concerning", "borderline"],
    ),
    (
        Severity::Mild,
        &["mild", "slight", "minor", "borderline low", "minimal"],
    ),
    (
        Severity::Normal,
        &["normal", "within limits", "unremarkable", "stable", "good"],
    ),
];

/// Report-type keyword table, checked in priority order.
pub const REPORT_TYPE_KEYWORDS: &[(ReportType, &[&str])] = &[
    (
        ReportType::LabReport,
        &["laboratory", "blood test", "lab results", "chemistry panel", "cbc"],
    ),
    (
        ReportType::Imaging,
        &["x-ray", "ct scan", "mri", "ultrasound", "mammogram", "radiologic"],
    ),
    (
        ReportType::Cardiology,
        &["ecg", "ekg", "echo", "stress test", "cardiac", "heart"],
    ),
    (
        ReportType::Pathology,
        &["biopsy", "pathology", "histology", "cytology", "tumor"],
    ),
    (
        ReportType::Consultation,
        &["consultation", "assessment", "history", "examination", "clinical"],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_has_core_tests() {
        let data = ReferenceData::standard();
        for id in [
            "cholesterol",
            "ldl",
            "hdl",
            "triglycerides",
            "glucose",
            "hba1c",
            "blood_pressure_systolic",
            "blood_pressure_diastolic",
            "hemoglobin",
            "creatinine",
            "bun",
            "alt",
            "ast",
        ] {
            assert!(data.get(id).is_some(), "missing reference entry: {id}");
        }
    }

    #[test]
    fn unknown_test_has_no_entry() {
        let data = ReferenceData::standard();
        assert!(data.get("ferritin").is_none());
    }

    #[test]
    fn glucose_cut_points() {
        let data = ReferenceData::standard();
        let glucose = data.get("glucose").unwrap();
        assert_eq!(glucose.normal, (70.0, 100.0));
        assert_eq!(glucose.unit, "mg/dL");
        assert_eq!(glucose.bands[0], ("prediabetes", (100.0, 125.0)));
        assert_eq!(glucose.bands[1], ("diabetes", (126.0, 999.0)));
    }

    #[test]
    fn severity_lexicon_scans_critical_first() {
        assert_eq!(SEVERITY_KEYWORDS[0].0, Severity::Critical);
        assert_eq!(SEVERITY_KEYWORDS[3].0, Severity::Normal);
    }
}
