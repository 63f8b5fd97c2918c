/// Bundled demo report served by `GET /demo`, run through the same analysis
/// dispatch as uploaded documents.
pub const DEMO_REPORT: &str = "\
MEDICAL REPORT

Patient Name: Sarah Johnson
Date of Birth: March 15, 1979
Age: 45 years
Gender: Female
Date of Report: January 15, 2024

CHIEF COMPLAINT:
Routine health checkup and follow-up for elevated cholesterol levels

LABORATORY RESULTS:

LIPID PANEL:
- Total Cholesterol: 245 mg/dL (High - Normal <200)
- LDL Cholesterol: 165 mg/dL (High - Normal <100)
- HDL Cholesterol: 42 mg/dL (Low - Normal >50 for women)
- Triglycerides: 180 mg/dL (Borderline high - Normal <150)

GLUCOSE METABOLISM:
- Fasting Glucose: 110 mg/dL (Impaired - Normal 70-99)
- HbA1c: 6.2% (Prediabetes - Normal <5.7%)

VITAL SIGNS:
- Blood Pressure: 145/92 mmHg (Stage 1 Hypertension)
- Heart Rate: 76 bpm
- BMI: 28.5 kg/m2 (Overweight)

CLINICAL ASSESSMENT:
Patient presents with multiple cardiovascular risk factors including hyperlipidemia,
prediabetes, and mild hypertension. Current lifestyle factors contribute to these
metabolic abnormalities.

RECOMMENDATIONS:
1. Initiate statin therapy for cholesterol management
2. Implement diabetes prevention program
3. Dietary consultation for weight management
4. Regular exercise program - minimum 150 minutes moderate activity per week
5. Blood pressure monitoring and potential antihypertensive therapy
6. Follow-up in 3 months to assess response to interventions

Dr. Michael Chen, MD
Internal Medicine
";

pub const DEMO_FILENAME: &str = "demo_medical_report.pdf";
