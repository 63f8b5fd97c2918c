//! Deterministic rule-based medical text analysis.
//!
//! Data flows one way: raw text → cleaned text → extracted values →
//! findings/conditions → risk assessment → patient and clinician summaries.
//! Every stage is a pure function of its inputs; the only shared state is
//! the immutable reference table.

pub mod conditions;
pub mod confidence;
pub mod doctor;
pub mod engine;
pub mod extract;
pub mod findings;
pub mod normalize;
pub mod patient;
pub mod reference;
pub mod risk;
pub mod types;

pub use engine::AnalysisEngine;
pub use reference::ReferenceData;
pub use types::AnalysisResult;
