pub mod analysis; // deterministic rule-based analysis core
pub mod api; // HTTP layer
pub mod config;
pub mod llm; // optional LLM-backed strategy
