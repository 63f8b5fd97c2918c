//! Optional LLM-backed analysis strategy.
//!
//! Shares the response envelope with the deterministic engine but nothing
//! else; the caller selects one strategy per request. The only blocking
//! network I/O in the service lives here, behind a bounded timeout.

pub mod analyzer;
pub mod client;
pub mod types;

pub use analyzer::LlmAnalyzer;
pub use client::{ChatClient, ChatCompletionsClient};
pub use types::{LlmAnalysis, LlmError};
