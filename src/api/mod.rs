//! HTTP layer exposing the analysis strategies as request/response
//! endpoints under one response envelope.

pub mod demo;
pub mod endpoints;
pub mod error;
pub mod router;
pub mod types;

pub use router::app_router;
pub use types::AppState;
