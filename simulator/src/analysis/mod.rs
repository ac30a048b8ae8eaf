//! Boundary to the external language-model analysis service.
//!
//! Requests are plain values built from digests and explicit model
//! settings; responses are parsed leniently and any failure becomes a
//! fallback report. Nothing here retries.

pub mod report;
pub mod request;

pub use report::{AnalysisReport, ReportStatus};
pub use request::{AnalysisRequest, ChatRole, ChatTurn, ModelSettings, ResponseFormat};
