use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Success,
    Warning,
    Critical,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Structured whole-flight assessment returned by the analysis service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    #[serde(default)]
    pub status: ReportStatus,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub key_insights: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl AnalysisReport {
    /// Stand-in report used whenever the service call or parsing fails.
    pub fn fallback(reason: &str) -> Self {
        Self {
            status: ReportStatus::Unknown,
            summary: "Analysis failed because the analysis service returned an error.".into(),
            key_insights: vec!["The telemetry could not be processed.".into()],
            recommendations: vec![
                "Check the service credentials and network connection.".into(),
                format!("Error: {}", reason),
            ],
        }
    }

    pub fn parse_or_fallback(text: &str) -> Self {
        match serde_json::from_str::<AnalysisReport>(strip_code_fence(text)) {
            Ok(report) => report,
            Err(err) => {
                log::warn!("analysis report rejected: {}", err);
                Self::fallback(&err.to_string())
            }
        }
    }
}

/// Models sometimes wrap JSON in a ```json fence.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}
