use serde::{Deserialize, Serialize};

/// Which model the analysis service should use, threaded into every request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ModelSettings {
    pub model_name: String,
    pub thinking_budget: u32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model_name: "gemini-3-pro-preview".into(),
            thinking_budget: 2048,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// A JSON `AnalysisReport`.
    Json,
    /// Free-form text or markdown.
    Text,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

/// Payload handed to the analysis service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub model: String,
    pub thinking_budget: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
    pub prompt: String,
    pub response_format: ResponseFormat,
}

impl AnalysisRequest {
    fn new(settings: &ModelSettings, prompt: String, response_format: ResponseFormat) -> Self {
        Self {
            model: settings.model_name.clone(),
            thinking_budget: settings.thinking_budget,
            system_instruction: None,
            prompt,
            response_format,
        }
    }

    /// Whole-flight assessment; the service answers with a JSON report.
    pub fn full_report(summary: &str, settings: &ModelSettings) -> Self {
        let prompt = format!(
            "You are a senior flight data analyst reviewing a rocket launch.\n\
             Analyze the following telemetry summary and anomaly report.\n\n\
             Telemetry data:\n{summary}\n\n\
             Respond with JSON of the form:\n\
             {{\"status\": \"success\" | \"warning\" | \"critical\", \
             \"summary\": \"2-3 sentence assessment\", \
             \"keyInsights\": [\"...\"], \"recommendations\": [\"...\"]}}\n\
             Focus on engineering assessment. If high severity anomalies are present, \
             status should be warning or critical."
        );
        Self::new(settings, prompt, ResponseFormat::Json)
    }

    /// Focused reading of a selected interval; the service answers in prose.
    pub fn range(summary: &str, settings: &ModelSettings) -> Self {
        let prompt = format!(
            "You are analyzing a segment of rocket flight telemetry isolated by the user.\n\n\
             Data segment:\n{summary}\n\n\
             1. Describe how the selected metrics behave during this interval.\n\
             2. Identify correlations or inverse relationships between them.\n\
             3. If there are spikes or drops, suggest physical causes such as staging, \
             Max-Q or engine cutoff.\n\n\
             Answer with one concise technical paragraph. Do not output JSON."
        );
        Self::new(settings, prompt, ResponseFormat::Text)
    }

    /// Conversational follow-up grounded in a flight digest.
    pub fn chat(
        history: &[ChatTurn],
        message: &str,
        context: &str,
        settings: &ModelSettings,
    ) -> Self {
        let transcript = history
            .iter()
            .map(|turn| {
                let role = match turn.role {
                    ChatRole::User => "user",
                    ChatRole::Model => "model",
                };
                format!("{}: {}", role, turn.text)
            })
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!("History:\n{transcript}\n\nUser: {message}");

        let mut request = Self::new(settings, prompt, ResponseFormat::Text);
        request.system_instruction = Some(format!(
            "You are a flight data assistant. The user is analyzing a rocket flight.\n\
             Data summary: {context}\n\n\
             Give brief, technical and helpful answers."
        ));
        request
    }
}
