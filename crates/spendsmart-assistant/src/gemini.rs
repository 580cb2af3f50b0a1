//! Client for the Gemini `generateContent` REST endpoint.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use spendsmart_config::AssistantSettings;

use crate::{
    model::{GenerationRequest, LanguageModel, ResponseFormat},
    AssistantError,
};

pub struct GeminiClient {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::blocking::Client,
}

impl GeminiClient {
    pub fn new(settings: &AssistantSettings, api_key: String) -> Result<Self, AssistantError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| AssistantError::Network(e.to_string()))?;
        Ok(Self {
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key,
            client,
        })
    }

    /// Reads the key from the environment variable named in `settings`.
    pub fn from_settings(settings: &AssistantSettings) -> Result<Self, AssistantError> {
        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AssistantError::MissingApiKey(settings.api_key_env.clone()))?;
        Self::new(settings, api_key)
    }

    pub fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

fn text_content(role: Option<&str>, text: &str) -> GeminiContent {
    GeminiContent {
        role: role.map(str::to_string),
        parts: vec![GeminiPart {
            text: Some(text.to_string()),
        }],
    }
}

fn build_request(request: &GenerationRequest) -> GeminiRequest {
    GeminiRequest {
        system_instruction: request
            .system
            .as_deref()
            .map(|system| text_content(None, system)),
        contents: request
            .turns
            .iter()
            .map(|turn| text_content(Some(turn.role.as_str()), &turn.text))
            .collect(),
        generation_config: match &request.format {
            ResponseFormat::Text => None,
            ResponseFormat::Json(schema) => Some(GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema.clone(),
            }),
        },
    }
}

/// Concatenates the text parts of the first candidate.
fn extract_text(response: GeminiResponse) -> Result<String, AssistantError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();
    if text.trim().is_empty() {
        Err(AssistantError::EmptyResponse)
    } else {
        Ok(text)
    }
}

impl LanguageModel for GeminiClient {
    fn name(&self) -> &str {
        &self.model
    }

    fn generate(&self, request: &GenerationRequest) -> Result<String, AssistantError> {
        let body = build_request(request);
        tracing::debug!(model = %self.model, turns = body.contents.len(), "sending generation request");

        let response = self
            .client
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .map_err(|e| AssistantError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            return Err(AssistantError::Http { status, body });
        }

        let parsed: GeminiResponse = response
            .json()
            .map_err(|e| AssistantError::InvalidResponse(e.to_string()))?;
        extract_text(parsed)
    }
}
