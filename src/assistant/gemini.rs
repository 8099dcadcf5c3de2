//! Gemini `generateContent` client

use std::time::Duration;

use reqwest::blocking::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};

use super::{LanguageModel, Prompt};
use crate::config::settings::AssistantSettings;
use crate::error::{FintrackError, FintrackResult};

pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: SecretString,
}

impl GeminiClient {
    pub fn new(settings: &AssistantSettings, api_key: SecretString) -> FintrackResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key,
        })
    }

    /// Build from settings, reading the key from the configured variable
    pub fn from_settings(settings: &AssistantSettings) -> FintrackResult<Self> {
        Self::new(settings, settings.api_key()?)
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

/// Request body for one prompt
pub fn request_body(prompt: &Prompt) -> Value {
    let mut parts = vec![json!({ "text": prompt.text })];
    if let Some(attachment) = &prompt.attachment {
        parts.push(json!({
            "inline_data": {
                "mime_type": attachment.mime_type,
                "data": attachment.data,
            }
        }));
    }

    json!({
        "systemInstruction": { "parts": [{ "text": prompt.system }] },
        "contents": [{ "role": "user", "parts": parts }],
        "generationConfig": { "responseMimeType": "application/json" },
    })
}

/// Text of the first candidate's first part
pub fn extract_text(response: &Value) -> Option<String> {
    response
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?
        .iter()
        .find_map(|part| part.get("text").and_then(|t| t.as_str()))
        .map(str::to_string)
}

impl LanguageModel for GeminiClient {
    fn generate(&self, prompt: &Prompt) -> FintrackResult<String> {
        tracing::debug!(
            model = %self.model,
            attachment = prompt.attachment.is_some(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose_secret().as_str())
            .json(&request_body(prompt))
            .send()?;

        let status = response.status();
        let body: Value = response.json()?;

        if !status.is_success() {
            let message = body
                .pointer("/error/message")
                .and_then(|m| m.as_str())
                .unwrap_or("no error message");
            tracing::warn!(%status, error = message, "generateContent failed");
            return Err(FintrackError::Assistant(format!(
                "Model request failed ({}): {}",
                status, message
            )));
        }

        extract_text(&body).ok_or_else(|| {
            tracing::warn!(response = %body, "no text in generateContent response");
            FintrackError::Assistant("The model returned no text".to_string())
        })
    }
}
