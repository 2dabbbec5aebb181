use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::ai::config::AiConfig;
use crate::error::{AiError, AiResult};

/// A single chat message.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> ChatMessage {
        ChatMessage {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> ChatMessage {
        ChatMessage {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    response_format: ResponseFormat,
    temperature: f32,
}

/// Response format control; the façade always asks for a JSON object and
/// validates the structure itself.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseFormat {
    JsonObject,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Thin chat-completions client: one best-effort request per call, no retry
/// and no timeout control beyond the HTTP client defaults.
pub struct AiClient {
    http: Client,
    config: AiConfig,
}

impl AiClient {
    pub fn new(config: AiConfig) -> AiClient {
        AiClient {
            http: Client::new(),
            config,
        }
    }

    /// Sends one request and decodes the assistant's JSON reply into `T`.
    pub async fn complete_json<T: DeserializeOwned>(
        &self,
        system: &str,
        user: &str,
    ) -> AiResult<T> {
        let request_id = Uuid::new_v4();
        debug!(%request_id, model = %self.config.model, "sending completion request");

        let messages = [ChatMessage::system(system), ChatMessage::user(user)];
        let request = ChatRequest {
            model: &self.config.model,
            messages: &messages,
            response_format: ResponseFormat::JsonObject,
            temperature: 0.2,
        };

        let response = self
            .http
            .post(&self.config.base_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(AiError::Api { status, message });
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|err| AiError::InvalidResponse(err.to_string()))?;
        debug!(%request_id, choices = completion.choices.len(), "completion received");

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AiError::InvalidResponse("empty completion".to_string()))?;

        serde_json::from_str(&content).map_err(|err| AiError::InvalidResponse(err.to_string()))
    }
}
