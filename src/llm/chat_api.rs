// Generic chat-completions adapter
//
// Talks to a hosted chat endpoint with the usual {model, messages, max_tokens}
// request body. The reply extractor accepts both wire shapes seen in the wild:
//   - OpenAI form:    choices[0].message.content
//   - Anthropic form: content[0].text

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::llm::provider::ChatAdapter;
use crate::types::{AppError, AppResult, ChatMessage, ChatReply, ChatRequest, TokenUsage};

pub struct ChatApiAdapter {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct WireResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
    #[serde(default)]
    content: Vec<WireContentBlock>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Deserialize)]
struct WireMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct WireContentBlock {
    text: Option<String>,
}

#[derive(Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[derive(Deserialize)]
struct WireErrorResponse {
    error: WireError,
}

#[derive(Deserialize)]
struct WireError {
    message: String,
}

impl ChatApiAdapter {
    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(&config.api_key, &config.base_url, config.timeout_secs)
    }

    pub fn new(api_key: &str, base_url: &str, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[async_trait]
impl ChatAdapter for ChatApiAdapter {
    async fn chat(&self, request: &ChatRequest) -> AppResult<ChatReply> {
        if self.api_key.is_empty() {
            return Err(AppError::LlmApi("LLM API key not configured".to_string()));
        }

        let wire = WireRequest {
            model: &request.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&wire)
            .send()
            .await
            .map_err(|e| AppError::LlmApi(format!("Chat request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            if let Ok(parsed) = serde_json::from_str::<WireErrorResponse>(&error_text) {
                return Err(AppError::LlmApi(format!(
                    "Chat API error ({}): {}",
                    status, parsed.error.message
                )));
            }
            return Err(AppError::LlmApi(format!(
                "Chat API error ({}): {}",
                status, error_text
            )));
        }

        let body: WireResponse = response
            .json()
            .await
            .map_err(|e| AppError::LlmApi(format!("Failed to parse chat response: {}", e)))?;

        let content = extract_content(&body)
            .ok_or_else(|| AppError::LlmApi("No response generated".to_string()))?;

        Ok(ChatReply {
            content,
            usage: body.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        })
    }
}

fn extract_content(body: &WireResponse) -> Option<String> {
    if let Some(choice) = body.choices.first() {
        if let Some(content) = &choice.message.content {
            return Some(content.clone());
        }
    }
    if let Some(block) = body.content.first() {
        if let Some(text) = &block.text {
            return Some(text.clone());
        }
    }
    None
}
