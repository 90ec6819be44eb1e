use async_trait::async_trait;

use crate::config::LlmConfig;
use crate::types::{AppResult, ChatReply, ChatRequest};

#[async_trait]
pub trait ChatAdapter: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> AppResult<ChatReply>;
}

/// Front door for chat completions. Holds whichever adapter the config
/// selected; handlers only ever see this type.
pub struct ChatClient {
    adapter: Box<dyn ChatAdapter>,
}

impl ChatClient {
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            adapter: Box::new(crate::llm::chat_api::ChatApiAdapter::from_config(config)),
        }
    }

    pub fn with_adapter(adapter: Box<dyn ChatAdapter>) -> Self {
        Self { adapter }
    }

    pub async fn chat(&self, request: &ChatRequest) -> AppResult<ChatReply> {
        self.adapter.chat(request).await
    }
}
