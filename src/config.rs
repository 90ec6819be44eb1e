use anyhow::Result;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub search: SearchConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

/// Generic chat-completions endpoint used for data analysis answers.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

/// Web-search-augmented chat endpoint (Perplexity-style).
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding uploaded data files.
    pub data_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            llm: LlmConfig {
                api_key: env::var("LLM_API_KEY").unwrap_or_default(),
                base_url: env::var("LLM_API_URL")
                    .unwrap_or_else(|_| "https://api.openanalyst.com/api/ai/chat".to_string()),
                model: env::var("LLM_MODEL")
                    .unwrap_or_else(|_| "anthropic/claude-sonnet-4".to_string()),
                max_tokens: env::var("LLM_MAX_TOKENS")
                    .unwrap_or_else(|_| "4096".to_string())
                    .parse()?,
                timeout_secs: env::var("LLM_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "120".to_string())
                    .parse()?,
            },
            search: SearchConfig {
                api_key: env::var("PERPLEXITY_API_KEY").unwrap_or_default(),
                base_url: env::var("PERPLEXITY_API_URL")
                    .unwrap_or_else(|_| "https://api.perplexity.ai/chat/completions".to_string()),
                model: env::var("PERPLEXITY_MODEL")
                    .unwrap_or_else(|_| "llama-3.1-sonar-small-128k-online".to_string()),
                max_tokens: env::var("PERPLEXITY_MAX_TOKENS")
                    .unwrap_or_else(|_| "2048".to_string())
                    .parse()?,
                timeout_secs: env::var("PERPLEXITY_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse()?,
            },
            storage: StorageConfig {
                data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            },
        })
    }
}
