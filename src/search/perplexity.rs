//! Perplexity Client
//!
//! Forwards a free-text query to a web-search-augmented chat API and relays
//! the generated answer. Citations returned by the API are appended to the
//! answer as a numbered source list.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::SearchConfig;
use crate::types::ChatMessage;

const SEARCH_SYSTEM_PROMPT: &str = "You are a helpful research assistant. Provide accurate, \
well-sourced information from the web. Include relevant facts, statistics, and cite sources \
when possible. Format your response clearly with sections and bullet points.";

/// Errors that can occur during search operations
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search API key not configured")]
    NoApiKey,

    #[error("Search request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse search results: {0}")]
    ParseError(String),

    #[error("No results found for query")]
    NoResults,
}

/// Answer relayed from the search API, citations already appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchAnswer {
    pub content: String,
    pub citations: Vec<String>,
}

pub struct PerplexityClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

#[derive(Serialize)]
struct SearchWireRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    return_citations: bool,
    return_related_questions: bool,
}

#[derive(Deserialize)]
struct SearchWireResponse {
    #[serde(default)]
    choices: Vec<SearchWireChoice>,
    #[serde(default)]
    citations: Vec<String>,
}

#[derive(Deserialize)]
struct SearchWireChoice {
    message: SearchWireMessage,
}

#[derive(Deserialize)]
struct SearchWireMessage {
    content: Option<String>,
}

impl PerplexityClient {
    pub fn new(api_key: &str, base_url: &str, model: &str, max_tokens: u32, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            max_tokens,
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(
            &config.api_key,
            &config.base_url,
            &config.model,
            config.max_tokens,
            config.timeout_secs,
        )
    }

    /// Run a web search and return the summarized answer with sources.
    pub async fn search(&self, query: &str) -> Result<SearchAnswer, SearchError> {
        if self.api_key.is_empty() {
            return Err(SearchError::NoApiKey);
        }

        info!(query = %query, "Forwarding query to web search API");

        let wire = SearchWireRequest {
            model: &self.model,
            messages: vec![
                ChatMessage::system(SEARCH_SYSTEM_PROMPT),
                ChatMessage::user(query),
            ],
            max_tokens: self.max_tokens,
            temperature: 0.2,
            return_citations: true,
            return_related_questions: true,
        };

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&wire)
            .send()
            .await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::RequestFailed(format!("{}: {}", status, body)));
        }

        let body: SearchWireResponse = response
            .json()
            .await
            .map_err(|e| SearchError::ParseError(e.to_string()))?;

        let content = body
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or(SearchError::NoResults)?;

        info!(citations = body.citations.len(), "Web search completed");

        Ok(SearchAnswer {
            content: format_with_sources(&content, &body.citations),
            citations: body.citations,
        })
    }
}

/// Append citations as a numbered source list, matching the answer format the
/// browser displays verbatim.
fn format_with_sources(content: &str, citations: &[String]) -> String {
    if citations.is_empty() {
        return content.to_string();
    }
    let mut out = String::from(content);
    out.push_str("\n\n**Sources:**\n");
    for (i, citation) in citations.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, citation));
    }
    out
}
