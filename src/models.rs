use std::sync::Arc;

use crate::analysis::QueryKind;
use crate::config::Config;
use crate::llm::ChatClient;
use crate::search::PerplexityClient;
use crate::store::FileStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: FileStore,
    pub llm: Arc<ChatClient>,
    pub search: Arc<PerplexityClient>,
}

impl AppState {
    pub fn from_config(config: Config) -> Self {
        let store = FileStore::new(&config.storage.data_dir);
        let llm = Arc::new(ChatClient::from_config(&config.llm));
        let search = Arc::new(PerplexityClient::from_config(&config.search));
        Self {
            config,
            store,
            llm,
            search,
        }
    }
}

// API payloads

#[derive(Debug, Clone, serde::Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub files: Vec<String>,
    /// "ai" (default when an API key is configured) or "local".
    #[serde(default)]
    pub mode: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub title: String,
    pub result: String,
    pub kind: QueryKind,
    pub mode: String,
    pub files_used: Vec<String>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct WebSearchRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct WebSearchResponse {
    pub success: bool,
    pub title: String,
    pub result: String,
    pub citations: Vec<String>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub filename: String,
    pub size: u64,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub data_dir: String,
}
