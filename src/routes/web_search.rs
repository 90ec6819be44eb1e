use axum::{extract::State, response::Json as ResponseJson, routing::post, Json, Router};
use tracing::info;

use crate::models::{AppState, WebSearchRequest, WebSearchResponse};
use crate::search::SearchError;
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/web-search", post(web_search))
        .with_state(state)
}

async fn web_search(
    State(state): State<AppState>,
    Json(request): Json<WebSearchRequest>,
) -> AppResult<ResponseJson<WebSearchResponse>> {
    if request.query.trim().is_empty() {
        return Err(AppError::InvalidRequest("No query provided".to_string()));
    }

    let answer = state
        .search
        .search(&request.query)
        .await
        .map_err(search_error)?;

    info!(citations = answer.citations.len(), "Web search answered");

    Ok(Json(WebSearchResponse {
        success: true,
        title: "Web Search Results".to_string(),
        result: answer.content,
        citations: answer.citations,
    }))
}

fn search_error(err: SearchError) -> AppError {
    match err {
        SearchError::NoApiKey => AppError::InvalidRequest(err.to_string()),
        other => AppError::LlmApi(other.to_string()),
    }
}
