use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    response::Json as ResponseJson,
    routing::{get, post},
    Json, Router,
};
use tracing::info;

use crate::models::{AppState, UploadResponse};
use crate::store::FileEntry;
use crate::types::{AppError, AppResult};

const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/files", get(list_files))
        .route("/api/upload", post(upload_file))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

async fn list_files(State(state): State<AppState>) -> AppResult<ResponseJson<Vec<FileEntry>>> {
    let files = state.store.list().await?;
    Ok(Json(files))
}

async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<ResponseJson<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidRequest(e.to_string()))?;
        let size = data.len() as u64;

        state.store.save(&filename, data).await?;
        info!(filename = %filename, size, "File upload accepted");

        return Ok(Json(UploadResponse {
            success: true,
            filename,
            size,
        }));
    }

    Err(AppError::InvalidRequest("No file provided".to_string()))
}
