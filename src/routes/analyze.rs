use axum::{extract::State, response::Json as ResponseJson, routing::post, Json, Router};
use tracing::{info, warn};

use crate::analysis::{self, prompts, QueryKind};
use crate::frame::Frame;
use crate::models::{AnalyzeRequest, AnalyzeResponse, AppState};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/analyze", post(analyze))
        .with_state(state)
}

async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> AppResult<ResponseJson<AnalyzeResponse>> {
    if request.query.trim().is_empty() {
        return Err(AppError::InvalidRequest("No query provided".to_string()));
    }
    if request.files.is_empty() {
        return Err(AppError::InvalidRequest("No files selected".to_string()));
    }

    // Resolve every name first so a typo fails fast with a 404.
    let mut paths = Vec::with_capacity(request.files.len());
    for name in &request.files {
        paths.push(state.store.path_of(name).await?);
    }

    let mut frames = Vec::new();
    let mut unparsed = Vec::new();
    for (name, path) in request.files.iter().zip(paths.iter()) {
        match Frame::load_path(path) {
            Ok(frame) => frames.push(frame),
            Err(e) => {
                warn!(file = %name, error = %e, "Skipping unparsable file");
                unparsed.push(name.clone());
            }
        }
    }
    let frame = Frame::concat(frames)?;

    let kind = QueryKind::detect(&request.query);
    let mode = resolve_mode(request.mode.as_deref(), &state.config.llm.api_key);
    info!(kind = kind.name(), mode, rows = frame.row_count(), "Running analysis");

    let result = if mode == "local" {
        let mut report = analysis::run_local_report(kind, &frame);
        append_parse_notes(&mut report, &unparsed);
        report
    } else {
        let mut context = frame.context(prompts::CONTEXT_SAMPLE_ROWS);
        append_parse_notes(&mut context, &unparsed);
        analysis::run_ai_analysis(
            &state.llm,
            &state.config.llm.model,
            state.config.llm.max_tokens,
            kind,
            &request.query,
            &context,
        )
        .await?
    };

    Ok(Json(AnalyzeResponse {
        success: true,
        title: kind.title().to_string(),
        result,
        kind,
        mode: mode.to_string(),
        files_used: request.files,
    }))
}

/// Files that failed to load are still reported, whichever mode answered.
fn append_parse_notes(text: &mut String, unparsed: &[String]) {
    for name in unparsed {
        text.push_str(&format!("\nNote: could not parse {}.", name));
    }
}

/// Local mode is explicit opt-in, or the fallback when no API key is set.
fn resolve_mode(requested: Option<&str>, api_key: &str) -> &'static str {
    match requested {
        Some("local") => "local",
        _ if api_key.is_empty() => "local",
        _ => "ai",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_parse_notes() {
        let mut text = String::from("report");
        append_parse_notes(&mut text, &["bad.xlsx".to_string()]);
        assert!(text.contains("could not parse bad.xlsx"));

        let mut text = String::from("report");
        append_parse_notes(&mut text, &[]);
        assert_eq!(text, "report");
    }

    #[test]
    fn test_resolve_mode_explicit_local() {
        assert_eq!(resolve_mode(Some("local"), "sk-key"), "local");
    }

    #[test]
    fn test_resolve_mode_defaults_to_ai_with_key() {
        assert_eq!(resolve_mode(None, "sk-key"), "ai");
        assert_eq!(resolve_mode(Some("ai"), "sk-key"), "ai");
    }

    #[test]
    fn test_resolve_mode_falls_back_without_key() {
        assert_eq!(resolve_mode(None, ""), "local");
        assert_eq!(resolve_mode(Some("ai"), ""), "local");
    }
}
