//! API Routes
//!
//! HTTP endpoints for the application:
//! - `/` - Single-page UI
//! - `/api/files` - List uploaded data files
//! - `/api/upload` - Multipart file upload
//! - `/api/analyze` - Natural-language analysis over selected files
//! - `/api/web-search` - Web search with AI-summarized results
//! - `/api/health` - Health check

pub mod analyze;
pub mod files;
pub mod health;
pub mod ui;
pub mod web_search;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::models::AppState;

pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    Router::new()
        .merge(files::router(state.clone()))
        .merge(analyze::router(state.clone()))
        .merge(web_search::router(state.clone()))
        .merge(health::router(state))
        .merge(ui::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;

    fn test_state() -> AppState {
        let data_dir = std::env::temp_dir().join(format!("datalyst-routes-{}", uuid::Uuid::new_v4()));
        let mut config = test_config();
        config.storage.data_dir = data_dir.display().to_string();
        AppState::from_config(config)
    }

    // No API keys set, so analysis resolves to local mode without network.
    fn test_config() -> Config {
        Config {
            server: crate::config::ServerConfig {
                port: 0,
                host: "127.0.0.1".to_string(),
            },
            llm: crate::config::LlmConfig {
                api_key: String::new(),
                base_url: "http://127.0.0.1:1".to_string(),
                model: "test-model".to_string(),
                max_tokens: 256,
                timeout_secs: 5,
            },
            search: crate::config::SearchConfig {
                api_key: String::new(),
                base_url: "http://127.0.0.1:1".to_string(),
                model: "test-model".to_string(),
                max_tokens: 256,
                timeout_secs: 5,
            },
            storage: crate::config::StorageConfig {
                data_dir: "unused".to_string(),
            },
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_files_empty_initially() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::get("/api/files").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_analyze_requires_query_and_files() {
        let app = create_router(test_state());
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/analyze",
                serde_json::json!({ "query": "", "files": ["a.csv"] }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Invalid request: No query provided");

        let response = app
            .oneshot(post_json(
                "/api/analyze",
                serde_json::json!({ "query": "summary", "files": [] }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_analyze_unknown_file_is_404() {
        let app = create_router(test_state());
        let response = app
            .oneshot(post_json(
                "/api/analyze",
                serde_json::json!({ "query": "summary", "files": ["missing.csv"] }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("missing.csv"));
    }

    #[tokio::test]
    async fn test_analyze_local_mode_end_to_end() {
        let state = test_state();
        state
            .store
            .save(
                "sales.csv",
                bytes::Bytes::from_static(b"brand,sales\nAcme,100\nZen,80\n"),
            )
            .await
            .unwrap();

        let app = create_router(state);
        let response = app
            .oneshot(post_json(
                "/api/analyze",
                serde_json::json!({ "query": "give me a summary", "files": ["sales.csv"] }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["mode"], "local");
        assert_eq!(body["kind"], "summary");
        assert_eq!(body["title"], "Data Summary");
        assert!(body["result"].as_str().unwrap().contains("2 rows"));
    }

    fn multipart_request(field: &str, filename: &str, content: &str) -> Request<Body> {
        let boundary = "x-test-boundary";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; \
filename=\"{filename}\"\r\nContent-Type: text/csv\r\n\r\n{content}\r\n--{boundary}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_upload_roundtrip() {
        let state = test_state();
        let app = create_router(state);

        let response = app
            .clone()
            .oneshot(multipart_request("file", "t.csv", "a,b\n1,2\n"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["filename"], "t.csv");

        let response = app
            .oneshot(Request::get("/api/files").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body[0]["name"], "t.csv");
    }

    #[tokio::test]
    async fn test_upload_without_file_field_is_400() {
        let app = create_router(test_state());
        let response = app
            .oneshot(multipart_request("other", "t.csv", "a,b\n1,2\n"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid request: No file provided");
    }

    #[tokio::test]
    async fn test_upload_rejects_bad_extension() {
        let app = create_router(test_state());
        let response = app
            .oneshot(multipart_request("file", "notes.txt", "hello"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_analyze_local_mode_reports_unparsable_file() {
        let state = test_state();
        state
            .store
            .save(
                "sales.csv",
                bytes::Bytes::from_static(b"brand,sales\nAcme,100\n"),
            )
            .await
            .unwrap();
        // Text bytes behind an Excel extension cannot be opened as a workbook.
        state
            .store
            .save("bad.xlsx", bytes::Bytes::from_static(b"not a workbook"))
            .await
            .unwrap();

        let app = create_router(state);
        let response = app
            .oneshot(post_json(
                "/api/analyze",
                serde_json::json!({
                    "query": "give me a summary",
                    "files": ["sales.csv", "bad.xlsx"]
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["mode"], "local");
        assert!(body["result"]
            .as_str()
            .unwrap()
            .contains("could not parse bad.xlsx"));
    }

    #[tokio::test]
    async fn test_analyze_ai_context_carries_parse_marker() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(mockito::Matcher::Regex(
                "could not parse bad.xlsx".to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"canned analysis"}}]}"#)
            .create_async()
            .await;

        let data_dir =
            std::env::temp_dir().join(format!("datalyst-routes-{}", uuid::Uuid::new_v4()));
        let mut config = test_config();
        config.storage.data_dir = data_dir.display().to_string();
        config.llm.api_key = "test-key".to_string();
        config.llm.base_url = server.url();
        let state = AppState::from_config(config);

        state
            .store
            .save(
                "sales.csv",
                bytes::Bytes::from_static(b"brand,sales\nAcme,100\n"),
            )
            .await
            .unwrap();
        state
            .store
            .save("bad.xlsx", bytes::Bytes::from_static(b"not a workbook"))
            .await
            .unwrap();

        let app = create_router(state);
        let response = app
            .oneshot(post_json(
                "/api/analyze",
                serde_json::json!({
                    "query": "give me a summary",
                    "files": ["sales.csv", "bad.xlsx"]
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["mode"], "ai");
        assert_eq!(body["result"], "canned analysis");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_web_search_requires_query() {
        let app = create_router(test_state());
        let response = app
            .oneshot(post_json("/api/web-search", serde_json::json!({ "query": "" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_index_serves_html() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
