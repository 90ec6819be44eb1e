// Datalyst - natural-language data analysis over uploaded CSV/Excel files

pub mod analysis;
pub mod config;
pub mod frame;
pub mod llm;
pub mod models;
pub mod routes;
pub mod search;
pub mod store;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
