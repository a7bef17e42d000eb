//! Route definitions of the HTTP function

use axum::{Router, routing::get};

use super::handlers::{self, AppState};

/// Create the router with all routes
pub fn create_router(app_state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/analyze", get(handlers::analyze).post(handlers::analyze))
        .with_state(app_state);

    Router::new().nest("/api", api)
}
