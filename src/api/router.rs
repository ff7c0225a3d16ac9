//! API router.
//!
//! Returns a composable `Router` over a shared `ApiContext`. The analyze
//! route opts out of the default body limit: the handler streams the image
//! field itself and rejects anything past the 20 MiB ceiling, so every
//! oversized upload gets the same size error regardless of how far over
//! the limit it is.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the API router with all routes under `/api/`.
pub fn api_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/api/health", get(endpoints::health::check))
        .route(
            "/api/analyze",
            post(endpoints::analyze::analyze).layer(DefaultBodyLimit::disable()),
        )
        .route("/api/chat", post(endpoints::chat::send))
        .route(
            "/api/search",
            get(endpoints::search::search).post(endpoints::search::append),
        )
        .with_state(ctx)
}
