//! Analysis history search endpoints.
//!
//! `GET /api/search?q=` queries the ephemeral store by case-insensitive
//! substring; `POST /api/search` appends one record.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{NewAnalysisRecord, StoredAnalysisRecord};

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// `GET /api/search` — records matching the query, insertion order preserved.
pub async fn search(
    State(ctx): State<ApiContext>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<StoredAnalysisRecord>>, ApiError> {
    let query = params
        .q
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::BadRequest("No search query provided".into()))?;

    let results = ctx.store.search(&query)?;
    Ok(Json(results))
}

#[derive(Serialize)]
pub struct AppendResponse {
    pub success: bool,
}

/// `POST /api/search` — append one analysis record to the store.
pub async fn append(
    State(ctx): State<ApiContext>,
    Json(record): Json<NewAnalysisRecord>,
) -> Result<Json<AppendResponse>, ApiError> {
    let stored = ctx.store.append(record)?;
    tracing::debug!(id = %stored.id, "Analysis record stored");
    Ok(Json(AppendResponse { success: true }))
}
