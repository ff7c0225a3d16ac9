//! Image analysis endpoint.
//!
//! `POST /api/analyze` — multipart field `image`. Validation is fail-fast
//! and ordered: presence → declared content type → size ceiling. Only then
//! is the payload encoded and handed to the vision analyzer; no validation
//! failure ever reaches the upstream capability.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;
use base64::Engine;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::config::MAX_IMAGE_BYTES;
use crate::models::AnalysisResult;

/// `POST /api/analyze` — analyze one uploaded plant image.
pub async fn analyze(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, ApiError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("image/") {
            return Err(ApiError::InvalidType);
        }

        // Read incrementally so an oversized upload is rejected as soon as
        // it crosses the ceiling, without buffering the rest.
        let mut data: Vec<u8> = Vec::new();
        loop {
            match field.chunk().await {
                Ok(Some(chunk)) => {
                    if data.len() + chunk.len() > MAX_IMAGE_BYTES {
                        return Err(ApiError::PayloadTooLarge);
                    }
                    data.extend_from_slice(&chunk);
                }
                Ok(None) => break,
                Err(e) => {
                    return Err(ApiError::BadRequest(format!(
                        "Failed to read image field: {e}"
                    )))
                }
            }
        }

        let image_base64 = base64::engine::general_purpose::STANDARD.encode(&data);

        // Observability only — behavior does not depend on this line.
        tracing::info!(
            content_type,
            image_size = data.len(),
            base64_len = image_base64.len(),
            "Processing image analysis request"
        );

        let analyzer = Arc::clone(&ctx.analyzer);
        let result = tokio::task::spawn_blocking(move || analyzer.analyze(&image_base64))
            .await
            .map_err(|e| ApiError::Internal(format!("Analysis task panicked: {e}")))??;

        return Ok(Json(result));
    }

    Err(ApiError::MissingInput)
}
