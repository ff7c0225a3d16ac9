//! Follow-up chat endpoint.
//!
//! `POST /api/chat` — stateless: the client re-sends the full turn history
//! plus the grounding analysis on every call. The reply is a single bilingual
//! text blob returned verbatim, never re-parsed into structured form.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::config::{CHAT_MAX_TOKENS, SAMPLING_TEMPERATURE};
use crate::conversation::build_upstream_messages;
use crate::models::{AnalysisResult, ConversationTurn, TurnRole};
use crate::upstream::SamplingParams;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ConversationTurn>,
    /// Original analysis, re-supplied each call for contract fidelity.
    /// The grounding rewrite keys off the turn that carries the analysis.
    #[serde(default)]
    pub analysis: Option<AnalysisResult>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// `POST /api/chat` — one assistant reply for the supplied history.
pub async fn send(
    State(ctx): State<ApiContext>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if req.messages.is_empty() {
        return Err(ApiError::BadRequest("No messages provided".into()));
    }
    if let Some(last) = req.messages.last() {
        if last.role == TurnRole::User && last.content.trim().is_empty() {
            return Err(ApiError::BadRequest("Message cannot be empty".into()));
        }
    }

    let messages = build_upstream_messages(&req.messages);

    let model = Arc::clone(&ctx.chat_model);
    let reply = tokio::task::spawn_blocking(move || {
        model.complete(
            &messages,
            SamplingParams {
                max_tokens: CHAT_MAX_TOKENS,
                temperature: SAMPLING_TEMPERATURE,
            },
        )
    })
    .await
    .map_err(|e| ApiError::ChatFailure(format!("Chat task panicked: {e}")))?
    // No fine-grained classification here — any upstream failure is generic.
    .map_err(|e| ApiError::ChatFailure(e.to_string()))?;

    Ok(Json(ChatResponse { response: reply }))
}
