//! Wire and domain types shared across the API, vision, and store layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One language's half of a diagnosis.
///
/// `confidence` is a 0–100 score as reported (or defaulted) by the
/// normalization layer; it is never absent in a finished result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizedDiagnosis {
    pub diagnosis: String,
    pub confidence: f32,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Complete bilingual analysis for one uploaded image.
///
/// Both halves are always present — malformed model output degrades to
/// sentinel defaults instead of leaving a side null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub primary_language: LocalizedDiagnosis,
    pub secondary_language: LocalizedDiagnosis,
}

/// Who spoke a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One turn of the follow-up conversation.
///
/// The first assistant turn conventionally carries the grounding analysis;
/// before transmission that turn's content is replaced by a textual
/// rendering of the analysis (see `conversation::render_grounding`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResult>,
}

/// A past analysis as held by the ephemeral search store.
///
/// Appended, never updated. `id` and `createdAt` are server-assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAnalysisRecord {
    pub id: Uuid,
    pub diagnosis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Client-supplied fields for a record append (`POST /api/search`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAnalysisRecord {
    pub diagnosis: String,
    #[serde(default)]
    pub confidence: Option<f32>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}
