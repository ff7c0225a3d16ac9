//! Follow-up conversation assembly.
//!
//! The external model is stateless between calls, so every request re-sends
//! the full turn history. The turn carrying the grounding analysis is
//! rewritten into a plain textual rendering before transmission, and a fixed
//! bilingual system instruction is always prepended.

use crate::models::{AnalysisResult, ConversationTurn, TurnRole};
use crate::upstream::ChatMessage;

pub const CHAT_SYSTEM_PROMPT: &str = r#"You are a bilingual (Hausa and English) plant disease expert. You have analyzed a plant image and provided an initial diagnosis and recommendations. Always provide responses in both Hausa and English, clearly separated. Format your responses as:

HAUSA:
[Your Hausa response here]

ENGLISH:
[Your English response here]

Use the initial analysis as context for answering follow-up questions."#;

/// Deterministic textual rendering of a grounding analysis — the model
/// receives it as plain conversational context rather than structured data.
pub fn render_grounding(analysis: &AnalysisResult) -> String {
    format!(
        "Initial plant analysis:\nHausa: {}\nEnglish: {}\n\nRecommendations:\nHausa: {}\nEnglish: {}",
        analysis.primary_language.diagnosis,
        analysis.secondary_language.diagnosis,
        analysis.primary_language.recommendations.join(", "),
        analysis.secondary_language.recommendations.join(", "),
    )
}

/// Build the full upstream message list: system instruction first, then every
/// turn in order, with grounding turns rewritten.
pub fn build_upstream_messages(turns: &[ConversationTurn]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(turns.len() + 1);
    messages.push(ChatMessage::system(CHAT_SYSTEM_PROMPT));

    for turn in turns {
        let content = match &turn.analysis {
            Some(analysis) => render_grounding(analysis),
            None => turn.content.clone(),
        };
        messages.push(match turn.role {
            TurnRole::User => ChatMessage::user(content),
            TurnRole::Assistant => ChatMessage::assistant(content),
        });
    }

    messages
}
