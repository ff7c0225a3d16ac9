//! Upstream model transport — the external vision/text capability is an
//! opaque request/response call; this module owns the HTTP client, the
//! failure taxonomy, and the best-effort failure classifier.

pub mod client;

pub use client::{
    ChatCompletion, ChatMessage, ContentPart, ImageUrl, MessageContent, MockChatModel,
    OpenAiChatClient, SamplingParams,
};

/// Failures from the external model capability, with a machine-readable
/// subcategory so the analysis endpoint can map each to a distinct status.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UpstreamError {
    #[error("Upstream quota or billing failure: {0}")]
    QuotaExceeded(String),
    #[error("Upstream rejected credentials: {0}")]
    CredentialRejected(String),
    #[error("Requested model is not available: {0}")]
    ModelUnavailable(String),
    #[error("Model returned no content")]
    NoContent,
    #[error("Upstream request failed: {0}")]
    Generic(String),
}

#[derive(Debug, Clone, Copy)]
enum FailureKind {
    Quota,
    Credential,
    ModelUnavailable,
}

/// Ordered classification rules over upstream failure text, evaluated top to
/// bottom. Intentionally simple substring matching — anything unmatched falls
/// through to the generic category.
const CLASSIFY_RULES: &[(FailureKind, &[&str])] = &[
    (FailureKind::Quota, &["insufficient_quota", "billing"]),
    (FailureKind::Credential, &["invalid_api_key", "invalid key"]),
    (
        FailureKind::ModelUnavailable,
        &["model_not_available", "does not exist"],
    ),
];

/// Classify an upstream failure message into an `UpstreamError` subcategory.
pub fn classify_failure(detail: &str) -> UpstreamError {
    let lowered = detail.to_lowercase();
    for (kind, needles) in CLASSIFY_RULES {
        if needles.iter().any(|needle| lowered.contains(needle)) {
            return match kind {
                FailureKind::Quota => UpstreamError::QuotaExceeded(detail.to_string()),
                FailureKind::Credential => UpstreamError::CredentialRejected(detail.to_string()),
                FailureKind::ModelUnavailable => {
                    UpstreamError::ModelUnavailable(detail.to_string())
                }
            };
        }
    }
    UpstreamError::Generic(detail.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_messages_classify_as_quota() {
        assert!(matches!(
            classify_failure("429: insufficient_quota for this key"),
            UpstreamError::QuotaExceeded(_)
        ));
        assert!(matches!(
            classify_failure("Billing hard limit reached"),
            UpstreamError::QuotaExceeded(_)
        ));
    }

    #[test]
    fn credential_messages_classify_as_credential() {
        assert!(matches!(
            classify_failure("Incorrect API key provided: invalid_api_key"),
            UpstreamError::CredentialRejected(_)
        ));
        assert!(matches!(
            classify_failure("Invalid key supplied"),
            UpstreamError::CredentialRejected(_)
        ));
    }

    #[test]
    fn model_messages_classify_as_unavailable() {
        assert!(matches!(
            classify_failure("The model `gpt-4o-mini` does not exist"),
            UpstreamError::ModelUnavailable(_)
        ));
    }

    #[test]
    fn unmatched_messages_fall_through_to_generic() {
        let err = classify_failure("connection reset by peer");
        match err {
            UpstreamError::Generic(detail) => {
                assert!(detail.contains("connection reset"));
            }
            other => panic!("expected Generic, got {other:?}"),
        }
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert!(matches!(
            classify_failure("INSUFFICIENT_QUOTA"),
            UpstreamError::QuotaExceeded(_)
        ));
    }

    #[test]
    fn rules_preserve_original_detail() {
        let err = classify_failure("billing issue on account");
        assert_eq!(
            err.to_string(),
            "Upstream quota or billing failure: billing issue on account"
        );
    }
}
