//! Normalization of model output into an `AnalysisResult`.
//!
//! Two structurally distinct paths:
//! - a field-wise parse of the two-language JSON object, substituting
//!   defaults for any missing or mistyped sub-field (never null);
//! - a line-splitting fallback for text that is not a JSON object. The
//!   fallback assumes the response interleaves the two languages by line
//!   halves — approximate recovery, not a second source of truth.

use serde_json::Value;

use crate::models::{AnalysisResult, LocalizedDiagnosis};

/// Sentinel diagnosis when the model gives none (Hausa).
pub const PRIMARY_NO_DESCRIPTION: &str = "Babu bayani";
/// Sentinel diagnosis when the model gives none (English).
pub const SECONDARY_NO_DESCRIPTION: &str = "No description available";
/// Fixed confidence assigned by the line-splitting fallback.
pub const FALLBACK_CONFIDENCE: f32 = 70.0;

/// Outcome of the structured parse step.
#[derive(Debug)]
pub enum ModelOutput {
    Parsed(AnalysisResult),
    Unparseable(String),
}

/// Attempt structured parsing of the response text.
///
/// The parse is field-wise over a dynamic JSON value rather than a strict
/// typed deserialize: one mistyped sub-field (a string where an array was
/// asked for, a quoted number) must not throw away the rest of an otherwise
/// valid document. Well-typed fields pass through unchanged; absent or
/// mistyped ones get the documented defaults. Only text that is not a JSON
/// object at all comes back as `Unparseable` for the caller to recover from.
pub fn parse_model_output(text: &str) -> ModelOutput {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(fields)) => ModelOutput::Parsed(AnalysisResult {
            primary_language: normalize_side(fields.get("primaryLanguage"), PRIMARY_NO_DESCRIPTION),
            secondary_language: normalize_side(
                fields.get("secondaryLanguage"),
                SECONDARY_NO_DESCRIPTION,
            ),
        }),
        _ => ModelOutput::Unparseable(text.to_string()),
    }
}

fn normalize_side(raw: Option<&Value>, sentinel: &str) -> LocalizedDiagnosis {
    LocalizedDiagnosis {
        diagnosis: raw
            .and_then(|v| v.get("diagnosis"))
            .and_then(Value::as_str)
            .filter(|d| !d.is_empty())
            .map_or_else(|| sentinel.to_string(), str::to_string),
        confidence: raw
            .and_then(|v| v.get("confidence"))
            .and_then(Value::as_f64)
            .unwrap_or(0.0) as f32,
        recommendations: raw
            .and_then(|v| v.get("recommendations"))
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    }
}

/// Best-effort recovery from non-JSON output.
///
/// Splits the text into non-empty lines and treats the first half as the
/// primary language (first line diagnosis, rest recommendations), the second
/// half analogously for the secondary language. Both sides get a fixed
/// confidence of 70.
pub fn recover_from_text(raw: &str) -> AnalysisResult {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let half = lines.len().div_ceil(2);

    AnalysisResult {
        primary_language: LocalizedDiagnosis {
            diagnosis: lines
                .first()
                .map(|l| l.to_string())
                .unwrap_or_else(|| PRIMARY_NO_DESCRIPTION.to_string()),
            confidence: FALLBACK_CONFIDENCE,
            recommendations: collect_lines(&lines, 1, half),
        },
        secondary_language: LocalizedDiagnosis {
            diagnosis: lines
                .get(half)
                .map(|l| l.to_string())
                .unwrap_or_else(|| SECONDARY_NO_DESCRIPTION.to_string()),
            confidence: FALLBACK_CONFIDENCE,
            recommendations: collect_lines(&lines, half + 1, lines.len()),
        },
    }
}

fn collect_lines(lines: &[&str], from: usize, to: usize) -> Vec<String> {
    lines
        .get(from..to)
        .unwrap_or(&[])
        .iter()
        .map(|l| l.to_string())
        .collect()
}
