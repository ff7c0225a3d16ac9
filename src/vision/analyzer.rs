//! Vision analysis client: builds the bilingual diagnosis prompt, invokes the
//! model with the inline image, and normalizes the reply.

use std::sync::Arc;

use crate::config::{ANALYSIS_MAX_TOKENS, SAMPLING_TEMPERATURE};
use crate::models::AnalysisResult;
use crate::upstream::{ChatCompletion, ChatMessage, SamplingParams, UpstreamError};

use super::parse::{parse_model_output, recover_from_text, ModelOutput};

/// Fixed instructional text for the image analysis call. Demands the
/// two-language JSON object the normalizer expects.
const ANALYSIS_PROMPT: &str = r#"Analyze this plant image and provide a diagnosis in both Hausa and English.

Format your response as a JSON object with the following structure:
{
  "primaryLanguage": {
    "diagnosis": "Bayani game da matsalar da aka gano (in Hausa)",
    "confidence": number (0-100),
    "recommendations": ["Shawarwari da za'a bi don magance matsalar"]
  },
  "secondaryLanguage": {
    "diagnosis": "Description of the identified issue (in English)",
    "confidence": number (0-100),
    "recommendations": ["Steps to address the issue"]
  }
}

For Hausa (primaryLanguage):
1. Menene matsalar da kake gani a wannan shuka?
2. Yaya kake tabbatar da wannan matsalar (confidence 0-100)?
3. Menene shawarar da zaka bawa manomi don magance wannan matsala?
4. Ta yaya za'a kare wannan matsala daga sake faruwa?

For English (secondaryLanguage):
1. What plant disease or issue do you identify in this image?
2. How confident are you in this diagnosis (0-100)?
3. What recommendations would you give to address this issue?
4. How can this issue be prevented in the future?"#;

/// Analyzes a plant image via the injected model client.
pub struct VisionAnalyzer {
    model: Arc<dyn ChatCompletion>,
}

impl VisionAnalyzer {
    pub fn new(model: Arc<dyn ChatCompletion>) -> Self {
        Self { model }
    }

    /// Analyze a base64-encoded image and return the normalized bilingual
    /// result. Fails only when the upstream capability is unreachable or
    /// returns no content — malformed content degrades instead of failing.
    pub fn analyze(&self, image_base64: &str) -> Result<AnalysisResult, UpstreamError> {
        let _span =
            tracing::info_span!("analyze_image", base64_len = image_base64.len()).entered();
        let start = std::time::Instant::now();

        let data_url = format!("data:image/jpeg;base64,{image_base64}");
        let messages = [ChatMessage::user_with_image(ANALYSIS_PROMPT, data_url)];

        let content = self.model.complete(
            &messages,
            SamplingParams {
                max_tokens: ANALYSIS_MAX_TOKENS,
                temperature: SAMPLING_TEMPERATURE,
            },
        )?;

        let result = match parse_model_output(&content) {
            ModelOutput::Parsed(result) => result,
            ModelOutput::Unparseable(raw) => {
                tracing::warn!(
                    response_len = raw.len(),
                    "Model output not structured, applying line-split recovery"
                );
                recover_from_text(&raw)
            }
        };

        tracing::info!(
            elapsed_ms = %start.elapsed().as_millis(),
            primary_confidence = result.primary_language.confidence,
            "Image analysis complete"
        );

        Ok(result)
    }
}
