//! Image analysis: prompt construction, the upstream call, and normalization
//! of the model's loosely-structured reply into a fixed bilingual schema.

pub mod analyzer;
pub mod parse;

pub use analyzer::VisionAnalyzer;
pub use parse::{parse_model_output, recover_from_text, ModelOutput};
