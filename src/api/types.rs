//! Shared state for the API router.

use std::sync::Arc;

use crate::store::AnalysisStore;
use crate::upstream::ChatCompletion;
use crate::vision::VisionAnalyzer;

/// Shared context for all API routes. Cheap to clone.
#[derive(Clone)]
pub struct ApiContext {
    pub analyzer: Arc<VisionAnalyzer>,
    pub chat_model: Arc<dyn ChatCompletion>,
    pub store: Arc<dyn AnalysisStore>,
}

impl ApiContext {
    /// Build the context from an injected model client and store. The
    /// analyzer shares the same model client as the chat endpoint.
    pub fn new(model: Arc<dyn ChatCompletion>, store: Arc<dyn AnalysisStore>) -> Self {
        Self {
            analyzer: Arc::new(VisionAnalyzer::new(Arc::clone(&model))),
            chat_model: model,
            store,
        }
    }
}
