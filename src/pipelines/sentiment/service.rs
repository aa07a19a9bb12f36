use std::sync::Arc;

use super::builder::SentimentPipelineBuilder;
use super::format::{format, DisplayPayload};
use super::pipeline::{Output, SentimentPipeline};
use crate::error::{Result, SentimentError};

/// Long-lived front end for a sentiment pipeline.
///
/// Startup never panics or aborts: if the artifacts fail to load, the error is
/// logged once and every later call fails with
/// [`SentimentError::ArtifactUnavailable`] instead of producing a prediction.
#[derive(Debug, Clone)]
pub struct SentimentService {
    state: std::result::Result<Arc<SentimentPipeline>, String>,
}

impl SentimentService {
    /// Build the pipeline, recording (not returning) a startup failure.
    pub fn start(builder: SentimentPipelineBuilder) -> Self {
        match builder.build() {
            Ok(pipeline) => Self::from_pipeline(Arc::new(pipeline)),
            Err(e) => {
                tracing::error!(error = %e, "sentiment service failed to start");
                Self {
                    state: Err(e.to_string()),
                }
            }
        }
    }

    pub fn from_pipeline(pipeline: Arc<SentimentPipeline>) -> Self {
        Self {
            state: Ok(pipeline),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ok()
    }

    /// Why startup failed, if it did.
    pub fn startup_error(&self) -> Option<&str> {
        self.state.as_ref().err().map(String::as_str)
    }

    pub fn pipeline(&self) -> Result<&Arc<SentimentPipeline>> {
        self.state
            .as_ref()
            .map_err(|reason| SentimentError::ArtifactUnavailable(reason.clone()))
    }

    /// Classify one review. See [`SentimentPipeline::infer`].
    pub fn infer(&self, raw: &str) -> Result<Output> {
        self.pipeline()?.infer(raw)
    }

    /// Classify one review and format it for display.
    pub fn predict(&self, raw: &str) -> Result<DisplayPayload> {
        self.infer(raw).map(|output| format(&output))
    }
}
