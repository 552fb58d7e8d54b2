// Poem generation pipeline.
// artwork → style → prompt → model → extract → id, one sequential chain per run.
// All model calls go through llm_client::ModelInvoker.

pub mod extractor;
pub mod generator;
pub mod handlers;
pub mod identifier;
pub mod prompts;
pub mod styles;
#[cfg(test)]
pub mod testing;

use thiserror::Error;

use crate::artwork::ArtworkError;
use crate::llm_client::LlmError;
use crate::pipeline::extractor::ExtractionError;

/// Failure of one pipeline stage. The stage's own error is kept as `source()`.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("artwork fetch failed: {0}")]
    Provider(#[source] ArtworkError),

    #[error("artwork could not be rendered: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("model invocation failed: {0}")]
    Invocation(#[source] LlmError),

    #[error("model response could not be decoded: {0}")]
    ResponseFormat(#[source] LlmError),

    #[error("poem extraction failed: {0}")]
    Extraction(#[source] ExtractionError),
}

impl From<ArtworkError> for PipelineError {
    fn from(e: ArtworkError) -> Self {
        PipelineError::Provider(e)
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(e: serde_json::Error) -> Self {
        PipelineError::Serialization(e)
    }
}

impl From<LlmError> for PipelineError {
    fn from(e: LlmError) -> Self {
        if e.is_response_format() {
            PipelineError::ResponseFormat(e)
        } else {
            PipelineError::Invocation(e)
        }
    }
}

impl From<ExtractionError> for PipelineError {
    fn from(e: ExtractionError) -> Self {
        PipelineError::Extraction(e)
    }
}
