//! Canned collaborators for exercising the pipeline without network access.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use crate::artwork::{ArtworkError, ArtworkProvider, ArtworkRecord};
use crate::llm_client::{LlmError, LlmResponse, ModelInvoker, ModelParameters};
use crate::pipeline::generator::PoemPipeline;
use crate::pipeline::identifier::ClockIdAssigner;
use crate::pipeline::styles::{StyleCatalog, StyleSelector};

pub struct FixedArtwork(pub ArtworkRecord);

#[async_trait]
impl ArtworkProvider for FixedArtwork {
    async fn fetch_random(&self, _: bool) -> Result<ArtworkRecord, ArtworkError> {
        Ok(self.0.clone())
    }
}

pub struct FailingArtwork;

#[async_trait]
impl ArtworkProvider for FailingArtwork {
    async fn fetch_random(&self, _: bool) -> Result<ArtworkRecord, ArtworkError> {
        Err(ArtworkError::Empty)
    }
}

pub struct FixedStyle(pub &'static str);

impl StyleSelector for FixedStyle {
    fn select(&self, _: &StyleCatalog) -> String {
        self.0.to_string()
    }
}

type Respond = Box<dyn Fn() -> Result<LlmResponse, LlmError> + Send + Sync>;

/// Returns a canned response and records every prompt it was sent.
pub struct CannedModel {
    respond: Respond,
    pub prompts: Mutex<Vec<String>>,
}

impl CannedModel {
    pub fn text(text: &'static str) -> Self {
        Self::with(move || Ok(LlmResponse::from_text(text)))
    }

    pub fn with(f: impl Fn() -> Result<LlmResponse, LlmError> + Send + Sync + 'static) -> Self {
        Self {
            respond: Box::new(f),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelInvoker for CannedModel {
    async fn invoke(&self, prompt: &str, _: &ModelParameters) -> Result<LlmResponse, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        (self.respond)()
    }
}

pub fn params() -> ModelParameters {
    ModelParameters {
        model: "claude-sonnet-4-5".to_string(),
        max_tokens: 1000,
        top_p: 0.999,
        top_k: 250,
        temperature: 1.0,
        stop_sequences: vec!["\n\nHuman:".to_string()],
    }
}

pub fn starry_night() -> Arc<dyn ArtworkProvider> {
    Arc::new(FixedArtwork(json!({"title": "Starry Night"})))
}

/// Haiku-only pipeline over the given collaborators.
pub fn haiku_pipeline(
    artwork: Arc<dyn ArtworkProvider>,
    model: Arc<dyn ModelInvoker>,
) -> PoemPipeline {
    PoemPipeline::new(
        artwork,
        model,
        Arc::new(FixedStyle("haiku")),
        Arc::new(ClockIdAssigner::new()),
        StyleCatalog::default(),
        params(),
    )
}
