//! Poem Generation — orchestrates the full pipeline.
//!
//! Flow: fetch artwork → select style → build prompt → invoke model →
//!       extract poem/title → assign id → return `GeneratedPoem`.
//!
//! Any stage failure aborts the run and is returned unchanged. There are no
//! partial results and no fallback poem. Persistence is the caller's job.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::artwork::ArtworkProvider;
use crate::llm_client::{LlmError, ModelInvoker, ModelParameters};
use crate::pipeline::extractor::extract_poem;
use crate::pipeline::identifier::IdAssigner;
use crate::pipeline::prompts::build_poem_prompt;
use crate::pipeline::styles::{StyleCatalog, StyleSelector};
use crate::pipeline::PipelineError;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// The pipeline's only artifact: what gets stored and served back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPoem {
    pub id: String,
    pub poem: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Holds only immutable configuration and `Send + Sync` collaborators, so one
/// instance serves any number of concurrent runs.
#[derive(Clone)]
pub struct PoemPipeline {
    artwork: Arc<dyn ArtworkProvider>,
    model: Arc<dyn ModelInvoker>,
    selector: Arc<dyn StyleSelector>,
    ids: Arc<dyn IdAssigner>,
    catalog: StyleCatalog,
    params: ModelParameters,
}

impl PoemPipeline {
    pub fn new(
        artwork: Arc<dyn ArtworkProvider>,
        model: Arc<dyn ModelInvoker>,
        selector: Arc<dyn StyleSelector>,
        ids: Arc<dyn IdAssigner>,
        catalog: StyleCatalog,
        params: ModelParameters,
    ) -> Self {
        Self {
            artwork,
            model,
            selector,
            ids,
            catalog,
            params,
        }
    }

    /// Runs one generation.
    ///
    /// Steps:
    /// 1. fetch a displayable artwork record
    /// 2. draw a style from the catalog
    /// 3. build the prompt
    /// 4. invoke the model (single attempt)
    /// 5. extract `<poem>` and `<title>`
    /// 6. assign the id
    pub async fn generate(&self) -> Result<GeneratedPoem, PipelineError> {
        // Step 1: Artwork
        let artwork = self.artwork.fetch_random(true).await?;

        // Step 2: Style
        let style = self.selector.select(&self.catalog);
        info!("Generating a {} poem with {}", style, self.params.model);

        // Step 3: Prompt
        let prompt = build_poem_prompt(&artwork, &style)?;

        // Step 4: Model
        let response = self.model.invoke(&prompt, &self.params).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;

        // Step 5: Extraction
        let extracted = extract_poem(text)?;

        // Step 6: Identifier
        let id = self.ids.assign();

        // The title is only logged; stored poems carry `{id, poem}` and nothing else.
        info!(
            "Generated poem {} titled {:?} ({} chars, style: {})",
            id,
            extracted.title,
            extracted.poem.len(),
            style
        );

        Ok(GeneratedPoem {
            id,
            poem: extracted.poem,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
