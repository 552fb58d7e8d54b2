//! Artwork source — supplies one artwork record per pipeline run.
//!
//! The record is kept as an ordered JSON document; nothing downstream assumes
//! a schema beyond "serializes to text".

use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

/// One artwork, exactly as the provider returned it. Key order is preserved.
pub type ArtworkRecord = Value;

#[derive(Debug, Error)]
pub enum ArtworkError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Artwork API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Artwork API returned no records")]
    Empty,
}

/// Source of artwork metadata.
///
/// `displayable_only` restricts the pick to records the provider considers
/// complete enough to show (for the museum API: records with an image).
#[async_trait]
pub trait ArtworkProvider: Send + Sync {
    async fn fetch_random(&self, displayable_only: bool) -> Result<ArtworkRecord, ArtworkError>;
}

#[derive(Debug, Deserialize)]
struct ArtworkPage {
    info: PageInfo,
    #[serde(default)]
    data: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct PageInfo {
    total: u64,
}

/// Cleveland Museum of Art Open Access API client.
///
/// A random pick takes two requests: one to learn the collection size, one
/// to fetch the record at a random offset.
#[derive(Clone)]
pub struct ClevelandArtClient {
    client: Client,
    base_url: String,
}

impl ClevelandArtClient {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    async fn fetch_page(
        &self,
        skip: u64,
        displayable_only: bool,
    ) -> Result<ArtworkPage, ArtworkError> {
        let mut query = vec![("limit", "1".to_string()), ("skip", skip.to_string())];
        if displayable_only {
            query.push(("has_image", "1".to_string()));
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ArtworkError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<ArtworkPage>().await?)
    }
}

#[async_trait]
impl ArtworkProvider for ClevelandArtClient {
    async fn fetch_random(&self, displayable_only: bool) -> Result<ArtworkRecord, ArtworkError> {
        let first_page = self.fetch_page(0, displayable_only).await?;
        if first_page.info.total == 0 {
            return Err(ArtworkError::Empty);
        }

        let skip = random_offset(&mut rand::thread_rng(), first_page.info.total);
        debug!("Picking artwork {} of {}", skip, first_page.info.total);

        let page = self.fetch_page(skip, displayable_only).await?;
        let record = first_record(page)?;

        info!(
            "Fetched artwork: {}",
            record
                .get("title")
                .and_then(|t| t.as_str())
                .unwrap_or("<untitled>")
        );
        Ok(record)
    }
}

fn random_offset<R: Rng + ?Sized>(rng: &mut R, total: u64) -> u64 {
    rng.gen_range(0..total)
}

fn first_record(page: ArtworkPage) -> Result<ArtworkRecord, ArtworkError> {
    page.data.into_iter().next().ok_or(ArtworkError::Empty)
}
