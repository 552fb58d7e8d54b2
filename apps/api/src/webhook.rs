//! Static-site rebuild trigger.
//!
//! Fire-and-forget: the POST runs on its own task and failures are logged,
//! never returned to the caller.

use reqwest::Client;
use serde_json::json;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Clone)]
pub struct RebuildNotifier {
    client: Client,
    url: Option<String>,
}

impl RebuildNotifier {
    pub fn new(client: Client, url: Option<String>) -> Self {
        Self { client, url }
    }

    /// Sends `{}` to the configured webhook. Returns `None` when no webhook
    /// is configured.
    pub fn trigger(&self) -> Option<JoinHandle<()>> {
        let Some(url) = self.url.clone() else {
            info!("No rebuild webhook configured; skipping");
            return None;
        };

        let client = self.client.clone();
        Some(tokio::spawn(async move {
            info!("Sending to webhook: {}", url);
            match client.post(&url).json(&json!({})).send().await {
                Ok(response) if !response.status().is_success() => {
                    error!("Rebuild webhook returned {}", response.status());
                }
                Ok(_) => info!("Rebuild webhook accepted"),
                Err(e) => error!("Rebuild webhook failed: {e}"),
            }
        }))
    }
}
