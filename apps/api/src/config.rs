use std::str::FromStr;

use anyhow::{Context, Result};

use crate::llm_client::ModelParameters;
use crate::pipeline::styles::{EmptyCatalog, StyleCatalog};

const DEFAULT_ARTWORK_API_URL: &str = "https://openaccess-api.clevelandart.org/api/artworks/";
const DEFAULT_ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absent → poems are kept in memory for the life of the process.
    pub database_url: Option<String>,
    pub anthropic_api_key: String,
    pub anthropic_api_url: String,
    pub artwork_api_url: String,
    pub rebuild_webhook_url: Option<String>,
    pub model: ModelParameters,
    pub styles: StyleCatalog,
    /// Fixes the style sequence for reproducible runs.
    pub style_seed: Option<u64>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            anthropic_api_url: optional_env("ANTHROPIC_API_URL")
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_API_URL.to_string()),
            artwork_api_url: optional_env("ARTWORK_API_URL")
                .unwrap_or_else(|| DEFAULT_ARTWORK_API_URL.to_string()),
            rebuild_webhook_url: optional_env("REBUILD_WEBHOOK_URL"),
            model: model_parameters_from_env()?,
            styles: optional_env("POEM_STYLES")
                .map(|raw| parse_style_list(&raw))
                .transpose()
                .context("POEM_STYLES must name at least one style")?
                .unwrap_or_default(),
            style_seed: optional_env("STYLE_SEED")
                .map(|raw| raw.trim().parse::<u64>())
                .transpose()
                .context("STYLE_SEED must be an unsigned integer")?,
            port: parse_env("PORT", 8080u16)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Generation parameters. Defaults: 1000 tokens, near-full nucleus, full temperature.
fn model_parameters_from_env() -> Result<ModelParameters> {
    let stop_sequences = optional_env("POEM_STOP_SEQUENCES")
        .map(|raw| parse_stop_sequences(&raw))
        .unwrap_or_else(|| vec!["\n\nHuman:".to_string()]);

    Ok(ModelParameters {
        model: optional_env("POEM_MODEL").unwrap_or_else(|| "claude-sonnet-4-5".to_string()),
        max_tokens: parse_env("POEM_MAX_TOKENS", 1000u32)?,
        top_p: parse_env("POEM_TOP_P", 0.999f32)?,
        top_k: parse_env("POEM_TOP_K", 250u32)?,
        temperature: parse_env("POEM_TEMPERATURE", 1.0f32)?,
        stop_sequences,
    })
}

/// Splits a `|`-separated list; `\n` escapes become real newlines.
fn parse_stop_sequences(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(|s| s.replace("\\n", "\n"))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Comma-separated style names, e.g. `haiku, sonnet, ode`.
fn parse_style_list(raw: &str) -> Result<StyleCatalog, EmptyCatalog> {
    StyleCatalog::new(raw.split(',').map(str::trim).filter(|s| !s.is_empty()))
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}
