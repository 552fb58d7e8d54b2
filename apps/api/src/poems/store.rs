//! Poem store — durable home of pipeline output, keyed by generation id.
//!
//! Two backends share the `PoemStore` trait: Postgres for deployments and an
//! in-memory list when no database is configured.

use std::future::Future;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::poem::PoemRow;
use crate::pipeline::generator::GeneratedPoem;

/// Rows fetched per round trip when listing.
const LIST_PAGE_SIZE: i64 = 100;

/// Keyset position: `(created_at, id)` of the last row already returned.
type PageCursor = (DateTime<Utc>, String);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait PoemStore: Send + Sync {
    /// Stores a poem. An existing poem with the same id is replaced.
    async fn save(&self, poem: &GeneratedPoem) -> Result<(), StoreError>;

    async fn get(&self, id: &str) -> Result<Option<GeneratedPoem>, StoreError>;

    /// Every stored poem in arrival order.
    async fn list(&self) -> Result<Vec<GeneratedPoem>, StoreError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres
// ────────────────────────────────────────────────────────────────────────────

pub struct PgPoemStore {
    pool: PgPool,
}

impl PgPoemStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One keyset page strictly after `cursor`.
    async fn page_after(&self, cursor: Option<PageCursor>) -> Result<Vec<PoemRow>, StoreError> {
        let (after_ts, after_id) = cursor.unzip();

        let rows = sqlx::query_as::<_, PoemRow>(
            r#"
            SELECT id, poem, created_at
            FROM poems
            WHERE $1::timestamptz IS NULL OR (created_at, id) > ($1, $2::text)
            ORDER BY created_at, id
            LIMIT $3
            "#,
        )
        .bind(after_ts)
        .bind(after_id)
        .bind(LIST_PAGE_SIZE)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl PoemStore for PgPoemStore {
    async fn save(&self, poem: &GeneratedPoem) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO poems (id, poem)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET poem = EXCLUDED.poem
            "#,
        )
        .bind(&poem.id)
        .bind(&poem.poem)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<GeneratedPoem>, StoreError> {
        let row = sqlx::query_as::<_, PoemRow>(
            "SELECT id, poem, created_at FROM poems WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(GeneratedPoem::from))
    }

    async fn list(&self) -> Result<Vec<GeneratedPoem>, StoreError> {
        collect_pages(|cursor| self.page_after(cursor)).await
    }
}

/// Drains a keyset-paged source. Stops on the first page shorter than
/// `LIST_PAGE_SIZE`; each request resumes after the last row seen.
async fn collect_pages<F, Fut>(mut fetch_page: F) -> Result<Vec<GeneratedPoem>, StoreError>
where
    F: FnMut(Option<PageCursor>) -> Fut,
    Fut: Future<Output = Result<Vec<PoemRow>, StoreError>>,
{
    let mut poems = Vec::new();
    let mut cursor = None;

    loop {
        let page = fetch_page(cursor).await?;
        let fetched = page.len();
        debug!("Fetched page of {} poems", fetched);

        cursor = page.last().map(|r| (r.created_at, r.id.clone()));
        poems.extend(page.into_iter().map(GeneratedPoem::from));

        if (fetched as i64) < LIST_PAGE_SIZE {
            break;
        }
    }

    Ok(poems)
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory
// ────────────────────────────────────────────────────────────────────────────

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryPoemStore {
    poems: RwLock<Vec<GeneratedPoem>>,
}

impl InMemoryPoemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PoemStore for InMemoryPoemStore {
    async fn save(&self, poem: &GeneratedPoem) -> Result<(), StoreError> {
        let mut poems = self.poems.write().await;
        match poems.iter_mut().find(|p| p.id == poem.id) {
            Some(existing) => existing.poem = poem.poem.clone(),
            None => poems.push(poem.clone()),
        }
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<GeneratedPoem>, StoreError> {
        Ok(self.poems.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<GeneratedPoem>, StoreError> {
        Ok(self.poems.read().await.clone())
    }
}
