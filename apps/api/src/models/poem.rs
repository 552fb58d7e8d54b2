use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::pipeline::generator::GeneratedPoem;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PoemRow {
    pub id: String,
    pub poem: String,
    pub created_at: DateTime<Utc>,
}

impl From<PoemRow> for GeneratedPoem {
    fn from(row: PoemRow) -> Self {
        GeneratedPoem {
            id: row.id,
            poem: row.poem,
        }
    }
}
