//! Chirp storage.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePool;
use uuid::{Uuid, fmt::Hyphenated};

#[derive(Clone)]
pub struct ChirpStore {
    pool: SqlitePool,
}

/// A stored chirp. The body has already been through the profanity filter.
#[derive(Debug, Clone)]
pub struct Chirp {
    pub id: Uuid,
    pub body: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation-time ordering for chirp listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(sqlx::FromRow)]
struct ChirpRow {
    id: Hyphenated,
    body: String,
    user_id: Hyphenated,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ChirpRow> for Chirp {
    fn from(row: ChirpRow) -> Self {
        Self {
            id: row.id.into_uuid(),
            body: row.body,
            user_id: row.user_id.into_uuid(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl ChirpStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a chirp owned by `user_id`.
    pub async fn create(&self, user_id: Uuid, body: &str) -> Result<Chirp, sqlx::Error> {
        let now = Utc::now();
        let chirp = Chirp {
            id: Uuid::new_v4(),
            body: body.to_string(),
            user_id,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO chirps (id, body, user_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(chirp.id.hyphenated())
        .bind(&chirp.body)
        .bind(chirp.user_id.hyphenated())
        .bind(chirp.created_at)
        .bind(chirp.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(chirp)
    }

    /// Get a chirp by ID.
    pub async fn get(&self, id: Uuid) -> Result<Option<Chirp>, sqlx::Error> {
        let row: Option<ChirpRow> = sqlx::query_as(
            "SELECT id, body, user_id, created_at, updated_at FROM chirps WHERE id = ?",
        )
        .bind(id.hyphenated())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Chirp::from))
    }

    /// List chirps ordered by creation time, optionally only those by one author.
    pub async fn list(
        &self,
        author: Option<Uuid>,
        order: SortOrder,
    ) -> Result<Vec<Chirp>, sqlx::Error> {
        let rows: Vec<ChirpRow> = match author {
            Some(author) => {
                sqlx::query_as(&format!(
                    "SELECT id, body, user_id, created_at, updated_at FROM chirps WHERE user_id = ? ORDER BY created_at {}",
                    order.as_sql()
                ))
                .bind(author.hyphenated())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT id, body, user_id, created_at, updated_at FROM chirps ORDER BY created_at {}",
                    order.as_sql()
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(Chirp::from).collect())
    }

    /// Delete a chirp, only if it belongs to the given user.
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM chirps WHERE id = ? AND user_id = ?")
            .bind(id.hyphenated())
            .bind(user_id.hyphenated())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
