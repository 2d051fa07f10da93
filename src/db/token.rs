//! Refresh token storage, lookup and revocation.
//!
//! Refresh tokens are opaque random strings. Only they are stored in the
//! database; access tokens are stateless and short-lived (1 hour).
//! Rows are never deleted on revoke, they are stamped with `revoked_at`.

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sqlx::sqlite::SqlitePool;
use uuid::{Uuid, fmt::Hyphenated};

/// Refresh token duration: 60 days
pub const REFRESH_TOKEN_DURATION_DAYS: i64 = 60;

/// Number of random bytes in a refresh token (hex-encoded to twice as many characters).
const REFRESH_TOKEN_BYTES: usize = 32;

/// Generate a new opaque refresh token: 32 random bytes, hex-encoded.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// A persisted refresh token record.
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    /// A token is usable iff it was never revoked and has not yet expired.
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && now < self.expires_at
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(sqlx::FromRow)]
struct RefreshTokenRow {
    token: String,
    user_id: Hyphenated,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    revoked_at: Option<DateTime<Utc>>,
}

impl From<RefreshTokenRow> for RefreshToken {
    fn from(row: RefreshTokenRow) -> Self {
        Self {
            token: row.token,
            user_id: row.user_id.into_uuid(),
            created_at: row.created_at,
            updated_at: row.updated_at,
            expires_at: row.expires_at,
            revoked_at: row.revoked_at,
        }
    }
}

/// Store for managing refresh tokens.
pub struct RefreshTokenStore {
    pool: SqlitePool,
}

impl RefreshTokenStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Generate and persist a new refresh token for a user, valid for 60 days.
    pub async fn issue(&self, user_id: Uuid) -> Result<RefreshToken, sqlx::Error> {
        let expires_at = Utc::now() + Duration::days(REFRESH_TOKEN_DURATION_DAYS);
        self.create(user_id, &generate_refresh_token(), expires_at)
            .await
    }

    /// Persist a refresh token with an explicit expiry.
    pub async fn create(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshToken, sqlx::Error> {
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO refresh_tokens (token, user_id, created_at, updated_at, expires_at, revoked_at) VALUES (?, ?, ?, ?, ?, NULL)",
        )
        .bind(token)
        .bind(user_id.hyphenated())
        .bind(now)
        .bind(now)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(RefreshToken {
            token: token.to_string(),
            user_id,
            created_at: now,
            updated_at: now,
            expires_at,
            revoked_at: None,
        })
    }

    /// Look up a refresh token by exact value.
    pub async fn get(&self, token: &str) -> Result<Option<RefreshToken>, sqlx::Error> {
        let row: Option<RefreshTokenRow> = sqlx::query_as(
            "SELECT token, user_id, created_at, updated_at, expires_at, revoked_at FROM refresh_tokens WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RefreshToken::from))
    }

    /// Revoke a refresh token. Returns true if this call revoked it, false if
    /// it was unknown or already revoked.
    pub async fn revoke(&self, token: &str) -> Result<bool, sqlx::Error> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = ?, updated_at = ? WHERE token = ? AND revoked_at IS NULL",
        )
        .bind(now)
        .bind(now)
        .bind(token)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List all refresh tokens for a user, newest first.
    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, sqlx::Error> {
        let rows: Vec<RefreshTokenRow> = sqlx::query_as(
            "SELECT token, user_id, created_at, updated_at, expires_at, revoked_at FROM refresh_tokens WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id.hyphenated())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RefreshToken::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, is_unique_violation};

    async fn setup() -> (Database, Uuid) {
        let db = Database::open(":memory:").await.unwrap();
        let user = db.users().create("alice@example.com", "hash").await.unwrap();
        (db, user.id)
    }

    #[test]
    fn test_generated_token_is_64_hex_chars() {
        let token = generate_refresh_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generated_tokens_are_unique() {
        assert_ne!(generate_refresh_token(), generate_refresh_token());
    }

    #[tokio::test]
    async fn test_issue_and_get() {
        let (db, user_id) = setup().await;

        let issued = db.refresh_tokens().issue(user_id).await.unwrap();
        assert_eq!(issued.token.len(), 64);

        let found = db.refresh_tokens().get(&issued.token).await.unwrap().unwrap();
        assert_eq!(found.user_id, user_id);
        assert!(found.revoked_at.is_none());
        assert!(found.is_usable(Utc::now()));

        let lifetime = found.expires_at - found.created_at;
        assert!(lifetime >= Duration::days(60) - Duration::seconds(1));
        assert!(lifetime <= Duration::days(60) + Duration::seconds(1));
    }

    #[tokio::test]
    async fn test_get_unknown_token() {
        let (db, _) = setup().await;
        assert!(db.refresh_tokens().get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_revoke() {
        let (db, user_id) = setup().await;
        let issued = db.refresh_tokens().issue(user_id).await.unwrap();

        assert!(db.refresh_tokens().revoke(&issued.token).await.unwrap());

        let found = db.refresh_tokens().get(&issued.token).await.unwrap().unwrap();
        assert!(found.is_revoked());
        assert!(!found.is_usable(Utc::now()));
    }

    #[tokio::test]
    async fn test_second_revoke_is_noop() {
        let (db, user_id) = setup().await;
        let issued = db.refresh_tokens().issue(user_id).await.unwrap();

        assert!(db.refresh_tokens().revoke(&issued.token).await.unwrap());
        let first = db.refresh_tokens().get(&issued.token).await.unwrap().unwrap();

        assert!(!db.refresh_tokens().revoke(&issued.token).await.unwrap());
        let second = db.refresh_tokens().get(&issued.token).await.unwrap().unwrap();

        assert_eq!(first.revoked_at, second.revoked_at);
    }

    #[tokio::test]
    async fn test_revoke_unknown_token() {
        let (db, _) = setup().await;
        assert!(!db.refresh_tokens().revoke("unknown").await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_token_not_usable() {
        let (db, user_id) = setup().await;
        let token = generate_refresh_token();
        db.refresh_tokens()
            .create(user_id, &token, Utc::now() - Duration::seconds(1))
            .await
            .unwrap();

        let found = db.refresh_tokens().get(&token).await.unwrap().unwrap();
        assert!(found.is_expired(Utc::now()));
        assert!(!found.is_usable(Utc::now()));
    }

    #[tokio::test]
    async fn test_multiple_tokens_per_user() {
        let (db, user_id) = setup().await;

        db.refresh_tokens().issue(user_id).await.unwrap();
        db.refresh_tokens().issue(user_id).await.unwrap();

        let tokens = db.refresh_tokens().list_by_user(user_id).await.unwrap();
        assert_eq!(tokens.len(), 2);
        assert!(tokens.iter().all(|t| t.is_usable(Utc::now())));
    }

    #[tokio::test]
    async fn test_duplicate_token_rejected() {
        let (db, user_id) = setup().await;
        let token = generate_refresh_token();
        let expires = Utc::now() + Duration::days(1);

        db.refresh_tokens()
            .create(user_id, &token, expires)
            .await
            .unwrap();
        let err = db
            .refresh_tokens()
            .create(user_id, &token, expires)
            .await
            .unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[tokio::test]
    async fn test_token_for_unknown_user_rejected() {
        let (db, _) = setup().await;
        let result = db.refresh_tokens().issue(Uuid::new_v4()).await;
        assert!(result.is_err());
    }
}
