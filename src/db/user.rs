use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePool;
use uuid::{Uuid, fmt::Hyphenated};

#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

/// A registered account.
#[derive(Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub hashed_password: String,
    pub is_chirpy_red: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Hand-written so the password hash never ends up in logs.
impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("hashed_password", &"<redacted>")
            .field("is_chirpy_red", &self.is_chirpy_red)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Hyphenated,
    email: String,
    hashed_password: String,
    is_chirpy_red: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id.into_uuid(),
            email: row.email,
            hashed_password: row.hashed_password,
            is_chirpy_red: row.is_chirpy_red,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_USER: &str =
    "SELECT id, email, hashed_password, is_chirpy_red, created_at, updated_at FROM users";

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user with an already-hashed password.
    pub async fn create(&self, email: &str, hashed_password: &str) -> Result<User, sqlx::Error> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            is_chirpy_red: false,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO users (id, email, hashed_password, is_chirpy_red, created_at, updated_at) VALUES (?, ?, ?, 0, ?, ?)",
        )
        .bind(user.id.hyphenated())
        .bind(&user.email)
        .bind(&user.hashed_password)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user by email (exact, case-sensitive match).
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{SELECT_USER} WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{SELECT_USER} WHERE id = ?"))
            .bind(id.hyphenated())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    /// Replace a user's email and password hash. Returns the updated user,
    /// or `None` if the user no longer exists.
    pub async fn update_credentials(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET email = ?, hashed_password = ?, updated_at = ? WHERE id = ?",
        )
        .bind(email)
        .bind(hashed_password)
        .bind(Utc::now())
        .bind(id.hyphenated())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    /// Mark a user as upgraded. Returns false if the user does not exist.
    pub async fn upgrade(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET is_chirpy_red = 1, updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id.hyphenated())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every user. Chirps and refresh tokens go with them.
    pub async fn delete_all(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
