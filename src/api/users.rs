//! Account endpoints.
//!
//! - POST `/` - Register with email and password
//! - PUT `/` - Change own email and password (access token required)

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use super::error::{ApiError, ApiJson};
use crate::auth::ApiAuth;
use crate::db::{Database, User, is_unique_violation};
use crate::impl_has_auth_state;
use crate::jwt::JwtConfig;
use crate::password::hash_password;

#[derive(Clone)]
pub struct UsersState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
}

impl_has_auth_state!(UsersState);

pub fn router(state: UsersState) -> Router {
    Router::new()
        .route("/", post(create_user).put(update_user))
        .with_state(state)
}

#[derive(Deserialize)]
pub(super) struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl CredentialsRequest {
    pub(super) fn validate(&self) -> Result<(), ApiError> {
        if self.email.is_empty() {
            return Err(ApiError::bad_request("Email is required"));
        }
        if self.password.is_empty() {
            return Err(ApiError::bad_request("Password is required"));
        }
        Ok(())
    }
}

/// Public view of an account. Never carries the password hash.
#[derive(Serialize)]
pub(super) struct UserResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub is_upgraded: bool,
    /// Same flag under the payment provider's plan name.
    pub is_chirpy_red: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at,
            updated_at: user.updated_at,
            email: user.email,
            is_upgraded: user.is_chirpy_red,
            is_chirpy_red: user.is_chirpy_red,
        }
    }
}

fn hash(password: &str) -> Result<String, ApiError> {
    hash_password(password).map_err(|e| {
        error!("Failed to hash password: {}", e);
        ApiError::internal("Internal server error")
    })
}

async fn create_user(
    State(state): State<UsersState>,
    ApiJson(payload): ApiJson<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    let hashed = hash(&payload.password)?;

    let user = match state.db.users().create(&payload.email, &hashed).await {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::conflict("Email is already registered"));
        }
        Err(e) => return Err(ApiError::db_error("Failed to create user", e)),
    };

    info!(user_id = %user.id, "User created");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

async fn update_user(
    State(state): State<UsersState>,
    ApiAuth(auth): ApiAuth,
    ApiJson(payload): ApiJson<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    let hashed = hash(&payload.password)?;

    let updated = match state
        .db
        .users()
        .update_credentials(auth.user_id, &payload.email, &hashed)
        .await
    {
        Ok(updated) => updated,
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::conflict("Email is already registered"));
        }
        Err(e) => return Err(ApiError::db_error("Failed to update user", e)),
    };

    // The token outlived its account.
    let user = updated.ok_or_else(|| ApiError::unauthorized("unauthorized"))?;

    info!(user_id = %user.id, "User credentials updated");

    Ok(Json(UserResponse::from(user)))
}
