//! Session endpoints.
//!
//! - POST `/login` - Exchange email and password for an access and refresh token
//! - POST `/refresh` - Exchange a refresh token for a new access token
//! - POST `/revoke` - Revoke a refresh token

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::Serialize;
use std::sync::Arc;

use super::error::{ApiError, ApiJson};
use super::users::{CredentialsRequest, UserResponse};
use crate::auth::BearerToken;
use crate::db::Database;
use crate::jwt::JwtConfig;
use crate::session;

#[derive(Clone)]
pub struct TokensState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
}

pub fn router(state: TokensState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/revoke", post(revoke))
        .with_state(state)
}

#[derive(Serialize)]
struct LoginResponse {
    #[serde(flatten)]
    user: UserResponse,
    token: String,
    refresh_token: String,
}

#[derive(Serialize)]
struct RefreshResponse {
    token: String,
}

async fn login(
    State(state): State<TokensState>,
    ApiJson(payload): ApiJson<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let outcome = session::login(&state.db, &state.jwt, &payload.email, &payload.password).await?;

    Ok(Json(LoginResponse {
        user: outcome.user.into(),
        token: outcome.access_token,
        refresh_token: outcome.refresh_token.token,
    }))
}

/// The refresh token travels in `Authorization: Bearer`. It is not rotated.
async fn refresh(
    State(state): State<TokensState>,
    BearerToken(refresh_token): BearerToken,
) -> Result<impl IntoResponse, ApiError> {
    let token = session::refresh(&state.db, &state.jwt, &refresh_token).await?;
    Ok(Json(RefreshResponse { token }))
}

/// Always 204 once a credential is present, whether or not the token exists.
async fn revoke(
    State(state): State<TokensState>,
    BearerToken(refresh_token): BearerToken,
) -> Result<impl IntoResponse, ApiError> {
    session::revoke(&state.db, &refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}
