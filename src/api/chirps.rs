//! Chirp endpoints.
//!
//! - POST `/` - Post a chirp as the authenticated user
//! - GET `/` - List chirps, optionally `?author_id=` and `?sort=asc|desc`
//! - GET `/{chirp_id}` - Get one chirp
//! - DELETE `/{chirp_id}` - Delete own chirp

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::error::{ApiError, ApiJson, ResultExt, parse_uuid};
use crate::auth::ApiAuth;
use crate::db::{Chirp, Database, SortOrder};
use crate::filter::validate_chirp;
use crate::impl_has_auth_state;
use crate::jwt::JwtConfig;
use crate::session;

#[derive(Clone)]
pub struct ChirpsState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
}

impl_has_auth_state!(ChirpsState);

pub fn router(state: ChirpsState) -> Router {
    Router::new()
        .route("/", post(create_chirp).get(list_chirps))
        .route("/{chirp_id}", get(get_chirp).delete(delete_chirp))
        .with_state(state)
}

#[derive(Deserialize)]
struct CreateChirpRequest {
    #[serde(default)]
    body: String,
}

#[derive(Deserialize)]
struct ListChirpsQuery {
    author_id: Option<String>,
    sort: Option<String>,
}

#[derive(Serialize)]
struct ChirpResponse {
    id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    body: String,
    user_id: Uuid,
}

impl From<Chirp> for ChirpResponse {
    fn from(chirp: Chirp) -> Self {
        Self {
            id: chirp.id,
            created_at: chirp.created_at,
            updated_at: chirp.updated_at,
            body: chirp.body,
            user_id: chirp.user_id,
        }
    }
}

/// The author always comes from the access token.
async fn create_chirp(
    State(state): State<ChirpsState>,
    ApiAuth(auth): ApiAuth,
    ApiJson(payload): ApiJson<CreateChirpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let body = validate_chirp(&payload.body)?;

    let chirp = state
        .db
        .chirps()
        .create(auth.user_id, &body)
        .await
        .db_err("Failed to create chirp")?;

    info!(user_id = %auth.user_id, chirp_id = %chirp.id, "Chirp created");

    Ok((StatusCode::CREATED, Json(ChirpResponse::from(chirp))))
}

async fn list_chirps(
    State(state): State<ChirpsState>,
    Query(query): Query<ListChirpsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let author = match query.author_id.as_deref() {
        None | Some("") => None,
        Some(id) => Some(parse_uuid(id, "author ID")?),
    };

    // Anything but "desc" sorts oldest first.
    let order = match query.sort.as_deref() {
        Some("desc") => SortOrder::Desc,
        _ => SortOrder::Asc,
    };

    let chirps = state
        .db
        .chirps()
        .list(author, order)
        .await
        .db_err("Failed to list chirps")?;

    Ok(Json(
        chirps
            .into_iter()
            .map(ChirpResponse::from)
            .collect::<Vec<_>>(),
    ))
}

async fn get_chirp(
    State(state): State<ChirpsState>,
    Path(chirp_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_uuid(&chirp_id, "chirp ID")?;

    let chirp = state
        .db
        .chirps()
        .get(id)
        .await
        .db_err("Failed to get chirp")?
        .ok_or_else(|| ApiError::not_found("Chirp not found"))?;

    Ok(Json(ChirpResponse::from(chirp)))
}

async fn delete_chirp(
    State(state): State<ChirpsState>,
    ApiAuth(auth): ApiAuth,
    Path(chirp_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_uuid(&chirp_id, "chirp ID")?;

    session::delete_chirp(&state.db, auth.user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
