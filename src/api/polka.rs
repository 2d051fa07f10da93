//! Payment provider webhook.
//!
//! - POST `/webhooks` - Upgrade notifications, authenticated with `Authorization: ApiKey`

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

use super::error::{ApiError, ApiJson, ResultExt, parse_uuid};
use crate::auth::{HasServiceKey, ServiceAuth};
use crate::db::Database;

/// The only event this service acts on.
pub const USER_UPGRADED_EVENT: &str = "user.upgraded";

#[derive(Clone)]
pub struct PolkaState {
    pub db: Database,
    pub api_key: Arc<str>,
}

impl HasServiceKey for PolkaState {
    fn api_key(&self) -> &str {
        &self.api_key
    }
}

pub fn router(state: PolkaState) -> Router {
    Router::new()
        .route("/webhooks", post(handle_webhook))
        .with_state(state)
}

#[derive(Deserialize)]
struct WebhookRequest {
    event: String,
    #[serde(default)]
    data: Option<WebhookData>,
}

#[derive(Deserialize)]
struct WebhookData {
    #[serde(default)]
    user_id: String,
}

async fn handle_webhook(
    State(state): State<PolkaState>,
    _service: ServiceAuth,
    ApiJson(payload): ApiJson<WebhookRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.event != USER_UPGRADED_EVENT {
        debug!(event = %payload.event, "Ignoring webhook event");
        return Ok(StatusCode::NO_CONTENT);
    }

    let data = payload
        .data
        .ok_or_else(|| ApiError::bad_request("Missing event data"))?;
    let user_id = parse_uuid(&data.user_id, "user ID")?;

    let upgraded = state
        .db
        .users()
        .upgrade(user_id)
        .await
        .db_err("Failed to upgrade user")?;

    if !upgraded {
        return Err(ApiError::not_found("User not found"));
    }

    info!(user_id = %user_id, "User upgraded");

    Ok(StatusCode::NO_CONTENT)
}
