//! Admin endpoints.
//!
//! - GET `/metrics` - HTML page with the `/app` hit count
//! - POST `/reset` - Reset the hit count and delete all users (dev platform only)

use axum::{
    Router,
    extract::State,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use tracing::{info, warn};

use super::error::{ApiError, ResultExt};
use crate::cli::Platform;
use crate::db::Database;
use crate::metrics::HitCounter;

/// State for admin endpoints.
#[derive(Clone)]
pub struct AdminState {
    pub db: Database,
    pub hits: HitCounter,
    pub platform: Platform,
}

pub fn router(state: AdminState) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .route("/reset", post(reset))
        .with_state(state)
}

async fn metrics(State(state): State<AdminState>) -> impl IntoResponse {
    Html(format!(
        "<html>\n  <body>\n    <h1>Welcome, Chirpy Admin</h1>\n    <p>Chirpy has been visited {} times!</p>\n  </body>\n</html>\n",
        state.hits.get()
    ))
}

async fn reset(State(state): State<AdminState>) -> Result<impl IntoResponse, ApiError> {
    if state.platform != Platform::Dev {
        warn!("Reset attempted outside the dev platform");
        return Err(ApiError::forbidden("Reset is only allowed in dev environment"));
    }

    state.hits.reset();
    let deleted = state
        .db
        .users()
        .delete_all()
        .await
        .db_err("Failed to delete users")?;

    info!(deleted, "Hits and users reset");

    Ok("Hits reset to 0 and database reset to initial state.")
}
