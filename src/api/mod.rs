mod admin;
mod chirps;
mod error;
mod polka;
mod tokens;
mod users;

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::cli::Platform;
use crate::db::Database;
use crate::jwt::JwtConfig;
use crate::metrics::HitCounter;

pub use admin::AdminState;
pub use error::{ApiError, ApiJson};
pub use polka::USER_UPGRADED_EVENT;

/// Create the API router, mounted at `/api`.
pub fn create_api_router(db: Database, jwt: Arc<JwtConfig>, polka_key: Arc<str>) -> Router {
    let users_state = users::UsersState {
        db: db.clone(),
        jwt: jwt.clone(),
    };

    let chirps_state = chirps::ChirpsState {
        db: db.clone(),
        jwt: jwt.clone(),
    };

    let polka_state = polka::PolkaState {
        db: db.clone(),
        api_key: polka_key,
    };

    let tokens_state = tokens::TokensState { db, jwt };

    Router::new()
        .route("/healthz", get(healthz))
        .nest("/users", users::router(users_state))
        .nest("/chirps", chirps::router(chirps_state))
        .nest("/polka", polka::router(polka_state))
        .merge(tokens::router(tokens_state))
}

/// Create the admin router, mounted at `/admin`.
pub fn create_admin_router(db: Database, hits: HitCounter, platform: Platform) -> Router {
    admin::router(AdminState { db, hits, platform })
}

async fn healthz() -> &'static str {
    "OK"
}
