pub mod api;
pub mod auth;
pub mod cli;
pub mod db;
pub mod filter;
pub mod jwt;
pub mod metrics;
pub mod password;
pub mod session;

use api::{create_admin_router, create_api_router};
use axum::{Router, middleware};
use cli::Platform;
use db::Database;
use jwt::JwtConfig;
use metrics::{HitCounter, count_hits};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub struct ServerConfig {
    /// Database connection (cloneable, uses connection pool internally)
    pub db: Database,
    /// JWT secret for signing access tokens
    pub jwt_secret: Vec<u8>,
    /// Shared key the payment provider sends with webhooks
    pub polka_key: String,
    /// Deployment platform; only `Dev` allows the admin reset
    pub platform: Platform,
    /// Directory served under `/app`
    pub assets_dir: PathBuf,
    /// Counter for `/app` requests. Pass a clone to observe it from outside.
    pub hits: HitCounter,
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Router {
    let jwt = Arc::new(JwtConfig::new(&config.jwt_secret));

    let api_router = create_api_router(
        config.db.clone(),
        jwt,
        Arc::from(config.polka_key.as_str()),
    );

    let admin_router = create_admin_router(
        config.db.clone(),
        config.hits.clone(),
        config.platform,
    );

    let app_routes = Router::new()
        .nest_service("/app", ServeDir::new(&config.assets_dir))
        .layer(middleware::from_fn_with_state(
            config.hits.clone(),
            count_hits,
        ));

    Router::new()
        .nest("/api", api_router)
        .nest("/admin", admin_router)
        .merge(app_routes)
        .layer(TraceLayer::new_for_http())
}

/// Run the server on the given listener. This function blocks until the server exits.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config);
    let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, make_service).await
}
