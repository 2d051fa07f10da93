//! CLI argument parsing, validation, and startup helpers.

use crate::ServerConfig;
use crate::db::Database;
use crate::metrics::HitCounter;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

/// Deployment platform. Destructive admin endpoints only exist on `Dev`.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Platform {
    Dev,
    #[default]
    Prod,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "Chirpy", about = "Short message posting service")]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "8080")]
    pub port: u16,

    /// Path to SQLite database file
    #[arg(short, long, env = "DATABASE", default_value = "chirpy.db")]
    pub database: String,

    /// Path to file containing JWT secret. Prefer using JWT_SECRET env var instead
    #[arg(long)]
    pub jwt_secret_file: Option<String>,

    /// API key the payment provider sends with webhooks
    #[arg(long, env = "POLKA_KEY", hide_env_values = true)]
    pub polka_key: String,

    /// Deployment platform; `dev` enables POST /admin/reset
    #[arg(long, env = "PLATFORM", default_value = "prod")]
    pub platform: Platform,

    /// Directory served under /app
    #[arg(long, env = "ASSETS_DIR", default_value = ".")]
    pub assets_dir: PathBuf,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Load JWT secret from environment variable or file.
/// Returns None and logs an error if the secret cannot be loaded.
pub fn load_jwt_secret(jwt_secret_file: Option<&str>) -> Option<String> {
    let secret = if let Some(secret) = take_env_var("JWT_SECRET") {
        secret
    } else if let Some(path) = jwt_secret_file {
        match std::fs::read_to_string(path) {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read JWT secret file");
                return None;
            }
        }
    } else {
        error!(
            "JWT secret is required. Set JWT_SECRET environment variable (recommended) or use --jwt-secret-file"
        );
        return None;
    };

    check_secret_length(secret)
}

/// Read an environment variable and remove it so child processes and later
/// readers cannot see it.
///
/// Must be called before any other thread exists. `main` calls it before the
/// tokio runtime is built.
fn take_env_var(name: &str) -> Option<String> {
    let value = std::env::var(name).ok()?;
    // SAFETY: no other threads are running yet, so nothing reads or writes the
    // environment concurrently.
    unsafe { std::env::remove_var(name) };
    Some(value)
}

fn check_secret_length(secret: String) -> Option<String> {
    if secret.len() < MIN_JWT_SECRET_LENGTH {
        error!(
            "JWT secret is shorter than {} characters. Use a longer secret",
            MIN_JWT_SECRET_LENGTH
        );
        return None;
    }
    Some(secret)
}

/// Validate the webhook API key. Returns None and logs an error if it is empty.
pub fn validate_polka_key(key: String) -> Option<String> {
    if key.trim().is_empty() {
        error!("POLKA_KEY must not be empty");
        return None;
    }
    Some(key)
}

/// Build ServerConfig from validated arguments.
pub fn build_config(
    db: Database,
    jwt_secret: String,
    polka_key: String,
    platform: Platform,
    assets_dir: PathBuf,
) -> ServerConfig {
    ServerConfig {
        db,
        jwt_secret: jwt_secret.into_bytes(),
        polka_key,
        platform,
        assets_dir,
        hits: HitCounter::new(),
    }
}

/// Open the database, logging errors if it fails.
pub async fn open_database(path: &str) -> Option<Database> {
    match Database::open(path).await {
        Ok(db) => {
            info!(path = %path, "Database opened");
            Some(db)
        }
        Err(e) => {
            error!(path = %path, error = %e, "Failed to open database");
            None
        }
    }
}
