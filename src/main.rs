use chirpy::cli::{
    Args, build_config, init_logging, load_jwt_secret, open_database, validate_polka_key,
};
use chirpy::run_server;
use clap::Parser;
use tracing::{error, info};

/// Everything that touches the process environment happens here, before the
/// runtime spawns its worker threads.
fn main() {
    // A missing .env file is fine; real environment variables still apply.
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_logging(&args.log_format);

    let Some(jwt_secret) = load_jwt_secret(args.jwt_secret_file.as_deref()) else {
        std::process::exit(1);
    };

    let Some(polka_key) = validate_polka_key(args.polka_key.clone()) else {
        std::process::exit(1);
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            error!(error = %e, "Failed to build tokio runtime");
            std::process::exit(1);
        });

    if let Err(e) = runtime.block_on(serve(args, jwt_secret, polka_key)) {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

async fn serve(args: Args, jwt_secret: String, polka_key: String) -> std::io::Result<()> {
    let Some(db) = open_database(&args.database).await else {
        std::process::exit(1);
    };

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        error!(address = %addr, error = %e, "Failed to bind");
        e
    })?;
    let local_addr = listener.local_addr()?;

    let config = build_config(db, jwt_secret, polka_key, args.platform, args.assets_dir);

    info!(address = %local_addr, platform = ?config.platform, "Listening");

    run_server(config, listener).await
}
