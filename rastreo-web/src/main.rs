//! rastreo-web - package tracking search and admin service
//!
//! Serves the public package search page and the password-protected admin
//! panel over one SQLite-backed shipments table.

use anyhow::Result;
use clap::Parser;
use rastreo_common::auth::SessionSecret;
use rastreo_common::config::{ConfigOverrides, ServiceConfig};
use rastreo_common::db::init::init_database;
use rastreo_web::{build_router, AppState};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "rastreo-web", version, about = "Package tracking service")]
struct Cli {
    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Path to the SQLite database file
    #[arg(long)]
    database: Option<PathBuf>,

    /// Admin panel password
    #[arg(long)]
    admin_password: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting rastreo-web v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config = ServiceConfig::resolve(ConfigOverrides {
        host: cli.host,
        port: cli.port,
        database_path: cli.database,
        admin_password: cli.admin_password,
    })?;

    // Refuse to start without an admin secret; protected endpoints must never
    // fall back to an unauthenticated mode.
    let secret = match SessionSecret::new(config.admin_password.clone()) {
        Ok(secret) => secret,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };

    info!("Database path: {}", config.database_path.display());
    let pool = match init_database(&config.database_path).await {
        Ok(pool) => {
            info!("✓ Connected to database");
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    let state = AppState::new(pool, secret, config.session_max_age_secs);
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("rastreo-web listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
