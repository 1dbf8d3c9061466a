//! portfolio-api - Portfolio admin backend
//!
//! Stores contact-form submissions and project showcase entries in SQLite
//! and serves uploaded images back from the upload directory.

use anyhow::Result;
use clap::Parser;
use portfolio_api::config::Config;
use portfolio_api::uploads::FileStore;
use portfolio_api::{build_router, db, AppState};
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting portfolio-api v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::parse();

    let files = FileStore::new(&config.upload_dir);
    files.ensure_dir().await?;
    info!("Upload directory: {}", config.upload_dir.display());

    let pool = db::init_database(&config.database_path).await?;

    let state = AppState::new(pool, files, config.public_url.clone());
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("portfolio-api listening on http://{addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
