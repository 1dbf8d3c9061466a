//! Runtime configuration
//!
//! Every knob resolves from a command-line flag first and an environment
//! variable second, with a compiled default as the fallback.

use clap::Parser;
use std::path::PathBuf;

/// Portfolio admin backend configuration
#[derive(Debug, Clone, Parser)]
#[command(name = "portfolio-api", version, about = "Portfolio admin backend")]
pub struct Config {
    /// Port the HTTP server listens on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// SQLite database file (created on first run)
    #[arg(long, env = "DATABASE_PATH", default_value = "portfolio.db")]
    pub database_path: PathBuf,

    /// Directory uploaded images are written to and served from
    #[arg(long, env = "UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: PathBuf,

    /// Absolute base URL used when building image URLs, e.g.
    /// "https://portfolio.example.com". Falls back to the request Host header.
    #[arg(long, env = "PUBLIC_URL")]
    pub public_url: Option<String>,
}
