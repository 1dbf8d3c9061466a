//! portfolio-api library
//!
//! Administrative backend for a portfolio website: contact-form submissions
//! plus project showcase entries with an uploaded thumbnail and an optional
//! gallery, stored in SQLite with the image files on disk beside it.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod services;
pub mod uploads;
pub mod validation;

pub use error::{Error, Result};

use uploads::FileStore;

/// Request body ceiling: one thumbnail plus ten gallery files at the 10 MiB
/// per-file limit, with room for the form overhead.
pub const MAX_REQUEST_BODY: usize = 115 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, built once at startup
    pub db: SqlitePool,
    /// Upload directory the image files live in
    pub files: FileStore,
    /// Absolute base for image URLs; falls back to the request Host header
    pub public_url: Option<String>,
}

impl AppState {
    pub fn new(db: SqlitePool, files: FileStore, public_url: Option<String>) -> Self {
        Self {
            db,
            files,
            public_url,
        }
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let uploads_dir = state.files.dir().to_path_buf();

    Router::new()
        .route("/", get(api::index))
        .merge(api::health::health_routes())
        .route(
            "/api/contacts",
            get(api::contacts::list_contacts).post(api::contacts::create_contact),
        )
        .route(
            "/api/contacts/:id",
            get(api::contacts::get_contact)
                .put(api::contacts::update_contact)
                .delete(api::contacts::delete_contact),
        )
        .route(
            "/api/projects",
            get(api::projects::list_projects).post(api::projects::create_project),
        )
        .route(
            "/api/projects/:id",
            get(api::projects::get_project)
                .put(api::projects::update_project)
                .delete(api::projects::delete_project),
        )
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .fallback(api::not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
