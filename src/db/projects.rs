//! Project read paths
//!
//! Queries only; every write to `projects` or `project_images` goes through
//! the reconciliation engine so rows and image files stay in lockstep.

use crate::db::models::{Project, ProjectWithImages};
use crate::error::Result;
use sqlx::SqlitePool;

/// All projects, newest-created first
pub async fn list(pool: &SqlitePool) -> Result<Vec<Project>> {
    let projects = sqlx::query_as::<_, Project>(
        "SELECT * FROM projects ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(projects)
}

/// Fetch one project row; absence is a sentinel, not an error
pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<Project>> {
    let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(project)
}

/// Gallery image paths of a project, in insertion order
pub async fn gallery_paths(pool: &SqlitePool, id: i64) -> Result<Vec<String>> {
    let paths = sqlx::query_scalar::<_, String>(
        "SELECT image_path FROM project_images WHERE project_id = ? ORDER BY id",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(paths)
}

/// Fetch one project together with its gallery paths
pub async fn get_with_images(pool: &SqlitePool, id: i64) -> Result<Option<ProjectWithImages>> {
    let Some(project) = get(pool, id).await? else {
        return Ok(None);
    };
    let images_paths = gallery_paths(pool, id).await?;

    Ok(Some(ProjectWithImages {
        project,
        images_paths,
    }))
}
