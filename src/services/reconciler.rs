//! Project reconciliation engine
//!
//! Create, update and delete of a project span two tables and the upload
//! directory. The filesystem is not transactional, so each operation runs
//! as one database transaction plus compensating file actions: files are
//! staged before the transaction opens, and any failure before commit rolls
//! the rows back and discards exactly the files staged by that request.
//! After a commit, file deletion is best-effort cleanup only; a committed
//! row change is never reversed because a file could not be removed.

use crate::db::models::{ProjectFields, ProjectWithImages};
use crate::db::projects;
use crate::error::{Error, Result};
use crate::uploads::{FileStore, StagedFile};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

pub struct ProjectReconciler {
    db: SqlitePool,
    files: FileStore,
}

impl ProjectReconciler {
    pub fn new(db: SqlitePool, files: FileStore) -> Self {
        Self { db, files }
    }

    /// Create a project from staged uploads.
    ///
    /// The thumbnail is mandatory; without one the request is rejected and
    /// every file staged for it is discarded so nothing on disk outlives
    /// the rejected request.
    pub async fn create(
        &self,
        fields: ProjectFields,
        thumbnail: Option<StagedFile>,
        gallery: Vec<StagedFile>,
    ) -> Result<ProjectWithImages> {
        let Some(thumbnail) = thumbnail else {
            self.files.discard(&gallery).await;
            return Err(Error::InvalidInput("Project image is required".to_string()));
        };

        match self.insert_project(&fields, &thumbnail, &gallery).await {
            Ok(id) => {
                info!(project_id = id, gallery = gallery.len(), "created project");
                projects::get_with_images(&self.db, id)
                    .await?
                    .ok_or_else(|| Error::Internal(format!("project {id} vanished after insert")))
            }
            Err(err) => {
                self.files
                    .discard(&request_files(Some(&thumbnail), &gallery))
                    .await;
                Err(err)
            }
        }
    }

    async fn insert_project(
        &self,
        fields: &ProjectFields,
        thumbnail: &StagedFile,
        gallery: &[StagedFile],
    ) -> Result<i64> {
        let mut tx = self.db.begin().await?;

        let result = sqlx::query(
            "INSERT INTO projects (title, description, image_path) VALUES (?, ?, ?)",
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(self.files.public_path(thumbnail))
        .execute(&mut *tx)
        .await?;
        let id = result.last_insert_rowid();

        for file in gallery {
            sqlx::query("INSERT INTO project_images (project_id, image_path) VALUES (?, ?)")
                .bind(id)
                .bind(self.files.public_path(file))
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(id)
    }

    /// Merge three independent signals into one consistent end state: an
    /// optional replacement thumbnail, newly uploaded gallery files, and a
    /// client-declared list of which existing gallery paths survive.
    ///
    /// Each axis is a no-op when its input is absent: `new_thumbnail: None`
    /// leaves the thumbnail untouched, and `retained: None` leaves the
    /// gallery rows untouched. An explicit empty retained list removes every
    /// existing gallery image; that is the declared end state, not an
    /// accident.
    pub async fn update(
        &self,
        id: i64,
        fields: ProjectFields,
        new_thumbnail: Option<StagedFile>,
        new_gallery: Vec<StagedFile>,
        retained: Option<Vec<String>>,
    ) -> Result<ProjectWithImages> {
        let Some(existing) = projects::get(&self.db, id).await? else {
            // Files staged for this request have no owner to ever reference them
            self.files
                .discard(&request_files(new_thumbnail.as_ref(), &new_gallery))
                .await;
            return Err(Error::NotFound("Project not found".to_string()));
        };

        let applied = self
            .apply_update(
                id,
                &existing.image_path,
                &fields,
                new_thumbnail.as_ref(),
                &new_gallery,
                retained.as_deref(),
            )
            .await;

        match applied {
            Ok(()) => {
                info!(project_id = id, "updated project");
                projects::get_with_images(&self.db, id)
                    .await?
                    .ok_or_else(|| Error::Internal(format!("project {id} vanished during update")))
            }
            Err(err) => {
                // Roll back happened on drop of the transaction; discard only
                // the files staged by this request. Files committed by prior
                // requests keep their rows and stay on disk.
                self.files
                    .discard(&request_files(new_thumbnail.as_ref(), &new_gallery))
                    .await;
                Err(err)
            }
        }
    }

    async fn apply_update(
        &self,
        id: i64,
        current_thumbnail: &str,
        fields: &ProjectFields,
        new_thumbnail: Option<&StagedFile>,
        new_gallery: &[StagedFile],
        retained: Option<&[String]>,
    ) -> Result<()> {
        let mut tx = self.db.begin().await?;

        if let Some(thumbnail) = new_thumbnail {
            // Old file first, then the row; the new file is already staged
            self.files.remove_public(current_thumbnail).await?;
            sqlx::query("UPDATE projects SET image_path = ? WHERE id = ?")
                .bind(self.files.public_path(thumbnail))
                .bind(id)
                .execute(&mut *tx)
                .await?;
            debug!(project_id = id, "replaced thumbnail");
        }

        sqlx::query(
            "UPDATE projects SET title = ?, description = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if let Some(retained) = retained {
            let current: Vec<(i64, String)> = sqlx::query_as(
                "SELECT id, image_path FROM project_images WHERE project_id = ? ORDER BY id",
            )
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

            // Paths in the retained list that match no row are the client
            // declaring state that already holds; they are ignored.
            for (row_id, path) in current
                .iter()
                .filter(|(_, path)| !retained.contains(path))
            {
                sqlx::query("DELETE FROM project_images WHERE id = ?")
                    .bind(row_id)
                    .execute(&mut *tx)
                    .await?;
                self.files.remove_public(path).await?;
                debug!(project_id = id, path = %path, "removed gallery image");
            }
        }

        for file in new_gallery {
            sqlx::query("INSERT INTO project_images (project_id, image_path) VALUES (?, ?)")
                .bind(id)
                .bind(self.files.public_path(file))
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Delete a project, its gallery rows (store cascade) and its files.
    ///
    /// Returns `false` for an unknown id, matching the contact repository's
    /// read semantics. File removal after the committed row delete is
    /// best-effort: an orphaned file is recoverable, a resurrected row is
    /// not.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let Some(project) = projects::get(&self.db, id).await? else {
            return Ok(false);
        };
        let gallery = projects::gallery_paths(&self.db, id).await?;

        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            // Lost a race with a concurrent delete
            return Ok(false);
        }

        for path in std::iter::once(&project.image_path).chain(gallery.iter()) {
            if let Err(err) = self.files.remove_public(path).await {
                warn!(project_id = id, path = %path, error = %err, "failed to remove image file after project delete");
            }
        }

        info!(project_id = id, gallery = gallery.len(), "deleted project");
        Ok(true)
    }
}

/// Files staged by one request in staging order; `discard` walks them in
/// reverse.
fn request_files(thumbnail: Option<&StagedFile>, gallery: &[StagedFile]) -> Vec<StagedFile> {
    thumbnail
        .into_iter()
        .cloned()
        .chain(gallery.iter().cloned())
        .collect()
}
