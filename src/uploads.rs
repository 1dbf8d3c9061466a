//! Upload staging and storage
//!
//! Incoming multipart files are written to the upload directory under a
//! generated name before any database work starts. A staged file has no
//! owning row yet; whoever staged it is responsible for discarding it if
//! the request fails before a row references it.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

/// Accepted image extensions and `image/*` subtypes
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["jpeg", "jpg", "png", "gif", "webp"];

/// Per-file size ceiling (10 MiB)
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// URL prefix stored image paths are rooted at
pub const PUBLIC_PREFIX: &str = "/uploads";

/// A file already written to storage whose owning row is not yet established
#[derive(Debug, Clone)]
pub struct StagedFile {
    /// Generated on-disk name, `{uuid}.{ext}`
    pub filename: String,
    /// Client-supplied name, kept for diagnostics only
    pub original_name: String,
    /// Size in bytes as written
    pub size: u64,
}

/// Filesystem half of the image store. Cheap to clone; handlers and the
/// reconciliation engine share one upload directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    upload_dir: PathBuf,
}

impl FileStore {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Create the upload directory if it does not exist yet
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;
        Ok(())
    }

    /// Validate and write one uploaded file under a collision-resistant
    /// generated name, preserving the original extension.
    ///
    /// Identical payloads staged twice produce two distinct files; this is
    /// not a deduplicating store.
    pub async fn stage(
        &self,
        original_name: &str,
        content_type: Option<&str>,
        data: &[u8],
    ) -> Result<StagedFile> {
        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .filter(|e| ALLOWED_IMAGE_TYPES.contains(&e.as_str()))
            .ok_or_else(|| {
                Error::InvalidInput(
                    "Only image files are allowed (jpeg, jpg, png, gif, webp)".to_string(),
                )
            })?;

        if let Some(content_type) = content_type {
            let subtype = content_type.strip_prefix("image/");
            if !subtype.is_some_and(|s| ALLOWED_IMAGE_TYPES.contains(&s)) {
                return Err(Error::InvalidInput(
                    "Only image files are allowed (jpeg, jpg, png, gif, webp)".to_string(),
                ));
            }
        }

        if data.len() > MAX_FILE_SIZE {
            return Err(Error::InvalidInput(
                "File is too large. Maximum size is 10MB".to_string(),
            ));
        }

        let filename = format!("{}.{ext}", Uuid::new_v4());
        tokio::fs::write(self.upload_dir.join(&filename), data).await?;

        Ok(StagedFile {
            filename,
            original_name: original_name.to_string(),
            size: data.len() as u64,
        })
    }

    /// Storage-relative path a staged file is served under
    pub fn public_path(&self, file: &StagedFile) -> String {
        format!("{PUBLIC_PREFIX}/{}", file.filename)
    }

    /// Delete the backing file of a stored `/uploads/...` path.
    ///
    /// A missing file is not an error; a path outside the public prefix is
    /// refused rather than resolved.
    pub async fn remove_public(&self, public_path: &str) -> Result<()> {
        let filename = public_path
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| {
                !name.is_empty() && !name.contains(['/', '\\']) && *name != "." && *name != ".."
            })
            .ok_or_else(|| {
                Error::Internal(format!("refusing to remove non-upload path: {public_path}"))
            })?;

        match tokio::fs::remove_file(self.upload_dir.join(filename)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Best-effort compensation sweep over files staged by one request, in
    /// reverse staging order. Failures are logged, never surfaced; the error
    /// that triggered the sweep is the one the caller reports.
    pub async fn discard(&self, staged: &[StagedFile]) {
        for file in staged.iter().rev() {
            match tokio::fs::remove_file(self.upload_dir.join(&file.filename)).await {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => {
                    warn!(filename = %file.filename, error = %err, "failed to discard staged upload");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn store() -> (TempDir, FileStore) {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().join("uploads"));
        store.ensure_dir().await.unwrap();
        (tmp, store)
    }

    #[tokio::test]
    async fn stages_file_preserving_extension() {
        let (_tmp, store) = store().await;

        let staged = store
            .stage("photo.PNG", Some("image/png"), b"fake png bytes")
            .await
            .unwrap();

        assert!(staged.filename.ends_with(".png"));
        assert_eq!(staged.original_name, "photo.PNG");
        assert_eq!(staged.size, 14);
        assert!(store.dir().join(&staged.filename).exists());
        assert_eq!(
            store.public_path(&staged),
            format!("/uploads/{}", staged.filename)
        );
    }

    #[tokio::test]
    async fn identical_payloads_get_distinct_names() {
        let (_tmp, store) = store().await;

        let a = store.stage("a.png", None, b"same bytes").await.unwrap();
        let b = store.stage("a.png", None, b"same bytes").await.unwrap();

        assert_ne!(a.filename, b.filename);
        assert!(store.dir().join(&a.filename).exists());
        assert!(store.dir().join(&b.filename).exists());
    }

    #[tokio::test]
    async fn rejects_disallowed_extension() {
        let (_tmp, store) = store().await;

        let err = store.stage("script.svg", None, b"<svg/>").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = store.stage("no-extension", None, b"data").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn rejects_mismatched_content_type() {
        let (_tmp, store) = store().await;

        let err = store
            .stage("photo.png", Some("application/octet-stream"), b"data")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn rejects_oversize_payload() {
        let (_tmp, store) = store().await;

        let big = vec![0u8; MAX_FILE_SIZE + 1];
        let err = store.stage("big.jpg", None, &big).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        // Nothing must be written for a rejected file
        assert_eq!(std::fs::read_dir(store.dir()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn remove_public_deletes_and_tolerates_missing() {
        let (_tmp, store) = store().await;

        let staged = store.stage("a.png", None, b"bytes").await.unwrap();
        let path = store.public_path(&staged);

        store.remove_public(&path).await.unwrap();
        assert!(!store.dir().join(&staged.filename).exists());

        // Second removal of the same path is a no-op
        store.remove_public(&path).await.unwrap();
    }

    #[tokio::test]
    async fn remove_public_refuses_traversal() {
        let (_tmp, store) = store().await;

        for path in [
            "/etc/passwd",
            "/uploads/../secret.png",
            "/uploads/a/b.png",
            "/uploads/",
        ] {
            assert!(store.remove_public(path).await.is_err(), "{path}");
        }
    }

    #[tokio::test]
    async fn discard_removes_staged_files() {
        let (_tmp, store) = store().await;

        let a = store.stage("a.png", None, b"a").await.unwrap();
        let b = store.stage("b.png", None, b"b").await.unwrap();

        store.discard(&[a.clone(), b.clone()]).await;

        assert!(!store.dir().join(&a.filename).exists());
        assert!(!store.dir().join(&b.filename).exists());
    }
}
