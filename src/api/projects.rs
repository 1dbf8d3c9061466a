//! Project endpoints
//!
//! Create and update arrive as multipart forms: text fields `title` and
//! `description`, one optional `image` part (the thumbnail), up to ten
//! `images` parts (gallery files) and, on update, an `existing_images`
//! field holding a JSON array of the gallery paths the client wants kept.
//! Files are staged to the upload directory as the form is read; every
//! failure path from there on discards the files this request staged.

use axum::extract::{Host, Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::api::ApiResponse;
use crate::db::models::{Project, ProjectFields, ProjectWithImages};
use crate::db::projects;
use crate::error::{Error, Result};
use crate::services::ProjectReconciler;
use crate::uploads::{FileStore, StagedFile};
use crate::{validation, AppState};

/// Most gallery files accepted per request
pub const MAX_GALLERY_FILES: usize = 10;

/// Project row plus the absolute thumbnail URL, as returned by the list
#[derive(Debug, Serialize)]
pub struct ProjectResource {
    #[serde(flatten)]
    pub project: Project,
    pub image_url: String,
}

/// Full project payload: row, gallery paths and absolute URLs
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub images_paths: Vec<String>,
    pub image_url: String,
    pub images_urls: Vec<String>,
}

impl ProjectDetail {
    fn build(with_images: ProjectWithImages, base: &str) -> Self {
        let image_url = format!("{base}{}", with_images.project.image_path);
        let images_urls = with_images
            .images_paths
            .iter()
            .map(|path| format!("{base}{path}"))
            .collect();
        Self {
            project: with_images.project,
            images_paths: with_images.images_paths,
            image_url,
            images_urls,
        }
    }
}

/// Parsed multipart form with its files already staged
#[derive(Default)]
struct ProjectForm {
    title: Option<String>,
    description: Option<String>,
    retained: Option<Vec<String>>,
    thumbnail: Option<StagedFile>,
    gallery: Vec<StagedFile>,
}

impl ProjectForm {
    /// Everything this request staged, in staging order
    fn staged(&self) -> Vec<StagedFile> {
        self.thumbnail
            .iter()
            .cloned()
            .chain(self.gallery.iter().cloned())
            .collect()
    }

    fn fields(&self) -> ProjectFields {
        ProjectFields {
            title: self.title.as_deref().unwrap_or("").trim().to_string(),
            description: self
                .description
                .as_deref()
                .unwrap_or("")
                .trim()
                .to_string(),
        }
    }
}

fn bad_multipart(err: axum::extract::multipart::MultipartError) -> Error {
    Error::InvalidInput(format!("Invalid multipart payload: {err}"))
}

/// Read the form, staging file parts as they arrive. The caller owns the
/// partially filled form either way so it can discard staged files on error.
async fn read_project_form(
    files: &FileStore,
    multipart: &mut Multipart,
    form: &mut ProjectForm,
) -> Result<()> {
    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => form.title = Some(field.text().await.map_err(bad_multipart)?),
            "description" => form.description = Some(field.text().await.map_err(bad_multipart)?),
            "existing_images" => {
                let raw = field.text().await.map_err(bad_multipart)?;
                let trimmed = raw.trim();
                form.retained = Some(if trimmed.is_empty() {
                    Vec::new()
                } else {
                    serde_json::from_str(trimmed).map_err(|_| {
                        Error::InvalidInput(
                            "existing_images must be a JSON array of image paths".to_string(),
                        )
                    })?
                });
            }
            "image" => {
                if form.thumbnail.is_some() {
                    return Err(Error::InvalidInput(
                        "Only one thumbnail image is allowed".to_string(),
                    ));
                }
                let original = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(|ct| ct.to_string());
                let data = field.bytes().await.map_err(bad_multipart)?;
                form.thumbnail = Some(files.stage(&original, content_type.as_deref(), &data).await?);
            }
            "images" => {
                if form.gallery.len() >= MAX_GALLERY_FILES {
                    return Err(Error::InvalidInput(
                        "At most 10 gallery images are allowed".to_string(),
                    ));
                }
                let original = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(|ct| ct.to_string());
                let data = field.bytes().await.map_err(bad_multipart)?;
                form.gallery
                    .push(files.stage(&original, content_type.as_deref(), &data).await?);
            }
            // Unknown parts are ignored, matching the upload middleware contract
            _ => {}
        }
    }

    Ok(())
}

/// Stage and validate the form; on any failure the staged files are gone
/// before the error leaves this function.
async fn intake(files: &FileStore, multipart: &mut Multipart) -> Result<ProjectForm> {
    let mut form = ProjectForm::default();
    let read = read_project_form(files, multipart, &mut form).await;
    let validated = read.and_then(|()| validation::validate_project(&form.fields()));
    if let Err(err) = validated {
        files.discard(&form.staged()).await;
        return Err(err);
    }
    Ok(form)
}

fn url_base(state: &AppState, host: &str) -> String {
    state
        .public_url
        .clone()
        .unwrap_or_else(|| format!("http://{host}"))
}

/// POST /api/projects
pub async fn create_project(
    State(state): State<AppState>,
    Host(host): Host,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<ProjectDetail>>)> {
    let form = intake(&state.files, &mut multipart).await?;
    let fields = form.fields();

    let engine = ProjectReconciler::new(state.db.clone(), state.files.clone());
    let project = engine.create(fields, form.thumbnail, form.gallery).await?;

    let detail = ProjectDetail::build(project, &url_base(&state, &host));
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message_data(
            "Project created successfully",
            detail,
        )),
    ))
}

/// GET /api/projects
pub async fn list_projects(
    State(state): State<AppState>,
    Host(host): Host,
) -> Result<Json<ApiResponse<Vec<ProjectResource>>>> {
    let base = url_base(&state, &host);
    let resources = projects::list(&state.db)
        .await?
        .into_iter()
        .map(|project| {
            let image_url = format!("{base}{}", project.image_path);
            ProjectResource { project, image_url }
        })
        .collect();

    Ok(Json(ApiResponse::list(resources)))
}

/// GET /api/projects/:id
pub async fn get_project(
    State(state): State<AppState>,
    Host(host): Host,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ProjectDetail>>> {
    let with_images = projects::get_with_images(&state.db, id)
        .await?
        .ok_or_else(|| Error::NotFound("Project not found".to_string()))?;

    let detail = ProjectDetail::build(with_images, &url_base(&state, &host));
    Ok(Json(ApiResponse::data(detail)))
}

/// PUT /api/projects/:id
pub async fn update_project(
    State(state): State<AppState>,
    Host(host): Host,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<ProjectDetail>>> {
    let form = intake(&state.files, &mut multipart).await?;
    let fields = form.fields();

    let engine = ProjectReconciler::new(state.db.clone(), state.files.clone());
    let project = engine
        .update(id, fields, form.thumbnail, form.gallery, form.retained)
        .await?;

    let detail = ProjectDetail::build(project, &url_base(&state, &host));
    Ok(Json(ApiResponse::message_data(
        "Project updated successfully",
        detail,
    )))
}

/// DELETE /api/projects/:id
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    let engine = ProjectReconciler::new(state.db.clone(), state.files.clone());
    if !engine.delete(id).await? {
        return Err(Error::NotFound("Project not found".to_string()));
    }

    Ok(Json(ApiResponse::message("Project deleted successfully")))
}
