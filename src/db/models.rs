//! Database models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub company: Option<String>,
    pub email: String,
    pub phone_number: String,
    pub message: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Mutable contact fields as accepted from the client, already trimmed
#[derive(Debug, Clone)]
pub struct ContactFields {
    pub name: String,
    pub company: Option<String>,
    pub email: String,
    pub phone_number: String,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Storage-relative thumbnail path, e.g. `/uploads/{uuid}.png`
    pub image_path: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Mutable project fields as accepted from the client, already trimmed
#[derive(Debug, Clone)]
pub struct ProjectFields {
    pub title: String,
    pub description: String,
}

/// A project together with its gallery image paths, in insertion order
#[derive(Debug, Clone, Serialize)]
pub struct ProjectWithImages {
    #[serde(flatten)]
    pub project: Project,
    pub images_paths: Vec<String>,
}
