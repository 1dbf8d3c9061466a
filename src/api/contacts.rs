//! Contact endpoints
//!
//! JSON bodies only; no file state anywhere on this surface.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::ApiResponse;
use crate::db::models::{Contact, ContactFields};
use crate::db::contacts;
use crate::error::{Error, Result};
use crate::{validation, AppState};

#[derive(Debug, Deserialize)]
pub struct ContactPayload {
    #[serde(default)]
    pub name: String,
    pub company: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    pub message: Option<String>,
}

impl ContactPayload {
    /// Trim everything; optional fields collapse to absent when blank
    fn into_fields(self) -> ContactFields {
        ContactFields {
            name: self.name.trim().to_string(),
            company: clean_optional(self.company),
            email: self.email.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            message: clean_optional(self.message),
        }
    }
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// POST /api/contacts
pub async fn create_contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactPayload>,
) -> Result<(StatusCode, Json<ApiResponse<Contact>>)> {
    let fields = payload.into_fields();
    validation::validate_contact(&fields)?;

    let contact = contacts::create(&state.db, &fields).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message_data(
            "Contact created successfully",
            contact,
        )),
    ))
}

/// GET /api/contacts
pub async fn list_contacts(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Contact>>>> {
    let all = contacts::list(&state.db).await?;
    Ok(Json(ApiResponse::list(all)))
}

/// GET /api/contacts/:id
pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Contact>>> {
    let contact = contacts::get(&state.db, id)
        .await?
        .ok_or_else(|| Error::NotFound("Contact not found".to_string()))?;

    Ok(Json(ApiResponse::data(contact)))
}

/// PUT /api/contacts/:id
pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ContactPayload>,
) -> Result<Json<ApiResponse<Contact>>> {
    if contacts::get(&state.db, id).await?.is_none() {
        return Err(Error::NotFound("Contact not found".to_string()));
    }

    let fields = payload.into_fields();
    validation::validate_contact(&fields)?;

    let contact = contacts::update(&state.db, id, &fields).await?;
    Ok(Json(ApiResponse::message_data(
        "Contact updated successfully",
        contact,
    )))
}

/// DELETE /api/contacts/:id
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    if !contacts::delete(&state.db, id).await? {
        return Err(Error::NotFound("Contact not found".to_string()));
    }

    Ok(Json(ApiResponse::message("Contact deleted successfully")))
}
