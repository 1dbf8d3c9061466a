//! Contact database operations
//!
//! Plain CRUD; every function is a single store round-trip with no
//! cross-row coordination and no associated file state.

use crate::db::models::{Contact, ContactFields};
use crate::error::{Error, Result};
use sqlx::SqlitePool;

/// Insert a contact and return the stored row including its generated id
pub async fn create(pool: &SqlitePool, fields: &ContactFields) -> Result<Contact> {
    let result = sqlx::query(
        r#"
        INSERT INTO contacts (name, company, email, phone_number, message)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.company)
    .bind(&fields.email)
    .bind(&fields.phone_number)
    .bind(&fields.message)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    get(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("contact {id} vanished after insert")))
}

/// All contacts, newest-created first
pub async fn list(pool: &SqlitePool) -> Result<Vec<Contact>> {
    let contacts = sqlx::query_as::<_, Contact>(
        "SELECT * FROM contacts ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(contacts)
}

/// Fetch one contact; absence is a sentinel, not an error
pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<Contact>> {
    let contact = sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(contact)
}

/// Full replace of the mutable fields. Callers confirm existence first;
/// there is no file state here that would require an atomic check.
pub async fn update(pool: &SqlitePool, id: i64, fields: &ContactFields) -> Result<Contact> {
    sqlx::query(
        r#"
        UPDATE contacts
        SET name = ?, company = ?, email = ?, phone_number = ?, message = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.company)
    .bind(&fields.email)
    .bind(&fields.phone_number)
    .bind(&fields.message)
    .bind(id)
    .execute(pool)
    .await?;

    get(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("contact {id} vanished during update")))
}

/// Remove a contact; returns whether a row was actually deleted
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM contacts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
