//! Request field validation
//!
//! Length, presence and format checks run before any store access. A failed
//! check never opens a transaction and never touches staged files by itself;
//! callers that already staged uploads discard them before returning.

use crate::db::models::{ContactFields, ProjectFields};
use crate::error::{Error, FieldError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Loose email shape check: one `@`, a dot somewhere in the domain part.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

/// Phone number shape: optional leading +, 3-3-4..6 digit groups with
/// optional parentheses and separators.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+]?[(]?[0-9]{3}[)]?[-\s.]?[0-9]{3}[-\s.]?[0-9]{4,6}$").expect("phone pattern")
});

const MAX_NAME_LEN: usize = 100;
const MAX_COMPANY_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 100;
const MAX_PHONE_LEN: usize = 20;
const MAX_TITLE_LEN: usize = 100;

pub fn validate_contact(fields: &ContactFields) -> Result<()> {
    let mut errors = Vec::new();

    if fields.name.is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    } else if fields.name.chars().count() > MAX_NAME_LEN {
        errors.push(FieldError::new(
            "name",
            "Name must be less than 100 characters",
        ));
    }

    if let Some(company) = &fields.company {
        if company.chars().count() > MAX_COMPANY_LEN {
            errors.push(FieldError::new(
                "company",
                "Company name must be less than 100 characters",
            ));
        }
    }

    if fields.email.is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !EMAIL_RE.is_match(&fields.email) {
        errors.push(FieldError::new(
            "email",
            "Please provide a valid email address",
        ));
    } else if fields.email.chars().count() > MAX_EMAIL_LEN {
        errors.push(FieldError::new(
            "email",
            "Email must be less than 100 characters",
        ));
    }

    if fields.phone_number.is_empty() {
        errors.push(FieldError::new("phone_number", "Phone number is required"));
    } else if fields.phone_number.chars().count() > MAX_PHONE_LEN {
        errors.push(FieldError::new(
            "phone_number",
            "Phone number must be less than 20 characters",
        ));
    } else if !PHONE_RE.is_match(&fields.phone_number) {
        errors.push(FieldError::new(
            "phone_number",
            "Please provide a valid phone number",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(errors))
    }
}

pub fn validate_project(fields: &ProjectFields) -> Result<()> {
    let mut errors = Vec::new();

    if fields.title.is_empty() {
        errors.push(FieldError::new("title", "Title is required"));
    } else if fields.title.chars().count() > MAX_TITLE_LEN {
        errors.push(FieldError::new(
            "title",
            "Title must be less than 100 characters",
        ));
    }

    if fields.description.is_empty() {
        errors.push(FieldError::new("description", "Description is required"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(errors))
    }
}
