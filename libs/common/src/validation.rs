//! Input validation utilities
//!
//! Payloads implement [`Validate`]; handlers receive them through
//! [`ValidatedJson`], which rejects malformed or invalid bodies with a
//! field-level error list before a service is called.

use axum::{
    Json,
    async_trait,
    extract::{FromRequest, Request},
};
use regex::Regex;
use serde::{Serialize, de::DeserializeOwned};
use std::sync::OnceLock;
use thiserror::Error;

use crate::error::AppError;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Collected field-level validation failures
#[derive(Debug, Clone, Default, Error)]
#[error("{} invalid field(s)", .fields.len())]
pub struct ValidationErrors {
    fields: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an error list holding a single failure
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Record an error when `value` is blank
    pub fn require(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, format!("{} is required", field));
        }
    }

    /// Record an error when `value` is not a well-formed email address
    pub fn require_email(&mut self, field: &str, value: &str) {
        if let Err(message) = validate_email(value) {
            self.add(field, message);
        }
    }

    /// Turn the collected failures into a result
    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Schema check implemented by every inbound payload
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// JSON extractor that runs [`Validate`] on the decoded payload
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ValidationErrors::single("body", rejection.body_text()))?;

        value.validate()?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_email() {
        assert!(validate_email("alfredamos@gmail.com").is_ok());
    }

    #[test]
    fn rejects_malformed_email() {
        assert_eq!(validate_email(""), Err("Email is required".to_string()));
        assert_eq!(
            validate_email("not-an-email"),
            Err("Invalid email format".to_string())
        );
    }

    #[test]
    fn collects_every_failure() {
        let mut errors = ValidationErrors::new();
        errors.require("name", "  ");
        errors.require_email("email", "nope");
        errors.require("phone", "0123");

        let errors = errors.finish().unwrap_err();
        let fields: Vec<&str> = errors.fields().iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "email"]);
    }

    #[test]
    fn empty_collection_passes() {
        assert!(ValidationErrors::new().finish().is_ok());
    }
}
