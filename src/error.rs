//! Error taxonomy for the memo ingestion pipeline.
//!
//! Validation errors are always caused by the client and map to `400`. Storage errors come
//! from the environment (configuration, network, database) and map to `500` with the cause
//! kept server-side.

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// A single structural problem found while checking a candidate against the memo shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    /// Dotted path to the offending field (e.g. `styles.fontSize`).
    pub path: String,
    pub expected: String,
    pub received: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: &str, expected: &str, received: &str) -> Self {
        let message = if received == "undefined" {
            "Required".to_string()
        } else {
            format!("Expected {}, received {}", expected, received)
        };
        Self {
            path: path.to_string(),
            expected: expected.to_string(),
            received: received.to_string(),
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid request data")]
    SchemaInvalid(Vec<FieldError>),

    #[error("Invalid color format. Use hex colors (e.g., #FFFFFF)")]
    InvalidColor,

    #[error("Font size must be between 16 and 72 pixels")]
    InvalidFontSize,

    #[error("{}", invalid_enum_message(.field))]
    InvalidEnum { field: &'static str },
}

fn invalid_enum_message(field: &str) -> String {
    match field {
        "fontWeight" => "Font weight must be 'normal' or 'bold'".to_string(),
        "fontStyle" => "Font style must be 'normal' or 'italic'".to_string(),
        other => format!("Invalid value for '{}'", other),
    }
}

impl ValidationError {
    /// Stable machine-readable label, exposed to clients as `kind`.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::SchemaInvalid(_) => "schema_invalid",
            ValidationError::InvalidColor => "invalid_color",
            ValidationError::InvalidFontSize => "invalid_font_size",
            ValidationError::InvalidEnum { .. } => "invalid_enum",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Connection string or backend selection is absent or malformed.
    #[error("store misconfigured: {0}")]
    Misconfigured(String),

    #[error("store unreachable: {0}")]
    Unreachable(String),

    #[error("write failed: {0}")]
    WriteFailed(String),
}

impl StorageError {
    pub fn kind(&self) -> &'static str {
        match self {
            StorageError::Misconfigured(_) => "misconfigured",
            StorageError::Unreachable(_) => "unreachable",
            StorageError::WriteFailed(_) => "write_failed",
        }
    }
}

/// Everything `MemoService::submit` can fail with.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_reads_as_required() {
        let e = FieldError::new("bgColor", "string", "undefined");
        assert_eq!(e.message, "Required");

        let e = FieldError::new("content", "string", "number");
        assert_eq!(e.message, "Expected string, received number");
    }

    #[test]
    fn enum_messages_name_the_allowed_values() {
        let e = ValidationError::InvalidEnum { field: "fontStyle" };
        assert_eq!(e.to_string(), "Font style must be 'normal' or 'italic'");
        assert_eq!(e.kind(), "invalid_enum");
    }
}
