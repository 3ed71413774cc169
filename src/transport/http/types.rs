use crate::app::memo_service::MemoService;
use crate::error::FieldError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub memo_service: Arc<MemoService>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemoResponse {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[schema(example = "Memo saved successfully.")]
    pub message: String,
}

/// Body of every non-2xx answer from the memo endpoint.
#[derive(Serialize, Debug, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Validation failure label (`schema_invalid`, `invalid_color`, ...). Absent on 5xx.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Field-level problems, only for `schema_invalid`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            kind: None,
            details: None,
        }
    }
}
