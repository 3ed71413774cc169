use crate::error::{FieldError, ValidationError};
use crate::transport::http::types::ErrorResponse;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::any::Any;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

pub fn validation_error_response(err: &ValidationError) -> (StatusCode, Json<ErrorResponse>) {
    let details = match err {
        ValidationError::SchemaInvalid(fields) => Some(fields.clone()),
        _ => None,
    };
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: err.to_string(),
            kind: Some(err.kind().to_string()),
            details,
        }),
    )
}

/// Undecodable bodies fail the structural check like any other malformed memo.
pub fn json_rejection_response(err: JsonRejection) -> (StatusCode, Json<ErrorResponse>) {
    let field = FieldError {
        path: String::new(),
        expected: "object".to_string(),
        received: "invalid JSON".to_string(),
        message: err.body_text(),
    };
    validation_error_response(&ValidationError::SchemaInvalid(vec![field]))
}

pub fn internal_error_response() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::message(INTERNAL_ERROR_MESSAGE)),
    )
}

/// Turns a handler panic into the generic 500 body. The payload is logged, never returned.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!(panic = %detail, "Handler panicked");
    internal_error_response().into_response()
}
