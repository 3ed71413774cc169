use crate::domain::memo::InsertMemo;
use crate::error::SubmitError;
use crate::transport::http::handlers::common::{
    internal_error_response, json_rejection_response, validation_error_response,
};
use crate::transport::http::types::{AppState, CreateMemoResponse, ErrorResponse};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value as JsonValue;
use std::time::Instant;

pub const MEMO_SAVED_MESSAGE: &str = "Memo saved successfully.";

#[utoipa::path(
    post,
    path = "/api/memos",
    request_body = InsertMemo,
    responses(
        (status = 201, description = "Memo stored", body = CreateMemoResponse),
        (status = 400, description = "Invalid memo (schema, color, font size or enum)", body = ErrorResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_memo_handler(
    State(state): State<AppState>,
    request: Result<Json<JsonValue>, JsonRejection>,
) -> Response {
    let started = Instant::now();

    let response = match request {
        Ok(Json(candidate)) => match state.memo_service.submit(&candidate).await {
            Ok(memo) => (
                StatusCode::CREATED,
                Json(CreateMemoResponse {
                    id: memo.id,
                    created_at: memo.created_at,
                    message: MEMO_SAVED_MESSAGE.to_string(),
                }),
            )
                .into_response(),
            Err(SubmitError::Validation(e)) => {
                tracing::info!(kind = e.kind(), error = %e, "Memo rejected");
                validation_error_response(&e).into_response()
            }
            Err(SubmitError::Storage(e)) => {
                tracing::error!(kind = e.kind(), error = %e, "Error creating memo");
                internal_error_response().into_response()
            }
        },
        Err(rejection) => {
            tracing::info!(error = %rejection, "Memo body rejected");
            json_rejection_response(rejection).into_response()
        }
    };

    tracing::info!(
        method = "POST",
        path = "/api/memos",
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Request handled"
    );
    response
}

/// CORS preflight: headers come from the CORS layer, the body stays empty.
pub async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed_handler(method: Method) -> (StatusCode, Json<ErrorResponse>) {
    tracing::info!(%method, path = "/api/memos", status = 405, "Request handled");
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::message("Method not allowed")),
    )
}
