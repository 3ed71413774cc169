use crate::domain::memo::{FontStyle, FontWeight, InsertMemo, Memo, MemoStyle};
use crate::error::FieldError;
use crate::transport::http::handlers::common::panic_response;
use crate::transport::http::handlers::{health, memos};
use crate::transport::http::types::{ApiResponse, AppState, CreateMemoResponse, ErrorResponse};
use axum::http::header::HeaderName;
use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(health::healthcheck_handler, memos::create_memo_handler),
    components(schemas(
        ApiResponse,
        InsertMemo,
        Memo,
        MemoStyle,
        FontWeight,
        FontStyle,
        CreateMemoResponse,
        ErrorResponse,
        FieldError
    ))
)]
pub struct ApiDoc;

const CORS_ALLOWED_HEADERS: &[&str] = &[
    "x-csrf-token",
    "x-requested-with",
    "accept",
    "accept-version",
    "content-length",
    "content-md5",
    "content-type",
    "date",
    "x-api-version",
];

/// Cross-origin access from anywhere, with the usual preflight header set.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS, Method::POST])
        .allow_headers(
            CORS_ALLOWED_HEADERS
                .iter()
                .copied()
                .map(HeaderName::from_static)
                .collect::<Vec<_>>(),
        )
}

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/api/memos",
            post(memos::create_memo_handler)
                .options(memos::preflight_handler)
                .fallback(memos::method_not_allowed_handler),
        )
        .with_state(app_state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors_layer())
}
