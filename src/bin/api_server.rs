// src/bin/api_server.rs

use memo_api::infra::{config, logging};
use memo_api::transport;
use memo_api::{ConnectionManager, MemoService};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    // --- Store Initialization (lazy) ---
    // Only the backend is chosen here; the connection itself is opened by the first request,
    // so a missing DATABASE_URL does not keep the server from starting.
    let manager = ConnectionManager::from_env()?;
    tracing::info!(backend = %manager.backend(), "Memo store configured (connects on first use)");
    if manager.backend() != config::StoreBackend::Memory && config::database_url().is_err() {
        tracing::warn!("DATABASE_URL is missing or invalid; memo writes will fail until it is set");
    }

    let app_state = transport::http::AppState {
        memo_service: Arc::new(MemoService::new(Arc::new(manager))),
    };

    // --- API Server Initialization ---
    let app = transport::http::create_router(app_state).merge(
        SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()),
    );
    let bind_addr = config::bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await.map_err(|e| {
        anyhow::anyhow!("Failed to bind {} ({}). Use BIND_ADDR to pick another address.", bind_addr, e)
    })?;
    tracing::info!(addr = %bind_addr, "API server listening");
    tracing::info!("Swagger UI available at /swagger-ui");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received");
            }
        })
        .await?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}
