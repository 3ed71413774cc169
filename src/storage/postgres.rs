//! Pooled PostgreSQL store for long-running processes.

use crate::domain::memo::{InsertMemo, Memo, MemoStyle};
use crate::error::StorageError;
use crate::infra::config::{self, StoreBackend};
use crate::storage::{Connector, MemoStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::sync::Arc;

pub(crate) const CREATE_MEMOS_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS memos (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    content TEXT NOT NULL,
    styles JSONB NOT NULL,
    bg_color TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)";

fn map_sqlx_error(e: sqlx::Error, writing: bool) -> StorageError {
    match e {
        sqlx::Error::Configuration(cause) => StorageError::Misconfigured(cause.to_string()),
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => StorageError::Unreachable(e.to_string()),
        other if writing => StorageError::WriteFailed(other.to_string()),
        other => StorageError::Unreachable(other.to_string()),
    }
}

/// Memo store over a shared `PgPool`.
#[derive(Clone)]
pub struct PostgresMemoStore {
    pool: PgPool,
}

impl PostgresMemoStore {
    /// Wraps an existing pool and makes sure the `memos` table exists.
    pub async fn new_with_pool(pool: PgPool) -> Result<Self, StorageError> {
        sqlx::query(CREATE_MEMOS_TABLE_SQL)
            .execute(&pool)
            .await
            .map_err(|e| map_sqlx_error(e, false))?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl MemoStore for PostgresMemoStore {
    async fn create(&self, memo: InsertMemo) -> Result<Memo, StorageError> {
        let row = sqlx::query(
            "INSERT INTO memos (content, styles, bg_color) VALUES ($1, $2, $3)
             RETURNING id::text AS id, created_at",
        )
        .bind(&memo.content)
        .bind(Json::<&MemoStyle>(&memo.styles))
        .bind(&memo.bg_color)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, true))?;

        let id: String = row
            .try_get("id")
            .map_err(|e| StorageError::WriteFailed(format!("missing id in insert result: {}", e)))?;
        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(|e| {
            StorageError::WriteFailed(format!("missing created_at in insert result: {}", e))
        })?;

        Ok(Memo::from_insert(memo, id, created_at))
    }

    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, false))?;
        Ok(())
    }
}

/// Opens a `PgPool` on first use.
pub struct PgPoolConnector {
    /// Explicit connection string; `None` reads `DATABASE_URL` at connect time.
    url: Option<String>,
    max_connections: u32,
}

impl PgPoolConnector {
    pub fn from_env() -> Self {
        Self {
            url: None,
            max_connections: config::database_max_connections(),
        }
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            max_connections: config::database_max_connections(),
        }
    }

    pub fn max_connections(mut self, n: u32) -> Self {
        self.max_connections = n.max(1);
        self
    }
}

#[async_trait]
impl Connector for PgPoolConnector {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Pooled
    }

    async fn connect(&self) -> Result<Arc<dyn MemoStore>, StorageError> {
        let url = match &self.url {
            Some(u) => {
                config::parse_database_url(u)?;
                u.clone()
            }
            None => config::database_url()?,
        };

        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .connect(&url)
            .await
            .map_err(|e| map_sqlx_error(e, false))?;

        Ok(Arc::new(PostgresMemoStore::new_with_pool(pool).await?))
    }
}
