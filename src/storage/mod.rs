//! Persistence gateway for memos.
//!
//! Every store operation goes through [`ConnectionManager`], which owns the single
//! process-wide handle to the backing store and creates it on first use. Backends plug in
//! through [`Connector`]; the gateway contract itself is [`MemoStore`].

pub mod http;
pub mod memory;
pub mod postgres;

use crate::domain::memo::{InsertMemo, Memo};
use crate::error::StorageError;
use crate::infra::config::{self, StoreBackend};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;

pub use http::{HttpMemoStore, HttpSqlConnector};
pub use memory::{InMemoryConnector, InMemoryMemoStore};
pub use postgres::{PgPoolConnector, PostgresMemoStore};

/// Contract shared by every store backend.
#[async_trait]
pub trait MemoStore: Send + Sync {
    /// Inserts one validated memo and returns it with its store-assigned `id` and
    /// `created_at`. Resolves only after the store acknowledged the write.
    async fn create(&self, memo: InsertMemo) -> Result<Memo, StorageError>;

    /// Cheap round-trip used by health checks.
    async fn ping(&self) -> Result<(), StorageError>;
}

/// Builds a store handle. Called at most once per successful initialization.
#[async_trait]
pub trait Connector: Send + Sync {
    fn backend(&self) -> StoreBackend;

    async fn connect(&self) -> Result<Arc<dyn MemoStore>, StorageError>;
}

/// Lazily-initialized, memoized store handle.
///
/// Concurrent first callers share one initialization: one of them runs the connector,
/// the rest wait for its outcome. A failed initialization is reported to the caller and
/// leaves the handle empty, so the next call tries again.
pub struct ConnectionManager {
    connector: Box<dyn Connector>,
    handle: OnceCell<Arc<dyn MemoStore>>,
}

impl ConnectionManager {
    pub fn new<C: Connector + 'static>(connector: C) -> Self {
        Self {
            connector: Box::new(connector),
            handle: OnceCell::new(),
        }
    }

    /// Picks the connector named by `MEMO_STORE_BACKEND`. Does not touch the network.
    pub fn from_env() -> Result<Self, StorageError> {
        let manager = match config::store_backend()? {
            StoreBackend::Pooled => Self::new(PgPoolConnector::from_env()),
            StoreBackend::Http => Self::new(HttpSqlConnector::from_env()),
            StoreBackend::Memory => Self::new(InMemoryConnector::new()),
        };
        Ok(manager)
    }

    pub fn backend(&self) -> StoreBackend {
        self.connector.backend()
    }

    pub fn is_connected(&self) -> bool {
        self.handle.initialized()
    }

    /// Returns the shared store handle, connecting first if nobody has yet.
    pub async fn get_connection(&self) -> Result<Arc<dyn MemoStore>, StorageError> {
        let store = self
            .handle
            .get_or_try_init(|| async {
                let backend = self.connector.backend();
                tracing::info!(%backend, "Initializing memo store connection");
                match self.connector.connect().await {
                    Ok(store) => {
                        tracing::info!(%backend, "Memo store connection ready");
                        Ok(store)
                    }
                    Err(e) => {
                        tracing::error!(%backend, kind = e.kind(), error = %e, "Memo store initialization failed");
                        Err(e)
                    }
                }
            })
            .await?;
        Ok(Arc::clone(store))
    }
}

#[async_trait]
impl MemoStore for ConnectionManager {
    async fn create(&self, memo: InsertMemo) -> Result<Memo, StorageError> {
        self.get_connection().await?.create(memo).await
    }

    async fn ping(&self) -> Result<(), StorageError> {
        self.get_connection().await?.ping().await
    }
}
