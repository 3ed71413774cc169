//! Process-local memo store. Used for local runs and tests; nothing survives a restart.

use crate::domain::memo::{InsertMemo, Memo};
use crate::error::StorageError;
use crate::infra::config::StoreBackend;
use crate::storage::{Connector, MemoStore};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryMemoStore {
    memos: Mutex<Vec<Memo>>,
}

impl InMemoryMemoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored memo, in insertion order.
    pub async fn memos(&self) -> Vec<Memo> {
        self.memos.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.memos.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.memos.lock().await.is_empty()
    }
}

#[async_trait]
impl MemoStore for InMemoryMemoStore {
    async fn create(&self, memo: InsertMemo) -> Result<Memo, StorageError> {
        let memo = Memo::from_insert(memo, Uuid::new_v4().to_string(), Utc::now());
        self.memos.lock().await.push(memo.clone());
        Ok(memo)
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Hands out one shared [`InMemoryMemoStore`].
pub struct InMemoryConnector {
    store: Arc<InMemoryMemoStore>,
}

impl InMemoryConnector {
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryMemoStore::new()))
    }

    /// Lets callers keep a handle on the store to inspect what was written.
    pub fn with_store(store: Arc<InMemoryMemoStore>) -> Self {
        Self { store }
    }
}

impl Default for InMemoryConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for InMemoryConnector {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Memory
    }

    async fn connect(&self) -> Result<Arc<dyn MemoStore>, StorageError> {
        let store: Arc<dyn MemoStore> = self.store.clone();
        Ok(store)
    }
}
