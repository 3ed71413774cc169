//! The memo ingestion service.
//!
//! Runs the validation & sanitization gate over a raw payload and hands the result to the
//! persistence gateway. Nothing reaches the store unless every check passed.

use crate::domain::memo::Memo;
use crate::domain::validate::validate_insert_memo;
use crate::error::SubmitError;
use crate::storage::MemoStore;
use serde_json::Value as JsonValue;
use std::sync::Arc;

pub struct MemoService {
    store: Arc<dyn MemoStore>,
}

impl MemoService {
    pub fn new(store: Arc<dyn MemoStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn MemoStore> {
        &self.store
    }

    /// Validates, sanitizes and persists one memo.
    pub async fn submit(&self, candidate: &JsonValue) -> Result<Memo, SubmitError> {
        let insert = validate_insert_memo(candidate)?;
        let memo = self.store.create(insert).await?;
        tracing::info!(memo_id = %memo.id, "Memo stored");
        Ok(memo)
    }
}
