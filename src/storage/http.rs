//! SQL-over-HTTP store for ephemeral (serverless) execution.
//!
//! No socket is kept open between calls: every operation is one HTTPS request to the
//! database's SQL endpoint carrying the connection string in a header. The connector
//! only builds the client and makes sure the `memos` table exists.

use crate::domain::memo::{InsertMemo, Memo};
use crate::error::StorageError;
use crate::infra::config::{self, StoreBackend};
use crate::storage::postgres::CREATE_MEMOS_TABLE_SQL;
use crate::storage::{Connector, MemoStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;

const CONNECTION_STRING_HEADER: &str = "Neon-Connection-String";
const RAW_TEXT_HEADER: &str = "Neon-Raw-Text-Output";
const ARRAY_MODE_HEADER: &str = "Neon-Array-Mode";

const INSERT_MEMO_SQL: &str = "INSERT INTO memos (content, styles, bg_color) VALUES ($1, $2::jsonb, $3)
     RETURNING id::text AS id, to_json(created_at) #>> '{}' AS created_at";

#[derive(Serialize, Debug)]
struct SqlRequest<'a> {
    query: &'a str,
    params: Vec<JsonValue>,
}

#[derive(Deserialize, Debug)]
struct SqlResponse {
    #[serde(default)]
    rows: Vec<serde_json::Map<String, JsonValue>>,
}

#[derive(Deserialize, Debug)]
struct SqlErrorBody {
    message: Option<String>,
}

/// Memo store issuing one SQL-over-HTTP request per operation.
#[derive(Clone)]
pub struct HttpMemoStore {
    client: reqwest::Client,
    endpoint: String,
    connection_string: String,
}

impl HttpMemoStore {
    pub fn new(client: reqwest::Client, endpoint: String, connection_string: String) -> Self {
        Self {
            client,
            endpoint,
            connection_string,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn run(
        &self,
        query: &str,
        params: Vec<JsonValue>,
        writing: bool,
    ) -> Result<SqlResponse, StorageError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header(CONNECTION_STRING_HEADER, &self.connection_string)
            .header(RAW_TEXT_HEADER, "true")
            .header(ARRAY_MODE_HEADER, "false")
            .json(&SqlRequest { query, params })
            .send()
            .await
            .map_err(|e| StorageError::Unreachable(format!("SQL endpoint request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<SqlErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or(body);
            let msg = format!("SQL endpoint returned {}: {}", status, detail);
            return Err(if writing && status.is_client_error() {
                StorageError::WriteFailed(msg)
            } else {
                StorageError::Unreachable(msg)
            });
        }

        resp.json::<SqlResponse>()
            .await
            .map_err(|e| StorageError::WriteFailed(format!("unreadable SQL endpoint response: {}", e)))
    }
}

fn row_str<'a>(
    row: &'a serde_json::Map<String, JsonValue>,
    key: &str,
) -> Result<&'a str, StorageError> {
    row.get(key)
        .and_then(JsonValue::as_str)
        .ok_or_else(|| StorageError::WriteFailed(format!("missing {} in insert result", key)))
}

#[async_trait]
impl MemoStore for HttpMemoStore {
    async fn create(&self, memo: InsertMemo) -> Result<Memo, StorageError> {
        let styles = serde_json::to_string(&memo.styles)
            .map_err(|e| StorageError::WriteFailed(format!("could not encode styles: {}", e)))?;
        let params = vec![
            JsonValue::from(memo.content.as_str()),
            JsonValue::from(styles),
            JsonValue::from(memo.bg_color.as_str()),
        ];

        let resp = self.run(INSERT_MEMO_SQL, params, true).await?;
        let row = resp
            .rows
            .first()
            .ok_or_else(|| StorageError::WriteFailed("insert returned no rows".to_string()))?;

        let id = row_str(row, "id")?.to_string();
        let created_at = DateTime::parse_from_rfc3339(row_str(row, "created_at")?)
            .map_err(|e| StorageError::WriteFailed(format!("invalid created_at: {}", e)))?
            .with_timezone(&Utc);

        Ok(Memo::from_insert(memo, id, created_at))
    }

    async fn ping(&self) -> Result<(), StorageError> {
        self.run("SELECT 1", Vec::new(), false).await.map(|_| ())
    }
}

/// Builds an [`HttpMemoStore`] on first use.
pub struct HttpSqlConnector {
    url: Option<String>,
    endpoint: Option<String>,
}

impl HttpSqlConnector {
    pub fn from_env() -> Self {
        Self {
            url: None,
            endpoint: config::database_http_endpoint(),
        }
    }

    pub fn new(url: impl Into<String>, endpoint: Option<String>) -> Self {
        Self {
            url: Some(url.into()),
            endpoint,
        }
    }
}

#[async_trait]
impl Connector for HttpSqlConnector {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Http
    }

    async fn connect(&self) -> Result<Arc<dyn MemoStore>, StorageError> {
        let connection_string = match &self.url {
            Some(u) => u.trim().to_string(),
            None => config::database_url()?,
        };
        let parsed = config::parse_database_url(&connection_string)?;

        let endpoint = match &self.endpoint {
            Some(e) => e.clone(),
            None => format!("https://{}/sql", parsed.host_str().unwrap_or_default()),
        };

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| StorageError::Misconfigured(format!("could not build HTTP client: {}", e)))?;

        let store = HttpMemoStore::new(client, endpoint, connection_string);
        store.run(CREATE_MEMOS_TABLE_SQL, Vec::new(), false).await?;
        Ok(Arc::new(store))
    }
}
