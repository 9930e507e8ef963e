//! Notion API client.
//!
//! Creates one database page per transaction through
//! `POST /v1/pages`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cartola::notion::{NotionClient, TransactionSink};
//!
//! let client = NotionClient::from_env()?;
//! client.push(&transaction).await?;
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::env;

use crate::error::{NotionError, NotionResult};
use crate::models::Transaction;

/// Notion API base URL
const DEFAULT_API_URL: &str = "https://api.notion.com";

/// API version sent in the `Notion-Version` header
const NOTION_VERSION: &str = "2022-06-28";

/// Destination for imported transactions.
#[async_trait]
pub trait TransactionSink: Send + Sync {
    /// Store one transaction.
    async fn push(&self, transaction: &Transaction) -> NotionResult<()>;
}

/// Notion connection settings.
#[derive(Clone, Debug)]
pub struct NotionConfig {
    pub token: String,
    pub database_id: String,
    pub api_url: String,
}

impl NotionConfig {
    /// Read `NOTION_TOKEN`, `NOTION_DATABASE_ID` and the optional
    /// `NOTION_API_URL` from the environment.
    pub fn from_env() -> NotionResult<Self> {
        // Try loading .env file
        let _ = dotenvy::dotenv();

        let token =
            env::var("NOTION_TOKEN").map_err(|_| NotionError::MissingConfig("NOTION_TOKEN"))?;
        let database_id = env::var("NOTION_DATABASE_ID")
            .map_err(|_| NotionError::MissingConfig("NOTION_DATABASE_ID"))?;
        let api_url = env::var("NOTION_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Ok(Self {
            token,
            database_id,
            api_url,
        })
    }
}

/// Notion error response
#[derive(Debug, Deserialize)]
struct NotionErrorBody {
    message: String,
}

/// Notion API client
#[derive(Clone)]
pub struct NotionClient {
    config: NotionConfig,
    http: reqwest::Client,
}

impl NotionClient {
    pub fn new(config: NotionConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Create a client from environment variables
    pub fn from_env() -> NotionResult<Self> {
        Ok(Self::new(NotionConfig::from_env()?))
    }

    pub fn database_id(&self) -> &str {
        &self.config.database_id
    }

    /// Request body creating a page for `transaction`.
    pub fn page_body(&self, transaction: &Transaction) -> Value {
        json!({
            "parent": { "database_id": self.config.database_id },
            "properties": transaction.to_notion_properties(),
        })
    }

    /// Create a database page
    async fn create_page(&self, body: &Value) -> NotionResult<()> {
        let url = format!("{}/v1/pages", self.config.api_url.trim_end_matches('/'));

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(body)
            .send()
            .await
            .map_err(|e| NotionError::HttpError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let text = response
            .text()
            .await
            .map_err(|e| NotionError::HttpError(e.to_string()))?;
        Err(NotionError::ApiError {
            status: status.as_u16(),
            message: error_message(&text),
        })
    }
}

#[async_trait]
impl TransactionSink for NotionClient {
    async fn push(&self, transaction: &Transaction) -> NotionResult<()> {
        self.create_page(&self.page_body(transaction)).await
    }
}

/// Extract Notion's `message` from an error body, or fall back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<NotionErrorBody>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.chars().take(500).collect())
}
