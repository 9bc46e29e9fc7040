use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use tracing::debug;

use game_core::RecordStore;
use game_types::{GameRecord, StoreError};

pub const DEFAULT_TABLE: &str = "game_records";

/// Client for a hosted record table exposed over a PostgREST-style API.
pub struct RestRecordStore {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
}

fn request_error(e: reqwest::Error) -> StoreError {
    StoreError::Request {
        message: e.to_string(),
    }
}

impl RestRecordStore {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(request_error)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            table: DEFAULT_TABLE.to_string(),
        })
    }

    pub fn with_table(mut self, table: &str) -> Self {
        self.table = table.to_string();
        self
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn ensure_success(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(StoreError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl RecordStore for RestRecordStore {
    async fn fetch_top(&self, limit: u64) -> Result<Vec<GameRecord>, StoreError> {
        let limit = limit.to_string();
        let request = self.client.get(self.table_url()).query(&[
            ("select", "*"),
            ("order", "attempts.asc,time_seconds.asc"),
            ("limit", limit.as_str()),
        ]);

        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(request_error)?;
        let body = Self::ensure_success(response)
            .await?
            .text()
            .await
            .map_err(request_error)?;

        serde_json::from_str(&body).map_err(|e| StoreError::Decode {
            message: e.to_string(),
        })
    }

    async fn insert(&self, record: &GameRecord) -> Result<(), StoreError> {
        let request = self
            .client
            .post(self.table_url())
            .header("Prefer", "return=minimal")
            .json(&[record]);

        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(request_error)?;
        Self::ensure_success(response).await?;

        debug!("Stored record for {} in {}", record.name, self.table);
        Ok(())
    }
}
