//! HTTP gateway for the entries proxy.
//!
//! Reads with `GET /api/entries` and upserts with `POST /api/entries`. Writes
//! carry the shared secret in `x-write-secret`; the proxy refuses every write
//! when its own secret is unset, which shows up here as a non-success status.

use crate::config::RemoteConfig;
use crate::error::{CloudError, CloudResult};
use crate::gateway::RemoteGateway;
use crate::rows::{outgoing_rows, RemoteRow};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use tracker_model::{check_records, Entry};

/// Header carrying the shared write secret.
pub const WRITE_SECRET_HEADER: &str = "x-write-secret";

/// reqwest-backed [`RemoteGateway`].
pub struct HttpGateway {
    client: Client,
    entries_url: String,
    write_secret: Option<String>,
}

impl HttpGateway {
    pub fn new(config: &RemoteConfig) -> CloudResult<Self> {
        let entries_url = config
            .entries_url()
            .ok_or_else(|| CloudError::Config("api_base_url is not set".to_string()))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            entries_url,
            write_secret: config.write_secret.clone(),
        })
    }

    pub fn entries_url(&self) -> &str {
        &self.entries_url
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn try_fetch_all(&self) -> CloudResult<Vec<RemoteRow>> {
        let resp = self.client.get(&self.entries_url).send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(CloudError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let value: Value = if text.trim().is_empty() {
            Value::Array(Vec::new())
        } else {
            serde_json::from_str(&text)
                .map_err(|e| CloudError::Api(format!("response body is not JSON: {e}")))?
        };
        check_records(&value)?;

        let rows: Vec<RemoteRow> = serde_json::from_value(value)?;
        debug!("fetched {} remote rows", rows.len());
        Ok(rows)
    }

    async fn try_upsert_batch(&self, entries: &[Entry]) -> CloudResult<()> {
        let mut request = self.client.post(&self.entries_url).json(&outgoing_rows(entries));
        if let Some(secret) = &self.write_secret {
            request = request.header(WRITE_SECRET_HEADER, secret);
        }

        let resp = request.send().await?;
        match resp.status() {
            StatusCode::UNAUTHORIZED => Err(CloudError::Unauthorized),
            status if status.is_success() => {
                debug!("upserted {} entries", entries.len());
                Ok(())
            }
            status => Err(CloudError::Status {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            }),
        }
    }
}
