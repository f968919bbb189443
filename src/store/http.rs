use super::{InterviewRecord, RecordStore};
use crate::config::StoreConfig;
use anyhow::{bail, Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use tracing::info;

/// Record store client speaking the managed store's REST dialect
/// (`/rest/v1/{table}` with `eq.` filters, `apikey` + bearer auth).
pub struct HttpRecordStore {
    http: reqwest::Client,
    base_url: String,
    table: String,
}

impl HttpRecordStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();

        let api_key = HeaderValue::from_str(&config.api_key)
            .context("Store API key is not a valid header value")?;
        headers.insert("apikey", api_key);

        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .context("Store API key is not a valid header value")?;
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build record store HTTP client")?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            table: config.table.clone(),
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }
}

#[async_trait::async_trait]
impl RecordStore for HttpRecordStore {
    async fn find_by_call_id(&self, call_id: &str) -> Result<Option<InterviewRecord>> {
        let response = self
            .http
            .get(self.table_url())
            .query(&[
                ("call_id", format!("eq.{call_id}")),
                ("select", "*".to_string()),
                ("limit", "1".to_string()),
            ])
            .send()
            .await
            .context("Record store query failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("Record store query returned {}: {}", status, body);
        }

        let mut rows: Vec<InterviewRecord> = response
            .json()
            .await
            .context("Failed to decode record store response")?;

        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.remove(0)))
        }
    }

    async fn insert(&self, record: &InterviewRecord) -> Result<()> {
        info!("Inserting interview record for call {}", record.call_id);

        let response = self
            .http
            .post(self.table_url())
            .json(record)
            .send()
            .await
            .context("Record store insert failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("Record store insert returned {}: {}", status, body);
        }

        Ok(())
    }
}
