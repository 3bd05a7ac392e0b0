use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;

use super::store::LinkStore;
use crate::config::StoreSecrets;
use crate::core::link::{LinkRecord, NewLink};
use crate::error::StoreError;

/// Client for a PostgREST table (the API Supabase exposes under `/rest/v1`).
#[derive(Clone)]
pub struct RestStore {
    table_url: String,
    api_key: String,
    http: Client,
}

impl RestStore {
    pub fn new(
        secrets: &StoreSecrets,
        collection: &str,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            table_url: format!(
                "{}/rest/v1/{}",
                secrets.endpoint.trim_end_matches('/'),
                collection
            ),
            api_key: secrets.api_key.clone(),
            http,
        })
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

/// Turn a non-2xx response into [`StoreError::Status`], keeping the body for the log.
async fn check_status(resp: Response) -> Result<Response, StoreError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(StoreError::Status { status, body })
}

impl LinkStore for RestStore {
    async fn fetch_all(&self) -> Result<Vec<LinkRecord>, StoreError> {
        let resp = self
            .authed(self.http.get(&self.table_url))
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await?;
        let resp = check_status(resp).await?;

        let text = resp.text().await?;
        let links: Vec<LinkRecord> =
            serde_json::from_str(&text).map_err(|e| StoreError::Decode(e.to_string()))?;

        log::debug!("Fetched {} links from {}", links.len(), self.table_url);
        Ok(links)
    }

    async fn insert(&self, link: &NewLink) -> Result<(), StoreError> {
        let resp = self
            .authed(self.http.post(&self.table_url))
            .header("Prefer", "return=minimal")
            .json(&[link])
            .send()
            .await?;
        check_status(resp).await?;

        log::info!("Inserted link: {}", link.title);
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let resp = self
            .authed(self.http.delete(&self.table_url))
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await?;
        check_status(resp).await?;

        log::info!("Deleted link {}", id);
        Ok(())
    }
}
