//! Search service client.
//!
//! Defines the [`SearchBackend`] trait and the concrete [`SolrClient`]
//! implementation that queries a Solr core's `select` handler over HTTP.
//!
//! The trait seam exists so the web layer and CLI can run against any
//! offset/limit search index, and so tests can substitute a recording
//! backend without a live Solr instance.
//!
//! # Pagination
//!
//! Callers pass a zero-based document offset (`start`) and a page size
//! (`rows`); the service returns the total hit count alongside the page,
//! so templates can render pagination controls.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use crate::config::SearchConfig;
use crate::models::SearchResults;

/// An offset/limit full-text search index.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Runs `query` against the index, returning `rows` documents starting
    /// at zero-based offset `start`.
    async fn search(&self, query: &str, start: u64, rows: u32) -> Result<SearchResults>;
}

/// HTTP client for a Solr core.
pub struct SolrClient {
    client: reqwest::Client,
    select_url: Url,
}

impl SolrClient {
    /// Builds a client for the core at `config.url`, with the configured
    /// request timeout applied to every call.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let select_url = select_url(&config.url)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, select_url })
    }
}

#[async_trait]
impl SearchBackend for SolrClient {
    async fn search(&self, query: &str, start: u64, rows: u32) -> Result<SearchResults> {
        let start_s = start.to_string();
        let rows_s = rows.to_string();

        let response = self
            .client
            .get(self.select_url.clone())
            .query(&[
                ("q", query),
                ("start", start_s.as_str()),
                ("rows", rows_s.as_str()),
                ("wt", "json"),
            ])
            .send()
            .await
            .context("Search service request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("Search service returned HTTP {}", status);
        }

        let body = response.text().await?;
        parse_select_response(&body)
    }
}

/// Resolves the `select` handler URL for a core base URL, tolerating a
/// missing trailing slash on the configured value.
fn select_url(base: &str) -> Result<Url> {
    let mut base = base.to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    let url = Url::parse(&base)
        .and_then(|u| u.join("select"))
        .with_context(|| format!("Invalid search service URL: {}", base))?;
    Ok(url)
}

/// Parses the standard Solr JSON response envelope:
/// `{"response": {"numFound": N, "start": N, "docs": [...]}}`.
fn parse_select_response(body: &str) -> Result<SearchResults> {
    let value: serde_json::Value =
        serde_json::from_str(body).context("Search service returned invalid JSON")?;

    let response = value
        .get("response")
        .ok_or_else(|| anyhow::anyhow!("Search service response missing 'response' object"))?;

    let num_found = response
        .get("numFound")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| anyhow::anyhow!("Search service response missing 'numFound'"))?;

    let start = response.get("start").and_then(|v| v.as_u64()).unwrap_or(0);

    let docs = match response.get("docs") {
        Some(serde_json::Value::Array(docs)) => docs.clone(),
        _ => Vec::new(),
    };

    Ok(SearchResults {
        num_found,
        start,
        docs,
    })
}
