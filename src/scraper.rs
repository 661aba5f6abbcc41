//! Firecrawl collaborator: single-page scrape and multi-page crawl.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::client;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Format {
    Markdown,
    Html,
    RawHtml,
    Links,
    Screenshot,
}

/// Scraped content keyed by format name, plus whatever else the scraper sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScrapeResult {
    fields: Map<String, Value>,
}

impl ScrapeResult {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn markdown(&self) -> &str {
        self.get("markdown").and_then(Value::as_str).unwrap_or("")
    }
}

#[async_trait]
pub trait Scraper: Send + Sync {
    async fn scrape(&self, url: &str, formats: &[Format]) -> Result<ScrapeResult>;
}

#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub limit: usize,
    pub formats: Vec<Format>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            limit: 100,
            formats: vec![Format::Markdown, Format::Html],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlStatus {
    pub status: String,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub completed: u64,
    #[serde(default)]
    pub credits_used: u64,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default)]
    pub data: Vec<ScrapeResult>,
}

impl CrawlStatus {
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }

    pub fn is_terminal_failure(&self) -> bool {
        matches!(self.status.as_str(), "failed" | "cancelled")
    }
}

#[derive(Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: &'a [Format],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CrawlRequest<'a> {
    url: &'a str,
    limit: usize,
    scrape_options: ScrapeOptions<'a>,
}

#[derive(Serialize)]
struct ScrapeOptions<'a> {
    formats: &'a [Format],
}

#[derive(Deserialize)]
struct ScrapeEnvelope {
    #[serde(default)]
    success: bool,
    data: Option<ScrapeResult>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct CrawlStarted {
    #[serde(default)]
    success: bool,
    id: Option<String>,
    error: Option<String>,
}

pub struct FirecrawlClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FirecrawlClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::with_client(client::shared(), api_key, base_url)
    }

    pub fn with_client(client: Client, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let res = request.bearer_auth(&self.api_key).send().await?;
        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(AppError::CollaboratorError(format!(
                "Firecrawl request failed with status {}: {}",
                status,
                client::error_message(&body)
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| AppError::CollaboratorError(format!("Unexpected Firecrawl response: {}", e)))
    }

    /// Starts a crawl job and returns its id.
    pub async fn start_crawl(&self, url: &str, options: &CrawlOptions) -> Result<String> {
        let body = CrawlRequest {
            url,
            limit: options.limit,
            scrape_options: ScrapeOptions {
                formats: &options.formats,
            },
        };
        let request = self
            .client
            .post(format!("{}/v1/crawl", self.base_url))
            .json(&body);
        let started: CrawlStarted = self.send(request).await?;

        match started.id {
            Some(id) if started.success => Ok(id),
            _ => Err(AppError::CollaboratorError(format!(
                "Firecrawl did not start the crawl: {}",
                started.error.unwrap_or_else(|| "no job id returned".to_string())
            ))),
        }
    }

    pub async fn crawl_status(&self, id: &str) -> Result<CrawlStatus> {
        let request = self.client.get(format!("{}/v1/crawl/{}", self.base_url, id));
        self.send(request).await
    }

    /// Runs a crawl to completion, polling every `poll_interval`.
    pub async fn crawl(&self, url: &str, options: &CrawlOptions, poll_interval: Duration) -> Result<CrawlStatus> {
        let id = self.start_crawl(url, options).await?;
        info!(%id, "Firecrawl crawl started");

        loop {
            let status = self.crawl_status(&id).await?;
            if status.is_completed() {
                info!(%id, pages = status.completed, "Firecrawl crawl completed");
                return self.collect_pages(status).await;
            }
            if status.is_terminal_failure() {
                return Err(AppError::CollaboratorError(format!(
                    "Firecrawl crawl {} ended with status '{}'",
                    id, status.status
                )));
            }
            debug!(%id, completed = status.completed, total = status.total, "Crawl in progress");
            tokio::time::sleep(poll_interval).await;
        }
    }

    // Large crawls are paginated through `next` links.
    async fn collect_pages(&self, mut status: CrawlStatus) -> Result<CrawlStatus> {
        while let Some(next) = status.next.take() {
            let page: CrawlStatus = self.send(self.client.get(&next)).await?;
            status.data.extend(page.data);
            status.next = page.next;
        }
        Ok(status)
    }
}

#[async_trait]
impl Scraper for FirecrawlClient {
    async fn scrape(&self, url: &str, formats: &[Format]) -> Result<ScrapeResult> {
        let request = self
            .client
            .post(format!("{}/v1/scrape", self.base_url))
            .json(&ScrapeRequest { url, formats });
        let envelope: ScrapeEnvelope = self.send(request).await?;

        if !envelope.success {
            return Err(AppError::CollaboratorError(format!(
                "Firecrawl scrape failed: {}",
                envelope.error.unwrap_or_else(|| "unknown error".to_string())
            )));
        }
        envelope
            .data
            .ok_or_else(|| AppError::CollaboratorError("Firecrawl returned no data".to_string()))
    }
}
