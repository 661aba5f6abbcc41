//! Test doubles and a throwaway HTTP server for exercising the clients.

use std::sync::Mutex;

use async_trait::async_trait;
use axum::Router;
use serde_json::{Map, Value};
use tokio::net::TcpListener;

use crate::error::{AppError, Result};
use crate::llm::{LanguageModel, ResponseFormat};
use crate::scraper::{Format, ScrapeResult, Scraper};

pub enum StubScraper {
    Content(Map<String, Value>),
    Fails(String),
}

impl StubScraper {
    pub fn markdown(text: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("markdown".to_string(), Value::String(text.to_string()));
        StubScraper::Content(fields)
    }

    pub fn empty() -> Self {
        StubScraper::Content(Map::new())
    }

    pub fn failing(message: &str) -> Self {
        StubScraper::Fails(message.to_string())
    }
}

#[async_trait]
impl Scraper for StubScraper {
    async fn scrape(&self, _url: &str, _formats: &[Format]) -> Result<ScrapeResult> {
        match self {
            StubScraper::Content(fields) => Ok(ScrapeResult::new(fields.clone())),
            StubScraper::Fails(message) => Err(AppError::CollaboratorError(message.clone())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelCall {
    pub system_prompt: String,
    pub user_prompt: String,
    pub format: ResponseFormat,
}

pub struct StubModel {
    reply: std::result::Result<String, String>,
    calls: Mutex<Vec<ModelCall>>,
}

impl StubModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn last_call(&self) -> Option<ModelCall> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LanguageModel for StubModel {
    async fn complete(&self, system_prompt: &str, user_prompt: &str, format: ResponseFormat) -> Result<String> {
        self.calls.lock().unwrap().push(ModelCall {
            system_prompt: system_prompt.to_string(),
            user_prompt: user_prompt.to_string(),
            format,
        });
        self.reply.clone().map_err(AppError::CollaboratorError)
    }
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A client bound to the current test runtime, ignoring any proxy settings.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
