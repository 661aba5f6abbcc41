use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::client;
use crate::error::{AppError, Result};

pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that generates questions and answers based on given content.";

const JSON_INSTRUCTION: &str = " Respond with a JSON object containing a \"qa_pairs\" array, \
where each element is an object with a \"question\" string and an \"answer\" string.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    JsonObject,
}

pub fn system_prompt(format: ResponseFormat) -> String {
    match format {
        ResponseFormat::Text => SYSTEM_PROMPT.to_string(),
        ResponseFormat::JsonObject => format!("{}{}", SYSTEM_PROMPT, JSON_INSTRUCTION),
    }
}

/// The scraped content goes in verbatim, however long it is.
pub fn build_prompt(content: &str) -> String {
    let mut result = String::with_capacity(content.len() + 80);
    result.push_str("Generate 5 question-answer pairs based on the following content:\n\n");
    result.push_str(content);
    result
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str, format: ResponseFormat) -> Result<String>;
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormatParam {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormatParam>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_client(client::shared(), api_key, base_url, model)
    }

    pub fn with_client(
        client: Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str, format: ResponseFormat) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: system_prompt,
                },
                Message {
                    role: "user",
                    content: user_prompt,
                },
            ],
            response_format: match format {
                ResponseFormat::Text => None,
                ResponseFormat::JsonObject => Some(ResponseFormatParam { kind: "json_object" }),
            },
        };

        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(AppError::CollaboratorError(format!(
                "OpenAI request failed with status {}: {}",
                status,
                client::error_message(&text)
            )));
        }

        let reply: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| AppError::CollaboratorError(format!("Unexpected OpenAI response: {}", e)))?;

        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| AppError::CollaboratorError("Invalid response format from LLM".to_string()))
    }
}
