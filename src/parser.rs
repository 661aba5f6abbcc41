//! Strategies for turning a model reply into question/answer pairs.
//!
//! Two reply contracts exist and they are not compatible with each other:
//! a JSON object carrying a list of `{question, answer}` objects, and the
//! older plain-text contract where lines alternate question and answer.
//! Exactly one is active per process, chosen by [`ParserKind`].

use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;

use crate::api::models::QaPair;
use crate::config::DEFAULT_PAIR_KEYS;
use crate::error::{AppError, Result};
use crate::llm::ResponseFormat;

pub trait ReplyParser: Send + Sync {
    /// The reply shape this strategy needs the model to produce.
    fn response_format(&self) -> ResponseFormat;

    fn parse(&self, raw: &str) -> Result<Vec<QaPair>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserKind {
    Json,
    Lines,
}

impl ParserKind {
    pub fn build(self, pair_keys: &[String]) -> Arc<dyn ReplyParser> {
        match self {
            ParserKind::Json => Arc::new(JsonPairsParser::new(pair_keys.to_vec())),
            ParserKind::Lines => Arc::new(LinePairsParser),
        }
    }
}

impl FromStr for ParserKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ParserKind::Json),
            "lines" => Ok(ParserKind::Lines),
            other => Err(AppError::ConfigError(format!(
                "Unknown QA_PARSER '{}', expected 'json' or 'lines'",
                other
            ))),
        }
    }
}

/// Reads pairs out of a JSON reply.
///
/// The list is located by trying each of `keys` in order, then falling back
/// to the first value of the object. A top-level array is used as is.
#[derive(Debug, Clone)]
pub struct JsonPairsParser {
    keys: Vec<String>,
}

impl JsonPairsParser {
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys }
    }

    fn candidates(&self, value: Value) -> Result<Vec<Value>> {
        let list = match value {
            Value::Array(items) => return Ok(items),
            Value::Object(mut map) => {
                let key = self
                    .keys
                    .iter()
                    .find(|k| map.get(k.as_str()).is_some_and(|v| !v.is_null()))
                    .cloned()
                    .or_else(|| map.keys().next().cloned())
                    .ok_or_else(|| {
                        AppError::ParseError("Model reply is an empty JSON object".to_string())
                    })?;
                map.remove(&key).unwrap_or(Value::Null)
            }
            other => {
                return Err(AppError::ParseError(format!(
                    "Model reply is a JSON {}, expected an object or array",
                    kind_of(&other)
                )))
            }
        };

        match list {
            Value::Array(items) => Ok(items),
            // Iterating these yields no objects, so nothing survives the filter.
            Value::Object(_) | Value::String(_) => Ok(Vec::new()),
            other => Err(AppError::ParseError(format!(
                "Q&A candidates are a JSON {}, which is not a sequence",
                kind_of(&other)
            ))),
        }
    }
}

impl Default for JsonPairsParser {
    fn default() -> Self {
        Self::new(DEFAULT_PAIR_KEYS.iter().map(|k| k.to_string()).collect())
    }
}

impl ReplyParser for JsonPairsParser {
    fn response_format(&self) -> ResponseFormat {
        ResponseFormat::JsonObject
    }

    fn parse(&self, raw: &str) -> Result<Vec<QaPair>> {
        let value: Value = serde_json::from_str(raw)?;

        let pairs = self
            .candidates(value)?
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|entry| {
                let question = entry.get("question").and_then(Value::as_str).unwrap_or("");
                let answer = entry.get("answer").and_then(Value::as_str).unwrap_or("");
                QaPair::non_empty(question, answer)
            })
            .collect();

        Ok(pairs)
    }
}

/// Legacy contract: the reply is plain text, one question line followed by
/// one answer line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinePairsParser;

impl ReplyParser for LinePairsParser {
    fn response_format(&self) -> ResponseFormat {
        ResponseFormat::Text
    }

    fn parse(&self, raw: &str) -> Result<Vec<QaPair>> {
        let lines: Vec<&str> = raw.trim().split('\n').collect();

        // An odd trailing line has no partner and is dropped.
        let pairs = lines
            .chunks_exact(2)
            .filter_map(|chunk| QaPair::non_empty(chunk[0].trim(), chunk[1].trim()))
            .collect();

        Ok(pairs)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
