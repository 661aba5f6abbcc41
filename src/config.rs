use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::error::{AppError, Result};
use crate::parser::ParserKind;

pub const DEFAULT_FIRECRAWL_API_URL: &str = "https://api.firecrawl.dev";
pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo-0125";
pub const DEFAULT_PAIR_KEYS: &[&str] = &["qa_pairs", "pairs"];

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub firecrawl_api_key: String,
    pub firecrawl_api_url: String,
    pub openai_api_key: String,
    pub openai_api_url: String,
    pub openai_model: String,
    pub parser: ParserKind,
    pub pair_keys: Vec<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let firecrawl_api_key = required(&lookup, "FIRECRAWL_API_KEY")?;
        let openai_api_key = required(&lookup, "OPENAI_API_KEY")?;

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("PORT").unwrap_or_else(|| "8000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let parser = match lookup("QA_PARSER") {
            Some(raw) => raw.parse::<ParserKind>()?,
            None => ParserKind::Json,
        };

        let pair_keys = match lookup("QA_PAIR_KEYS") {
            Some(raw) => {
                let keys: Vec<String> = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(String::from)
                    .collect();
                if keys.is_empty() {
                    return Err(AppError::ConfigError("QA_PAIR_KEYS has no keys".to_string()));
                }
                keys
            }
            None => DEFAULT_PAIR_KEYS.iter().map(|k| k.to_string()).collect(),
        };

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            firecrawl_api_key,
            firecrawl_api_url: lookup("FIRECRAWL_API_URL").unwrap_or_else(|| DEFAULT_FIRECRAWL_API_URL.to_string()),
            openai_api_key,
            openai_api_url: lookup("OPENAI_API_URL").unwrap_or_else(|| DEFAULT_OPENAI_API_URL.to_string()),
            openai_model: lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            parser,
            pair_keys,
        })
    }
}

/// Only the scraper credential, for tools that never talk to the model.
pub fn firecrawl_credentials() -> Result<(String, String)> {
    dotenv::dotenv().ok();
    let lookup = |name: &str| env::var(name).ok();
    let key = required(&lookup, "FIRECRAWL_API_KEY")?;
    let url = lookup("FIRECRAWL_API_URL").unwrap_or_else(|| DEFAULT_FIRECRAWL_API_URL.to_string());
    Ok((key, url))
}

fn required<F>(lookup: &F, name: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(AppError::ConfigError(format!("{} is not set", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn loads_defaults_with_both_keys() {
        let config = Config::from_lookup(lookup_from(&[
            ("FIRECRAWL_API_KEY", "fc-key"),
            ("OPENAI_API_KEY", "sk-key"),
        ]))
        .unwrap();

        assert_eq!(config.server_addr, "127.0.0.1:8000".parse().unwrap());
        assert_eq!(config.firecrawl_api_url, DEFAULT_FIRECRAWL_API_URL);
        assert_eq!(config.openai_model, DEFAULT_OPENAI_MODEL);
        assert_eq!(config.parser, ParserKind::Json);
        assert_eq!(config.pair_keys, vec!["qa_pairs", "pairs"]);
    }

    #[test]
    fn missing_scraper_key_is_fatal() {
        let err = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-key")])).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(ref m) if m == "FIRECRAWL_API_KEY is not set"));
    }

    #[test]
    fn empty_model_key_counts_as_missing() {
        let err = Config::from_lookup(lookup_from(&[
            ("FIRECRAWL_API_KEY", "fc-key"),
            ("OPENAI_API_KEY", ""),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::ConfigError(ref m) if m == "OPENAI_API_KEY is not set"));
    }

    #[test]
    fn rejects_bad_port() {
        let err = Config::from_lookup(lookup_from(&[
            ("FIRECRAWL_API_KEY", "fc-key"),
            ("OPENAI_API_KEY", "sk-key"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn reads_parser_selection_and_keys() {
        let config = Config::from_lookup(lookup_from(&[
            ("FIRECRAWL_API_KEY", "fc-key"),
            ("OPENAI_API_KEY", "sk-key"),
            ("QA_PARSER", "lines"),
            ("QA_PAIR_KEYS", " items , ,questions"),
        ]))
        .unwrap();

        assert_eq!(config.parser, ParserKind::Lines);
        assert_eq!(config.pair_keys, vec!["items", "questions"]);
    }
}
