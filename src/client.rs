use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};

// One pooled client shared by every collaborator. No request timeout is set,
// so a stalled upstream stalls only the request waiting on it.
static CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build HTTP client")
});

pub fn shared() -> Client {
    CLIENT.clone()
}

/// Pulls a human-readable message out of an upstream error body.
///
/// Firecrawl answers `{"error": "..."}`, OpenAI answers
/// `{"error": {"message": "..."}}`; anything else is returned as text.
pub(crate) fn error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(|json| {
        let error = json.get("error")?;
        error
            .as_str()
            .or_else(|| error.get("message").and_then(|m| m.as_str()))
            .map(String::from)
    });
    message.unwrap_or_else(|| body.trim().to_string())
}
