use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

impl QaPair {
    /// Builds a pair only when both sides carry text.
    pub fn non_empty(question: &str, answer: &str) -> Option<Self> {
        if question.is_empty() || answer.is_empty() {
            return None;
        }
        Some(QaPair {
            question: question.to_string(),
            answer: answer.to_string(),
        })
    }
}

#[derive(Serialize)]
pub struct RootResponse {
    #[serde(rename = "Hello")]
    pub hello: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}
