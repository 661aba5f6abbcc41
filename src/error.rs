use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};

use crate::api::response;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Collaborator error: {0}")]
    CollaboratorError(String),

    #[error("Error parsing model reply: {0}")]
    ParseError(String),
}

impl AppError {
    /// The raw message, without the kind prefix. This is what callers see.
    pub fn detail(&self) -> &str {
        match self {
            AppError::ConfigError(msg)
            | AppError::CollaboratorError(msg)
            | AppError::ParseError(msg) => msg,
        }
    }

    pub fn status(&self) -> StatusCode {
        // Every kind surfaces as a 500; the kinds only matter internally.
        match self {
            AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::CollaboratorError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ParseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        response::error(status, self.detail().to_string()).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::CollaboratorError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
