use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;

use crate::api::models::ErrorDetail;

pub fn success<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

pub fn error(status: StatusCode, message: String) -> (StatusCode, Json<ErrorDetail>) {
    (status, Json(ErrorDetail { detail: message }))
}
