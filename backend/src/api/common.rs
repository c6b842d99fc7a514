//! Response envelope shared by all API handlers.
//!
//! Successful requests answer `200` with `{ "data": ... }`; every failure,
//! whatever its cause, answers `400` with `{ "error": "<message>" }`.

use axum::{http::StatusCode, response::Json as ResponseJson};
use serde::Serialize;

/// Standard API response wrapper for all endpoints
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable message (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub type ErrorResponse = (StatusCode, ResponseJson<ApiResponse<()>>);

pub type HandlerResult<T> = Result<ResponseJson<ApiResponse<T>>, ErrorResponse>;

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
        }
    }
}

/// 200 with the data envelope
pub fn send_success<T>(data: T) -> HandlerResult<T> {
    Ok(ResponseJson(ApiResponse::success(data)))
}

/// 400 with the error envelope
pub fn send_error<T>(message: impl Into<String>) -> HandlerResult<T> {
    Err((
        StatusCode::BAD_REQUEST,
        ResponseJson(ApiResponse::error(message)),
    ))
}
