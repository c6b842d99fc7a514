//! Central module for organizing the application's API endpoints.
//!
//! Assembles the account routes under the shared `/api` prefix, the root
//! information route, and the cross-origin policy for the browser client.

pub mod account;
pub mod common;

use crate::api::common::ApiResponse;
use crate::services::account_service::AccountService;
use anyhow::{Context, Result};
use axum::{
    Extension, Router,
    http::HeaderValue,
    response::Json,
    routing::get,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Builds the application router around an injected account service.
pub fn router(service: Arc<AccountService>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .nest("/api", account::routes::account_router())
        .layer(Extension(service))
}

/// CORS policy allowing one origin, or any origin for `*`.
pub fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let layer = if origin.trim() == "*" {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origin = origin
            .trim()
            .parse::<HeaderValue>()
            .with_context(|| format!("CORS_ORIGIN '{}' is not a valid header value", origin))?;
        CorsLayer::new().allow_origin(origin)
    };

    Ok(layer.allow_methods(Any).allow_headers(Any))
}

async fn root_handler() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(serde_json::json!({
        "service": "Account authentication service",
        "version": env!("CARGO_PKG_VERSION")
    })))
}
