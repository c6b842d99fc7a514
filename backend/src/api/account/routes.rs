//! Defines the HTTP routes for account registration and login.

use super::handlers::{login, register};
use axum::{Router, routing::post};

pub fn account_router() -> Router {
    Router::new()
        .route("/Account/Register", post(register))
        .route("/Account/Login", post(login))
}
