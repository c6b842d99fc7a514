//! Handler functions for account API endpoints.
//!
//! These functions parse the credential payload, hand it to the
//! `AccountService`, and shape the result into the response envelope.

use crate::api::common::{HandlerResult, send_error, send_success};
use crate::auth::models::{CredentialsRequest, LoginResponse, Outcome, RegisterResponse};
use crate::services::account_service::AccountService;
use axum::extract::{Extension, Json, rejection::JsonRejection};
use std::sync::Arc;
use tracing::{error, warn};

const REGISTERED: &str = "User created successfully";
const SIGN_UP_FAILED: &str = "An error occurred during sign-up";
const SIGN_IN_FAILED: &str = "An error occurred during sign-in";

/// Handle account registration request
#[axum::debug_handler]
pub async fn register(
    Extension(service): Extension<Arc<AccountService>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> HandlerResult<RegisterResponse> {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("Rejected registration body: {}", rejection.body_text());
            return send_error(rejection.body_text());
        }
    };

    match service.register(request).await {
        Ok(result) => match result.outcome {
            Outcome::Success => send_success(RegisterResponse {
                message: REGISTERED.to_string(),
                user: result.user,
            }),
            Outcome::Error => send_error(result.message),
        },
        Err(e) => {
            error!("Registration failed: {}", e);
            send_error(SIGN_UP_FAILED)
        }
    }
}

/// Handle login request
#[axum::debug_handler]
pub async fn login(
    Extension(service): Extension<Arc<AccountService>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> HandlerResult<LoginResponse> {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("Rejected login body: {}", rejection.body_text());
            return send_error(rejection.body_text());
        }
    };

    match service.login(request).await {
        Ok(result) => match (result.outcome, result.token) {
            (Outcome::Success, Some(token)) => send_success(LoginResponse {
                message: result.message,
                token,
            }),
            (Outcome::Success, None) => {
                error!("Login succeeded without a token");
                send_error(SIGN_IN_FAILED)
            }
            (Outcome::Error, _) => send_error(result.message),
        },
        Err(e) => {
            error!("Login failed: {}", e);
            send_error(SIGN_IN_FAILED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{REGISTERED, SIGN_IN_FAILED, SIGN_UP_FAILED};
    use crate::api::router;
    use crate::services::account_service::tests::{
        BrokenStore, TEST_SECRET, service_with, test_service,
    };
    use crate::services::account_service::{INVALID_CREDENTIALS, USERNAME_TAKEN};
    use crate::utils::jwt::JwtUtils;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::Duration;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn app() -> Router {
        let (service, _pool) = test_service().await;
        router(Arc::new(service))
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn credentials(username: &str, password: &str) -> Value {
        json!({ "Username": username, "Password": password })
    }

    #[tokio::test]
    async fn test_register_returns_data_envelope() {
        let app = app().await;

        let (status, body) = send(
            &app,
            json_request("/api/Account/Register", credentials("alice", "s3cret")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["message"], REGISTERED);
        assert_eq!(body["data"]["user"]["username"], "alice");
        assert!(body["data"]["user"]["id"].is_i64());
        assert!(body["data"]["user"].get("password_hash").is_none());
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_register_duplicate_is_400() {
        let app = app().await;
        send(
            &app,
            json_request("/api/Account/Register", credentials("alice", "s3cret")),
        )
        .await;

        let (status, body) = send(
            &app,
            json_request("/api/Account/Register", credentials("alice", "other")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": USERNAME_TAKEN }));
    }

    #[tokio::test]
    async fn test_login_returns_token() {
        let app = app().await;
        send(
            &app,
            json_request("/api/Account/Register", credentials("alice", "s3cret")),
        )
        .await;

        let (status, body) = send(
            &app,
            json_request("/api/Account/Login", credentials("alice", "s3cret")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["message"], "Login successful");

        let token = body["data"]["token"].as_str().unwrap();
        let claims = JwtUtils::new(TEST_SECRET, Duration::hours(1))
            .validate_token(token)
            .unwrap();
        assert_eq!(claims.username, "alice");
    }

    #[tokio::test]
    async fn test_login_failures_share_one_message() {
        let app = app().await;
        send(
            &app,
            json_request("/api/Account/Register", credentials("alice", "s3cret")),
        )
        .await;

        let (status, wrong_password) = send(
            &app,
            json_request("/api/Account/Login", credentials("alice", "wrong")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(wrong_password, json!({ "error": INVALID_CREDENTIALS }));

        let (status, unknown_user) = send(
            &app,
            json_request("/api/Account/Login", credentials("ghost", "s3cret")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(unknown_user, wrong_password);
    }

    #[tokio::test]
    async fn test_storage_fault_is_generic_400() {
        let app = router(Arc::new(service_with(Arc::new(BrokenStore))));

        // lookups for this username fail in the broken store
        let (status, body) = send(
            &app,
            json_request("/api/Account/Register", credentials("reader", "s3cret")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": SIGN_UP_FAILED }));

        let (status, body) = send(
            &app,
            json_request("/api/Account/Login", credentials("reader", "s3cret")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": SIGN_IN_FAILED }));
    }

    #[tokio::test]
    async fn test_missing_fields_are_400() {
        let app = app().await;

        let (status, body) = send(
            &app,
            json_request("/api/Account/Register", json!({ "Username": "alice" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Password is required" }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_400_envelope() {
        let app = app().await;

        let request = Request::builder()
            .method("POST")
            .uri("/api/Account/Login")
            .header("Content-Type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn test_missing_content_type_is_400_envelope() {
        let app = app().await;

        let request = Request::builder()
            .method("POST")
            .uri("/api/Account/Register")
            .body(Body::from(credentials("alice", "s3cret").to_string()))
            .unwrap();
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}
