//! Data structures for authentication-related requests and results.
//!
//! This module defines the credential payload accepted by the account
//! endpoints, the uniform result returned by the account service, and the
//! response bodies placed inside the `data` envelope.

use crate::auth::password::MAX_PASSWORD_BYTES;
use crate::database::models::UserInfo;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Registration and login request payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[serde(rename = "Username", default)]
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[serde(rename = "Password", default)]
    #[validate(
        length(min = 1, message = "Password is required"),
        custom(function = "validate_password_bytes")
    )]
    pub password: String,
}

fn validate_password_bytes(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::new("password_too_long")
            .with_message("Password must be at most 72 bytes".into()));
    }
    Ok(())
}

impl CredentialsRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Success,
    Error,
}

/// Result of an account operation. Business failures are carried here
/// rather than as errors.
#[derive(Debug, Clone)]
pub struct AccountResult {
    pub outcome: Outcome,
    pub message: String,
    pub token: Option<String>,
    pub user: Option<UserInfo>,
}

impl AccountResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Success,
            message: message.into(),
            token: None,
            user: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Error,
            message: message.into(),
            token: None,
            user: None,
        }
    }

    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_user(mut self, user: UserInfo) -> Self {
        self.user = Some(user);
        self
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }
}

/// Body of a successful registration
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: Option<UserInfo>,
}

/// Body of a successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}
