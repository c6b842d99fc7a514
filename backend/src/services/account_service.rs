//! Account business logic service.
//!
//! Handles registration, login and account edits. Each operation returns an
//! `AccountResult`: business failures (taken username, bad credentials,
//! invalid input) come back as `Outcome::Error` values, while faults the
//! caller cannot act on (storage lookups, hashing) surface as `ServiceError`.

use crate::auth::models::{AccountResult, CredentialsRequest};
use crate::auth::password::CredentialHasher;
use crate::database::models::{CreateUser, UpdateUser, User, UserInfo};
use crate::errors::{ServiceError, ServiceResult, validation_message};
use crate::repositories::user_repository::UserStore;
use crate::utils::jwt::JwtUtils;
use std::sync::Arc;
use tracing::{error, info, warn};
use validator::Validate;

pub const USERNAME_TAKEN: &str = "Username is already exist";
pub const INVALID_CREDENTIALS: &str = "User does not exist or Incorrect password.";
pub const USER_NOT_FOUND: &str = "User not found.";

/// Service layer for account operations.
pub struct AccountService {
    store: Arc<dyn UserStore>,
    hasher: Arc<dyn CredentialHasher>,
    jwt_utils: JwtUtils,
}

impl AccountService {
    /// Creates a new AccountService instance.
    ///
    /// # Arguments
    /// * `store` - Credential store
    /// * `hasher` - Password hasher
    /// * `jwt_utils` - Token issuer
    pub fn new(
        store: Arc<dyn UserStore>,
        hasher: Arc<dyn CredentialHasher>,
        jwt_utils: JwtUtils,
    ) -> Self {
        Self {
            store,
            hasher,
            jwt_utils,
        }
    }

    /// Creates a new account.
    ///
    /// # Returns
    /// `Success` with the created account, or `Error` when the input is
    /// invalid, the username is taken, or the insert fails
    ///
    /// # Errors
    /// Returns `ServiceError` if the username lookup or hashing fails
    pub async fn register(&self, request: CredentialsRequest) -> ServiceResult<AccountResult> {
        if let Err(validation_errors) = request.validate() {
            return Ok(AccountResult::error(validation_message(&validation_errors)));
        }

        if self
            .store
            .get_user_by_username(&request.username)
            .await?
            .is_some()
        {
            warn!(username = %request.username, "Registration rejected, username taken");
            return Ok(AccountResult::error(USERNAME_TAKEN));
        }

        let password_hash = self.hash_password(request.password).await?;

        let create_user = CreateUser {
            username: request.username,
            password_hash,
        };

        match self.store.create_user(create_user).await {
            Ok(user) => {
                info!(user_id = user.id, username = %user.username, "Account created");
                Ok(AccountResult::success("User created successfully.")
                    .with_user(UserInfo::from(&user)))
            }
            // Lost a race with a concurrent registration
            Err(ServiceError::AlreadyExists { identifier, .. }) => {
                warn!(username = %identifier, "Registration rejected by unique constraint");
                Ok(AccountResult::error(USERNAME_TAKEN))
            }
            Err(e) => {
                error!("Error creating user: {}", e);
                Ok(AccountResult::error("Error creating user."))
            }
        }
    }

    /// Verifies credentials and issues a signed token.
    ///
    /// Unknown usernames and wrong passwords produce the same message.
    ///
    /// # Errors
    /// Returns `ServiceError` if the lookup, hash verification or signing fails
    pub async fn login(&self, request: CredentialsRequest) -> ServiceResult<AccountResult> {
        if let Err(validation_errors) = request.validate() {
            return Ok(AccountResult::error(validation_message(&validation_errors)));
        }

        let Some(user) = self.store.get_user_by_username(&request.username).await? else {
            warn!(username = %request.username, "Login rejected, unknown user");
            return Ok(AccountResult::error(INVALID_CREDENTIALS));
        };

        if !self
            .verify_password(request.password, user.password_hash.clone())
            .await?
        {
            warn!(user_id = user.id, "Login rejected, incorrect password");
            return Ok(AccountResult::error(INVALID_CREDENTIALS));
        }

        let token = self.jwt_utils.generate_token(&user)?;
        info!(user_id = user.id, "Login successful");

        Ok(AccountResult::success("Login successful").with_token(token))
    }

    /// Changes the username and password of an existing account.
    ///
    /// Keeping the current username is allowed; taking one that belongs to
    /// another account is not.
    ///
    /// # Errors
    /// Returns `ServiceError` if a lookup or hashing fails
    pub async fn edit_account(
        &self,
        id: i64,
        request: CredentialsRequest,
    ) -> ServiceResult<AccountResult> {
        if let Err(validation_errors) = request.validate() {
            return Ok(AccountResult::error(validation_message(&validation_errors)));
        }

        let Some(existing) = self.store.get_user_by_id(id).await? else {
            return Ok(AccountResult::error(USER_NOT_FOUND));
        };

        if let Some(holder) = self.store.get_user_by_username(&request.username).await? {
            if holder.id != existing.id {
                warn!(user_id = id, username = %request.username, "Edit rejected, username taken");
                return Ok(AccountResult::error(USERNAME_TAKEN));
            }
        }

        let password_hash = self.hash_password(request.password).await?;

        let update_user = UpdateUser {
            id: existing.id,
            username: request.username,
            password_hash,
        };

        match self.store.update_user(update_user).await {
            Ok(user) => {
                info!(user_id = user.id, "Account updated");
                Ok(AccountResult::success("User updated successfully.")
                    .with_user(UserInfo::from(&user)))
            }
            Err(ServiceError::AlreadyExists { .. }) => Ok(AccountResult::error(USERNAME_TAKEN)),
            Err(ServiceError::NotFound { .. }) => Ok(AccountResult::error(USER_NOT_FOUND)),
            Err(e) => {
                error!("Error updating user: {}", e);
                Ok(AccountResult::error("Error updating user."))
            }
        }
    }

    pub async fn get_user_by_username(&self, username: &str) -> ServiceResult<Option<User>> {
        self.store.get_user_by_username(username).await
    }

    pub async fn get_user_by_id(&self, id: i64) -> ServiceResult<Option<User>> {
        self.store.get_user_by_id(id).await
    }

    pub fn jwt_utils(&self) -> &JwtUtils {
        &self.jwt_utils
    }

    // bcrypt is deliberately slow; keep it off the async workers
    async fn hash_password(&self, password: String) -> ServiceResult<String> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ServiceError::internal_error(format!("Hashing task failed: {}", e)))?
    }

    async fn verify_password(&self, password: String, hash: String) -> ServiceResult<bool> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| ServiceError::internal_error(format!("Verification task failed: {}", e)))?
    }
}
