//! JWT token utilities for authentication.
//!
//! Provides token creation and validation for accounts that have proven
//! their credentials. Tokens are self-describing and stateless; nothing is
//! stored server-side and there is no revocation.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::database::models::User;
use crate::errors::{ServiceError, ServiceResult};

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID
    pub sub: i64,
    /// Username at the time of issue
    pub username: String,
    /// Token expiration timestamp
    pub exp: usize,
    /// Token issued at timestamp
    pub iat: usize,
}

/// JWT token utility for creating and validating tokens
pub struct JwtUtils {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expires_in: Duration,
}

impl JwtUtils {
    /// Create a new JwtUtils instance signing with `secret`
    pub fn new(secret: &str, expires_in: Duration) -> Self {
        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        JwtUtils {
            encoding_key,
            decoding_key,
            validation,
            expires_in,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.jwt_secret, config.jwt_expires_in)
    }

    /// Generate a signed token for the given account
    pub fn generate_token(&self, user: &User) -> ServiceResult<String> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(self.expires_in)
            .ok_or_else(|| ServiceError::internal_error("Token expiry out of range"))?;

        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::internal_error(format!("Token generation failed: {}", e)))
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> ServiceResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| ServiceError::validation(format!("Token validation failed: {}", e)))
    }
}

impl Claims {
    pub fn user_id(&self) -> i64 {
        self.sub
    }

    /// Check if token has expired
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as usize;
        now > self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: 7,
            username: "alice".to_string(),
            password_hash: "hash".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_token_carries_subject_and_username() {
        let jwt = JwtUtils::new("test-secret", Duration::hours(1));
        let token = jwt.generate_token(&user()).unwrap();

        let claims = jwt.validate_token(&token).unwrap();
        assert_eq!(claims.user_id(), 7);
        assert_eq!(claims.username, "alice");
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_expiry_follows_configuration() {
        let jwt = JwtUtils::new("test-secret", Duration::minutes(30));
        let token = jwt.generate_token(&user()).unwrap();

        let claims = jwt.validate_token(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 1800);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = JwtUtils::new("secret-one", Duration::hours(1));
        let verifier = JwtUtils::new("secret-two", Duration::hours(1));
        let token = issuer.generate_token(&user()).unwrap();

        assert!(verifier.validate_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let jwt = JwtUtils::new("test-secret", Duration::hours(1));
        let past = Utc::now() - Duration::hours(2);
        let claims = Claims {
            sub: 7,
            username: "alice".to_string(),
            exp: (past + Duration::minutes(5)).timestamp() as usize,
            iat: past.timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &jwt.encoding_key).unwrap();

        assert!(claims.is_expired());
        assert!(jwt.validate_token(&token).is_err());
    }

    #[test]
    fn test_longest_configurable_expiry_still_signs() {
        let config = Config::from_lookup(|key: &str| match key {
            "DATABASE_URL" => Some("sqlite::memory:".to_string()),
            "JWT_SECRET" => Some("test-secret".to_string()),
            "JWT_EXPIRATION" => Some("5200w".to_string()),
            _ => None,
        })
        .unwrap();

        let jwt = JwtUtils::from_config(&config);
        let claims = jwt.validate_token(&jwt.generate_token(&user()).unwrap()).unwrap();
        assert_eq!(claims.exp - claims.iat, 5200 * 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let jwt = JwtUtils::new("test-secret", Duration::hours(1));
        let mut token = jwt.generate_token(&user()).unwrap();
        token.push('x');

        assert!(jwt.validate_token(&token).is_err());
    }
}
