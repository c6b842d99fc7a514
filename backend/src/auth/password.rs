//! Password hashing and verification.

use crate::errors::{ServiceError, ServiceResult};
use bcrypt::BcryptError;

/// Longest password bcrypt can hash without dropping bytes.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// One-way password transform used by the account service.
pub trait CredentialHasher: Send + Sync {
    /// Hashes a plaintext password with a fresh random salt.
    fn hash(&self, password: &str) -> ServiceResult<String>;

    /// Checks a plaintext candidate against a stored hash.
    ///
    /// # Errors
    /// Returns `ServiceError` if the stored hash is malformed
    fn verify(&self, password: &str, hash: &str) -> ServiceResult<bool>;
}

/// bcrypt with a configurable work factor.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl CredentialHasher for BcryptHasher {
    fn hash(&self, password: &str) -> ServiceResult<String> {
        bcrypt::non_truncating_hash(password, self.cost).map_err(|e| match e {
            BcryptError::Truncation(len) => ServiceError::validation(format!(
                "Password is {} bytes, at most {} are allowed",
                len, MAX_PASSWORD_BYTES
            )),
            e => ServiceError::internal_error(format!("Password hashing failed: {}", e)),
        })
    }

    fn verify(&self, password: &str, hash: &str) -> ServiceResult<bool> {
        match bcrypt::non_truncating_verify(password, hash) {
            // No stored hash can come from a password this long
            Err(BcryptError::Truncation(_)) => Ok(false),
            result => result.map_err(|e| {
                ServiceError::internal_error(format!("Password verification failed: {}", e))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> BcryptHasher {
        BcryptHasher::new(4)
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hasher = hasher();
        let hash = hasher.hash("s3cret").unwrap();

        assert!(hasher.verify("s3cret", &hash).unwrap());
        assert!(!hasher.verify("wrong", &hash).unwrap());
        assert!(!hasher.verify("", &hash).unwrap());
    }

    #[test]
    fn test_same_password_produces_different_hashes() {
        let hasher = hasher();
        let first = hasher.hash("s3cret").unwrap();
        let second = hasher.hash("s3cret").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("s3cret", &first).unwrap());
        assert!(hasher.verify("s3cret", &second).unwrap());
    }

    #[test]
    fn test_hash_never_contains_plaintext() {
        let hash = hasher().hash("plaintext-password").unwrap();
        assert!(!hash.is_empty());
        assert!(!hash.contains("plaintext-password"));
    }

    #[test]
    fn test_hash_records_cost() {
        let hash = hasher().hash("s3cret").unwrap();
        assert!(hash.starts_with("$2b$04$"));
    }

    #[test]
    fn test_shared_72_byte_prefix_does_not_verify() {
        let hasher = hasher();
        let prefix = "a".repeat(MAX_PASSWORD_BYTES);
        let hash = hasher.hash(&prefix).unwrap();

        assert!(hasher.verify(&prefix, &hash).unwrap());
        assert!(!hasher.verify(&format!("{}X", prefix), &hash).unwrap());
        assert!(!hasher.verify(&format!("{}Y-totally-different", prefix), &hash).unwrap());
    }

    #[test]
    fn test_overlong_password_is_not_hashed() {
        let result = hasher().hash(&"a".repeat(MAX_PASSWORD_BYTES + 1));
        assert!(matches!(result, Err(ServiceError::Validation { .. })));
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(hasher().verify("s3cret", "not-a-bcrypt-hash").is_err());
    }
}
