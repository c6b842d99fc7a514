//! Authentication building blocks.
//!
//! Credential payloads, the account result shape, and password hashing used
//! by the account service.

pub mod models;
pub mod password;
