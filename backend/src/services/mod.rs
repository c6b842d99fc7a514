//! Module for core business logic services.
//!
//! This module encapsulates services that perform specific business operations
//! and orchestrate interactions between the credential store, the password
//! hasher and the token issuer.

pub mod account_service;
