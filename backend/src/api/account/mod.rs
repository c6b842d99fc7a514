//! Module for account API endpoints.
//!
//! This module handles account creation and credential verification.

pub mod handlers;
pub mod routes;
