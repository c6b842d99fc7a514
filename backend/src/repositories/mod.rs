//! Data access layer.
//!
//! Repositories wrap the SQL for each table and expose it through the traits
//! the services are constructed with.

pub mod user_repository;
