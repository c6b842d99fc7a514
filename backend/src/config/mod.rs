//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the database URL, server port, token signing secret and lifetime, and the
//! browser origin allowed to call the API.

use anyhow::{Context, Result, bail, ensure};
use chrono::Duration;
use std::env;

const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;
const MAX_JWT_EXPIRATION_SECONDS: u64 = 100 * 365 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_expires_in: Duration,
    pub bcrypt_cost: u32,
    pub server_port: u16,
    pub cors_origin: String,
}

impl Config {
    /// Loads configuration from environment variables, reading `.env` first.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL not set")?;

        let max_connections = lookup("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|| "5".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid number")?;

        let acquire_timeout_seconds = lookup("DB_ACQUIRE_TIMEOUT_SECONDS")
            .unwrap_or_else(|| "3".to_string())
            .parse::<u64>()
            .context("DB_ACQUIRE_TIMEOUT_SECONDS must be a valid number")?;

        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET not set")?;
        ensure!(!jwt_secret.is_empty(), "JWT_SECRET must not be empty");

        let jwt_expiration = lookup("JWT_EXPIRATION").unwrap_or_else(|| "1h".to_string());
        let jwt_expires_in_seconds = parse_expiration(&jwt_expiration)
            .context("JWT_EXPIRATION must be a duration such as 3600, 30m, 1h or 7d")?;
        ensure!(
            jwt_expires_in_seconds <= MAX_JWT_EXPIRATION_SECONDS,
            "JWT_EXPIRATION must be at most {} seconds",
            MAX_JWT_EXPIRATION_SECONDS
        );
        let jwt_expires_in = Duration::seconds(jwt_expires_in_seconds as i64);

        let bcrypt_cost = lookup("BCRYPT_COST")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u32>()
            .context("BCRYPT_COST must be a valid number")?;
        ensure!(
            (MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost),
            "BCRYPT_COST must be between {} and {}",
            MIN_BCRYPT_COST,
            MAX_BCRYPT_COST
        );

        let server_port = lookup("SERVER_PORT")
            .unwrap_or_else(|| "5000".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid number")?;

        let cors_origin =
            lookup("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string());

        Ok(Config {
            database_url,
            max_connections,
            acquire_timeout_seconds,
            jwt_secret,
            jwt_expires_in,
            bcrypt_cost,
            server_port,
            cors_origin,
        })
    }
}

/// Parses a token lifetime such as `3600`, `90s`, `30m`, `1h`, `2 days`
/// into seconds. A bare number is taken as seconds.
pub fn parse_expiration(value: &str) -> Result<u64> {
    let value = value.trim();
    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (amount, unit) = value.split_at(split);

    let amount = amount
        .parse::<u64>()
        .with_context(|| format!("invalid expiration '{}'", value))?;

    let multiplier: u64 = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "s" | "sec" | "secs" | "second" | "seconds" => 1,
        "m" | "min" | "mins" | "minute" | "minutes" => 60,
        "h" | "hr" | "hrs" | "hour" | "hours" => 60 * 60,
        "d" | "day" | "days" => 24 * 60 * 60,
        "w" | "week" | "weeks" => 7 * 24 * 60 * 60,
        other => bail!("unknown expiration unit '{}'", other),
    };

    ensure!(amount > 0, "expiration must be greater than zero");

    amount
        .checked_mul(multiplier)
        .with_context(|| format!("expiration '{}' is too large", value))
}
