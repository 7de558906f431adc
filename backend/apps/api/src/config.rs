//! Server configuration from the environment

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::AuthConfig;
use auth::config::{DEFAULT_ISSUER, DEFAULT_TOKEN_TTL};
use kernel::request::DEFAULT_REQUEST_TIMEOUT;
use platform::password::HashCost;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// Upper bound for every duration read from the environment (one year)
const MAX_DURATION_SECS: u64 = 365 * 24 * 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Read every setting. Call after `dotenvy::dotenv()`.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let frontend_origins = optional("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            database_url,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 5)?,
            bind_addr: parse_or("BIND_ADDR", DEFAULT_BIND_ADDR.parse()?)?,
            frontend_origins,
            auth: auth_config()?,
        })
    }
}

/// `LOG_FORMAT=json` selects JSON lines; anything else is human-readable
pub fn log_format() -> LogFormat {
    LogFormat::parse(optional("LOG_FORMAT").as_deref())
}

impl LogFormat {
    fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

fn auth_config() -> anyhow::Result<AuthConfig> {
    let jwt_secret = match optional("JWT_SECRET") {
        Some(secret) => secret,
        None if cfg!(debug_assertions) => {
            tracing::warn!("JWT_SECRET not set, using a random development secret");
            platform::crypto::random_secret(32)
        }
        None => bail!("JWT_SECRET must be set in production"),
    };

    let defaults = HashCost::default();
    let hash_cost = HashCost::new(
        parse_or("ARGON2_MEMORY_KIB", defaults.memory_kib)?,
        parse_or("ARGON2_ITERATIONS", defaults.iterations)?,
        parse_or("ARGON2_PARALLELISM", defaults.parallelism)?,
    );

    Ok(AuthConfig {
        jwt_secret,
        token_ttl: duration_secs("JWT_TTL_SECS", DEFAULT_TOKEN_TTL)?,
        issuer: optional("JWT_ISSUER").unwrap_or_else(|| DEFAULT_ISSUER.to_string()),
        leeway_secs: 0,
        hash_cost,
        password_pepper: optional("PASSWORD_PEPPER").map(String::into_bytes),
        request_timeout: duration_secs("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT)?,
    })
}

/// Unset and blank are the same
fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        None => Ok(default),
    }
}

/// Whole seconds from `key`, between 1 second and one year
fn duration_secs(key: &str, default: Duration) -> anyhow::Result<Duration> {
    bounded_secs(key, parse_or(key, default.as_secs())?)
}

fn bounded_secs(key: &str, secs: u64) -> anyhow::Result<Duration> {
    if secs == 0 || secs > MAX_DURATION_SECS {
        bail!("{key} must be between 1 and {MAX_DURATION_SECS} seconds, got {secs}");
    }
    Ok(Duration::from_secs(secs))
}
