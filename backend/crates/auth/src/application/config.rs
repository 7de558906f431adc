//! Application Configuration
//!
//! Configuration for the Auth application layer. Built by the binary from
//! its environment and passed in explicitly.

use std::fmt;
use std::time::Duration;

use kernel::request::DEFAULT_REQUEST_TIMEOUT;
use platform::password::HashCost;

/// Default token lifetime (24 hours)
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 3600);

/// Default `iss` claim
pub const DEFAULT_ISSUER: &str = "hermes-api";

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC key for signing tokens
    pub jwt_secret: String,
    /// Token validity window
    pub token_ttl: Duration,
    /// `iss` claim, checked on verification
    pub issuer: String,
    /// Clock skew tolerated on `exp`/`nbf`, in seconds
    pub leeway_secs: u64,
    /// Argon2id parameters for new hashes
    pub hash_cost: HashCost,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Budget for each request's store calls
    pub request_timeout: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: platform::crypto::random_secret(32),
            token_ttl: DEFAULT_TOKEN_TTL,
            issuer: DEFAULT_ISSUER.to_string(),
            leeway_secs: 0,
            hash_cost: HashCost::default(),
            password_pepper: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl AuthConfig {
    /// Config with the given signing secret, defaults elsewhere
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: secret.into(),
            ..Default::default()
        }
    }

    /// Create config for development (random secret, cheaper hashing)
    pub fn development() -> Self {
        Self {
            hash_cost: HashCost::new(4096, 1, 1),
            ..Default::default()
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Token lifetime as a chrono duration, saturating at `chrono::Duration::MAX`
    pub fn token_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.token_ttl).unwrap_or(chrono::Duration::MAX)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .field("issuer", &self.issuer)
            .field("leeway_secs", &self.leeway_secs)
            .field("hash_cost", &self.hash_cost)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
