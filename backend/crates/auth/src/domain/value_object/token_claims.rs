//! Access Token Claims
//!
//! Payload of the signed bearer token. Timestamps are Unix seconds.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;
use crate::domain::value_object::user_id::UserId;
use crate::error::TokenRejection;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id
    pub sub: String,
    pub email: String,
    pub username: String,
    /// Issued at
    pub iat: i64,
    /// Not before
    pub nbf: i64,
    /// Expires at
    pub exp: i64,
    /// Issuer
    pub iss: String,
}

impl TokenClaims {
    /// Claims for `user`, valid from `issued_at` for `ttl`
    ///
    /// `None` when the expiry falls outside the representable date range.
    pub fn for_user(
        user: &User,
        issued_at: DateTime<Utc>,
        ttl: Duration,
        issuer: &str,
    ) -> Option<Self> {
        let iat = issued_at.timestamp();
        let exp = issued_at.checked_add_signed(ttl)?.timestamp();
        Some(Self {
            sub: user.user_id.to_string(),
            email: user.email.to_string(),
            username: user.user_name.to_string(),
            iat,
            nbf: iat,
            exp,
            iss: issuer.to_string(),
        })
    }

    /// Parse the subject back into a user id
    pub fn user_id(&self) -> Result<UserId, TokenRejection> {
        self.sub.parse().map_err(|_| TokenRejection::Malformed)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}
