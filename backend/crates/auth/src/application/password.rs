//! Password hashing off the async runtime
//!
//! Argon2 is deliberately slow, so both hashing and verification run on
//! tokio's blocking pool. Once started they run to completion.

use std::sync::OnceLock;

use platform::password::HashCost;

use crate::application::config::AuthConfig;
use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::{AuthError, AuthResult};

/// Hash a validated password with the configured cost and pepper
pub async fn hash_password(raw: RawPassword, config: &AuthConfig) -> AuthResult<UserPassword> {
    let cost = config.hash_cost;
    let pepper = config.password_pepper.clone();

    tokio::task::spawn_blocking(move || UserPassword::from_raw(&raw, cost, pepper.as_deref()))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Verify `raw` against `hash`
pub async fn verify_password(
    raw: RawPassword,
    hash: UserPassword,
    config: &AuthConfig,
) -> AuthResult<bool> {
    let pepper = config.password_pepper.clone();

    tokio::task::spawn_blocking(move || hash.verify(&raw, pepper.as_deref()))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Spend the same effort as a real verification, always failing
///
/// Used when the account does not exist so that "unknown email" and
/// "wrong password" take comparable time.
pub async fn verify_against_dummy(raw: RawPassword, config: &AuthConfig) -> AuthResult<bool> {
    let cost = config.hash_cost;
    let pepper = config.password_pepper.clone();

    tokio::task::spawn_blocking(move || -> AuthResult<bool> {
        let dummy = dummy_hash(cost)?;
        dummy.verify(&raw, pepper.as_deref());
        Ok(false)
    })
    .await
    .map_err(|e| AuthError::Hashing(e.to_string()))?
}

fn dummy_hash(cost: HashCost) -> AuthResult<UserPassword> {
    static DUMMY: OnceLock<(HashCost, UserPassword)> = OnceLock::new();

    if let Some((cached_cost, hash)) = DUMMY.get() {
        if *cached_cost == cost {
            return Ok(hash.clone());
        }
    }

    let raw = RawPassword::unchecked(platform::crypto::random_secret(16));
    let hash =
        UserPassword::from_raw(&raw, cost, None).map_err(|e| AuthError::Hashing(e.to_string()))?;
    let _ = DUMMY.set((cost, hash.clone()));
    Ok(hash)
}
