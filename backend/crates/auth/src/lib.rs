//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases, token service, request context
//! - `infra/` - PostgreSQL and in-memory credential stores
//! - `presentation/` - HTTP handlers, DTOs, extractors, Auth Gate, router
//!
//! ## Features
//! - Registration with email + username + password
//! - Login with email + password, answered with an HS256 bearer token
//! - Auth Gate middleware (required and optional)
//! - Profile update for the current user
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optionally peppered
//! - Unknown email and wrong password are indistinguishable, in both
//!   response and work done
//! - Token failures share one external message; the reason is logged

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult, TokenRejection};
pub use infra::{memory::InMemoryUserRepository, postgres::PgUserRepository};
pub use presentation::handlers::AuthAppState;
pub use presentation::router::{auth_router, users_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
