//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//! Every lookup ignores soft-deleted users.

use crate::domain::entity::user::{ProfileChanges, User};
use crate::domain::value_object::{email::Email, user_id::UserId, user_name::UserName};
use crate::error::AuthResult;

/// Credential store used by registration, login and token resolution
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Persist a new user
    ///
    /// A uniqueness violation is reported as `EmailTaken` or
    /// `UsernameTaken`, never as a raw store error.
    async fn insert(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by email (case-insensitive)
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Find user by user name (case-insensitive)
    async fn find_by_username(&self, user_name: &UserName) -> AuthResult<Option<User>>;
}

/// Profile updates, kept apart from the credential store
#[trait_variant::make(UserProfileRepository: Send)]
pub trait LocalUserProfileRepository {
    /// Apply `changes` to a live user and return the updated record
    ///
    /// Returns `None` when no live user has this id.
    async fn update(&self, user_id: &UserId, changes: &ProfileChanges)
    -> AuthResult<Option<User>>;
}
