//! In-memory Repository
//!
//! Same uniqueness and soft-delete rules as the PostgreSQL store. Used by
//! tests and local runs without a database.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::entity::user::{ProfileChanges, User};
use crate::domain::repository::{UserProfileRepository, UserRepository};
use crate::domain::value_object::{email::Email, user_id::UserId, user_name::UserName};
use crate::error::{AuthError, AuthResult};

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the active flag. Returns `false` if the user does not exist.
    pub async fn set_active(&self, user_id: &UserId, is_active: bool) -> bool {
        let mut users = self.users.write().await;
        match users.get_mut(user_id) {
            Some(user) => {
                user.is_active = is_active;
                user.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    /// Mark a user deleted. Returns `false` if the user does not exist.
    pub async fn soft_delete(&self, user_id: &UserId) -> bool {
        let mut users = self.users.write().await;
        match users.get_mut(user_id) {
            Some(user) => {
                user.deleted_at = Some(Utc::now());
                true
            }
            None => false,
        }
    }

    /// Raw record, including soft-deleted users
    pub async fn get(&self, user_id: &UserId) -> Option<User> {
        self.users.read().await.get(user_id).cloned()
    }

    async fn find_live<P>(&self, predicate: P) -> Option<User>
    where
        P: Fn(&User) -> bool,
    {
        self.users
            .read()
            .await
            .values()
            .find(|u| !u.is_deleted() && predicate(u))
            .cloned()
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|u| !u.is_deleted() && u.email == user.email)
        {
            return Err(AuthError::EmailTaken);
        }
        if users
            .values()
            .any(|u| !u.is_deleted() && u.user_name.canonical() == user.user_name.canonical())
        {
            return Err(AuthError::UsernameTaken);
        }

        users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.find_live(|u| u.user_id == *user_id).await)
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self.find_live(|u| u.email == *email).await)
    }

    async fn find_by_username(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        Ok(self
            .find_live(|u| u.user_name.canonical() == user_name.canonical())
            .await)
    }
}

impl UserProfileRepository for InMemoryUserRepository {
    async fn update(
        &self,
        user_id: &UserId,
        changes: &ProfileChanges,
    ) -> AuthResult<Option<User>> {
        let mut users = self.users.write().await;

        Ok(users
            .get_mut(user_id)
            .filter(|u| !u.is_deleted())
            .map(|user| {
                user.apply(changes);
                user.clone()
            }))
    }
}
