//! User Entity
//!
//! Identity record: who the user is and how they prove it.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    email::Email, person_name::PersonName, user_id::UserId, user_name::UserName,
    user_password::UserPassword,
};

/// User entity
///
/// `password` is never serialized; the presentation layer maps users to
/// DTOs field by field.
#[derive(Debug, Clone)]
pub struct User {
    /// Assigned once at creation, never changes
    pub user_id: UserId,
    /// Unique among live users (case-insensitive)
    pub email: Email,
    /// Unique among live users (case-insensitive)
    pub user_name: UserName,
    pub password: UserPassword,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker; deleted users are invisible to every lookup
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new, active user
    pub fn new(
        email: Email,
        user_name: UserName,
        password: UserPassword,
        first_name: PersonName,
        last_name: PersonName,
    ) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            email,
            user_name,
            password,
            first_name,
            last_name,
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Apply a profile update
    ///
    /// The stored hash is replaced only when the update carries a new one.
    pub fn apply(&mut self, changes: &ProfileChanges) {
        if let Some(first_name) = &changes.first_name {
            self.first_name = first_name.clone();
        }
        if let Some(last_name) = &changes.last_name {
            self.last_name = last_name.clone();
        }
        if let Some(password) = &changes.password {
            self.password = password.clone();
        }
        self.updated_at = Utc::now();
    }
}

/// Fields a user may change on their own profile
///
/// `None` means "leave as is".
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub first_name: Option<PersonName>,
    pub last_name: Option<PersonName>,
    /// Already hashed
    pub password: Option<UserPassword>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.password.is_none()
    }

    pub fn changes_password(&self) -> bool {
        self.password.is_some()
    }
}
