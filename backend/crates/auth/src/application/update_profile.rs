//! Update Profile Use Case
//!
//! Lets a user change their names and password. The password is hashed
//! again only when the request carries one.

use std::sync::Arc;

use kernel::error::{app_error::AppError, code::ErrorCode, field::FieldErrors};
use kernel::request::RequestMeta;

use crate::application::config::AuthConfig;
use crate::application::context::within;
use crate::application::password::hash_password;
use crate::domain::entity::user::{ProfileChanges, User};
use crate::domain::repository::UserProfileRepository;
use crate::domain::value_object::{
    person_name::PersonName, user_id::UserId, user_password::RawPassword,
};
use crate::error::{AuthError, AuthResult};

/// Update input. `None` leaves a field untouched.
#[derive(Default)]
pub struct UpdateProfileInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

pub struct UpdateProfileUseCase<R>
where
    R: UserProfileRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> UpdateProfileUseCase<R>
where
    R: UserProfileRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        meta: &RequestMeta,
        user_id: &UserId,
        input: UpdateProfileInput,
    ) -> AuthResult<User> {
        if input.first_name.is_none() && input.last_name.is_none() && input.password.is_none() {
            return Err(AuthError::Validation(AppError::validation(
                ErrorCode::RequiredField,
                "At least one field must be provided",
            )));
        }

        let mut errors = FieldErrors::new();
        let first_name = input
            .first_name
            .and_then(|v| errors.check("first_name", PersonName::new("First name", v)));
        let last_name = input
            .last_name
            .and_then(|v| errors.check("last_name", PersonName::new("Last name", v)));
        let raw_password = input
            .password
            .and_then(|v| errors.check("password", RawPassword::new(v)));
        errors.into_result().map_err(AuthError::Validation)?;

        let password = match raw_password {
            Some(raw) => Some(hash_password(raw, &self.config).await?),
            None => None,
        };

        let changes = ProfileChanges {
            first_name,
            last_name,
            password,
        };

        let user = within(meta, self.repo.update(user_id, &changes))
            .await?
            .ok_or(AuthError::UserNotFound)?;

        tracing::info!(
            user_id = %user.user_id,
            password_changed = changes.changes_password(),
            "User profile updated"
        );

        Ok(user)
    }
}
