//! Register Use Case
//!
//! Creates a new user account.

use std::sync::Arc;

use kernel::error::field::FieldErrors;
use kernel::request::RequestMeta;

use crate::application::config::AuthConfig;
use crate::application::context::within;
use crate::application::password::hash_password;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email, person_name::PersonName, user_name::UserName,
    user_password::RawPassword,
};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub email: String,
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

struct ValidRegistration {
    email: Email,
    user_name: UserName,
    password: RawPassword,
    first_name: PersonName,
    last_name: PersonName,
}

/// Register use case
pub struct RegisterUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> RegisterUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// Email is checked before username, so a double collision reports
    /// the email.
    pub async fn execute(&self, meta: &RequestMeta, input: RegisterInput) -> AuthResult<User> {
        let valid = Self::validate(input)?;

        if within(meta, self.repo.find_by_email(&valid.email))
            .await?
            .is_some()
        {
            return Err(AuthError::EmailTaken);
        }

        if within(meta, self.repo.find_by_username(&valid.user_name))
            .await?
            .is_some()
        {
            return Err(AuthError::UsernameTaken);
        }

        let password = hash_password(valid.password, &self.config).await?;

        let user = User::new(
            valid.email,
            valid.user_name,
            password,
            valid.first_name,
            valid.last_name,
        );

        // A concurrent registration can still win the race; the store
        // turns that into EmailTaken / UsernameTaken.
        within(meta, self.repo.insert(&user)).await?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "User registered"
        );

        Ok(user)
    }

    fn validate(input: RegisterInput) -> AuthResult<ValidRegistration> {
        let mut errors = FieldErrors::new();

        let email = errors.check("email", Email::new(&input.email));
        let user_name = errors.check("username", UserName::new(&input.username).map_err(Into::into));
        let password = errors.check("password", RawPassword::new(input.password));
        let first_name = errors.check("first_name", PersonName::new("First name", &input.first_name));
        let last_name = errors.check("last_name", PersonName::new("Last name", &input.last_name));

        match (email, user_name, password, first_name, last_name) {
            (Some(email), Some(user_name), Some(password), Some(first_name), Some(last_name)) => {
                Ok(ValidRegistration {
                    email,
                    user_name,
                    password,
                    first_name,
                    last_name,
                })
            }
            _ => Err(AuthError::Validation(errors.into_error())),
        }
    }
}
