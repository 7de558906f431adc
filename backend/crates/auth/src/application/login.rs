//! Login Use Case
//!
//! Verifies credentials and issues a bearer token.
//!
//! Unknown email, wrong password and out-of-policy input all produce the
//! same `InvalidCredentials`; only a deactivated account, which requires
//! the correct password, is reported differently.

use std::sync::Arc;

use kernel::error::{code::ErrorCode, field::FieldErrors};
use kernel::request::RequestMeta;

use crate::application::config::AuthConfig;
use crate::application::context::within;
use crate::application::password::{verify_against_dummy, verify_password};
use crate::application::token::{IssuedToken, TokenService};
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login output
pub struct LoginOutput {
    pub token: IssuedToken,
    pub user: User,
}

/// Login use case
pub struct LoginUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
    tokens: Arc<TokenService>,
}

impl<R> LoginUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>, tokens: Arc<TokenService>) -> Self {
        Self {
            repo,
            config,
            tokens,
        }
    }

    pub async fn execute(&self, meta: &RequestMeta, input: LoginInput) -> AuthResult<LoginOutput> {
        let mut errors = FieldErrors::new();
        if input.email.trim().is_empty() {
            errors.add("email", ErrorCode::RequiredField, "Email is required");
        }
        if input.password.is_empty() {
            errors.add("password", ErrorCode::RequiredField, "Password is required");
        }
        errors.into_result().map_err(AuthError::Validation)?;

        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;
        let password =
            RawPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        let Some(user) = within(meta, self.repo.find_by_email(&email)).await? else {
            verify_against_dummy(password, &self.config).await?;
            tracing::debug!("Login for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, user.password.clone(), &self.config).await? {
            tracing::debug!(user_id = %user.user_id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AuthError::AccountDeactivated);
        }

        if user.password.needs_rehash(self.config.hash_cost) {
            tracing::info!(user_id = %user.user_id, "Password hash uses outdated cost parameters");
        }

        let token = self.tokens.issue(&user)?;

        tracing::info!(user_id = %user.user_id, "User logged in");

        Ok(LoginOutput { token, user })
    }
}
