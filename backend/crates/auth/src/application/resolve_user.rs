//! Resolve User Use Case
//!
//! Bearer token to live user.

use std::sync::Arc;

use kernel::request::RequestMeta;

use crate::application::context::within;
use crate::application::token::TokenService;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

pub struct ResolveUserUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenService>,
}

impl<R> ResolveUserUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, tokens: Arc<TokenService>) -> Self {
        Self { repo, tokens }
    }

    /// Verify `token` and load its subject
    ///
    /// Fails with `InvalidToken` for any token problem and `UserNotFound`
    /// when the subject is gone (or soft-deleted). The active flag is left
    /// to the caller.
    pub async fn execute(&self, meta: &RequestMeta, token: &str) -> AuthResult<User> {
        let claims = self.tokens.verify(token).map_err(AuthError::InvalidToken)?;
        let user_id = claims.user_id().map_err(AuthError::InvalidToken)?;

        within(meta, self.repo.find_by_id(&user_id))
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}
