//! Request Context
//!
//! Typed request-scoped state: request metadata plus the user the Auth
//! Gate resolved, if any. Stored as an axum request extension.

use std::future::Future;

use kernel::error::app_error::AppError;
use kernel::request::RequestMeta;

use crate::domain::entity::user::User;
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub meta: RequestMeta,
    /// Set by the Auth Gate on success
    pub user: Option<User>,
}

impl RequestContext {
    pub fn new(meta: RequestMeta) -> Self {
        Self { meta, user: None }
    }

    #[inline]
    pub fn request_id(&self) -> &str {
        self.meta.request_id()
    }

    #[inline]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Convert an auth failure into an envelope tagged with this request
    pub fn reject(&self, err: AuthError) -> AppError {
        err.into_app_error().with_request_id(self.request_id())
    }
}

/// Run a store call within the request deadline
pub async fn within<F, T>(meta: &RequestMeta, fut: F) -> AuthResult<T>
where
    F: Future<Output = AuthResult<T>>,
{
    match tokio::time::timeout(meta.remaining(), fut).await {
        Ok(result) => result,
        Err(_) => Err(AuthError::Timeout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_within_passes_result_through() {
        let meta = RequestMeta::new(None, Duration::from_secs(5));
        let value = within(&meta, async { Ok::<_, AuthError>(7) }).await.unwrap();
        assert_eq!(value, 7);

        let err = within(&meta, async { Err::<(), _>(AuthError::UserNotFound) })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }

    #[tokio::test]
    async fn test_within_times_out() {
        let meta = RequestMeta::new(None, Duration::from_millis(10));
        let err = within(&meta, async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, AuthError>(())
        })
        .await
        .unwrap_err();
        assert!(matches!(err, AuthError::Timeout));
    }

    #[tokio::test]
    async fn test_within_huge_budget_runs_to_completion() {
        let meta = RequestMeta::new(None, Duration::from_secs(u64::MAX));
        let value = within(&meta, async { Ok::<_, AuthError>("done") })
            .await
            .unwrap();
        assert_eq!(value, "done");
    }

    #[test]
    fn test_reject_carries_request_id() {
        let ctx = RequestContext::new(RequestMeta::new(Some("req-42"), Duration::from_secs(1)));
        let err = ctx.reject(AuthError::MissingAuthorizationHeader);
        assert_eq!(err.request_id(), Some("req-42"));
        assert_eq!(err.status_code(), 401);
    }
}
