//! Request Extractors

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{Extensions, HeaderMap};
use kernel::error::app_error::AppError;
use kernel::request::{DEFAULT_REQUEST_TIMEOUT, REQUEST_ID_HEADER, RequestMeta};

use crate::application::context::RequestContext;
use crate::domain::entity::user::User;
use crate::error::AuthError;

/// Context attached by the middleware, or a fresh one built from the
/// headers when the route is mounted without it
pub(crate) fn context_from(extensions: &Extensions, headers: &HeaderMap) -> RequestContext {
    extensions
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_else(|| {
            let request_id = headers
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok());
            RequestContext::new(RequestMeta::new(request_id, DEFAULT_REQUEST_TIMEOUT))
        })
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(context_from(&parts.extensions, &parts.headers))
    }
}

/// The user resolved by the Auth Gate
///
/// Rejects with 401 when the route was reached without one.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = context_from(&parts.extensions, &parts.headers);
        match ctx.user {
            Some(user) => Ok(CurrentUser(user)),
            None => Err(AppError::from(AuthError::MissingAuthorizationHeader)
                .with_request_id(ctx.meta.request_id())),
        }
    }
}
