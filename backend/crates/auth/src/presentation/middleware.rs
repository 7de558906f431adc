//! Auth Middleware
//!
//! `attach_request_context` builds the per-request context. The Auth Gate
//! comes in two flavours: `require_auth` rejects unauthenticated requests,
//! `optional_auth` lets them through without a user.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use kernel::error::app_error::AppError;
use kernel::request::{REQUEST_ID_HEADER, RequestMeta};

use crate::application::config::AuthConfig;
use crate::application::context::RequestContext;
use crate::application::resolve_user::ResolveUserUseCase;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult, TokenRejection};
use crate::presentation::extract::context_from;
use crate::presentation::handlers::AuthAppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Start the request clock and record the request id
pub async fn attach_request_context(
    State(config): State<Arc<AuthConfig>>,
    mut req: Request,
    next: Next,
) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok());
    let meta = RequestMeta::new(request_id, config.request_timeout);

    req.extensions_mut().insert(RequestContext::new(meta));
    next.run(req).await
}

/// Middleware that requires a valid bearer token for an active user
pub async fn require_auth<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError>
where
    R: UserRepository + Sync + 'static,
{
    let mut ctx = context_from(req.extensions(), req.headers());

    match authenticate(&state, &ctx, req.headers()).await {
        Ok(user) => {
            ctx.user = Some(user);
            req.extensions_mut().insert(ctx);
            Ok(next.run(req).await)
        }
        Err(e) => Err(ctx.reject(e)),
    }
}

/// Middleware that attaches the user when the token checks out and
/// otherwise continues anonymously
pub async fn optional_auth<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request,
    next: Next,
) -> Response
where
    R: UserRepository + Sync + 'static,
{
    let mut ctx = context_from(req.extensions(), req.headers());

    match authenticate(&state, &ctx, req.headers()).await {
        Ok(user) => ctx.user = Some(user),
        Err(e) => tracing::debug!(error = %e, "Continuing without user"),
    }

    req.extensions_mut().insert(ctx);
    next.run(req).await
}

async fn authenticate<R>(
    state: &AuthAppState<R>,
    ctx: &RequestContext,
    headers: &HeaderMap,
) -> AuthResult<User>
where
    R: UserRepository + Sync + 'static,
{
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuthorizationHeader)?;
    let token = value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .ok_or(AuthError::InvalidAuthorizationHeader)?;

    let use_case = ResolveUserUseCase::new(state.repo.clone(), state.tokens.clone());
    let user = use_case
        .execute(&ctx.meta, token.trim())
        .await
        .map_err(|e| match e {
            AuthError::UserNotFound => AuthError::InvalidToken(TokenRejection::UnknownSubject),
            other => other,
        })?;

    if !user.is_active {
        return Err(AuthError::AccountDeactivated);
    }

    Ok(user)
}
