//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use kernel::error::app_error::AppError;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::context::RequestContext;
use crate::application::token::TokenService;
use crate::application::{LoginUseCase, RegisterUseCase, UpdateProfileUseCase};
use crate::domain::repository::{UserProfileRepository, UserRepository};
use crate::presentation::dto::{
    LoginRequest, LoginResponse, RegisterRequest, UpdateProfileRequest, UserResponse,
};
use crate::presentation::extract::CurrentUser;

/// Shared state for auth handlers
pub struct AuthAppState<R> {
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub tokens: Arc<TokenService>,
}

impl<R> AuthAppState<R> {
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        let tokens = Arc::new(TokenService::new(&config));
        Self {
            repo,
            config,
            tokens,
        }
    }
}

// derive(Clone) would require R: Clone
impl<R> Clone for AuthAppState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

fn body<T>(ctx: &RequestContext, body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(value)| value)
        .map_err(|e| AppError::from(e).with_request_id(ctx.request_id()))
}

// ============================================================================
// Register
// ============================================================================

/// POST /auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    ctx: RequestContext,
    req: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), AppError>
where
    R: UserRepository + Sync + 'static,
{
    let req = body(&ctx, req)?;

    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());
    let user = use_case
        .execute(&ctx.meta, req.into())
        .await
        .map_err(|e| ctx.reject(e))?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

// ============================================================================
// Login
// ============================================================================

/// POST /auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    ctx: RequestContext,
    req: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError>
where
    R: UserRepository + Sync + 'static,
{
    let req = body(&ctx, req)?;

    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.config.clone(),
        state.tokens.clone(),
    );
    let output = use_case
        .execute(&ctx.meta, req.into())
        .await
        .map_err(|e| ctx.reject(e))?;

    Ok(Json(LoginResponse::from(output)))
}

// ============================================================================
// Current User
// ============================================================================

/// GET /auth/me, GET /users/me
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}

/// PUT /users/me
pub async fn update_me<R>(
    State(state): State<AuthAppState<R>>,
    ctx: RequestContext,
    CurrentUser(user): CurrentUser,
    req: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, AppError>
where
    R: UserProfileRepository + Sync + 'static,
{
    let req = body(&ctx, req)?;

    let use_case = UpdateProfileUseCase::new(state.repo.clone(), state.config.clone());
    let updated = use_case
        .execute(&ctx.meta, &user.user_id, req.into())
        .await
        .map_err(|e| ctx.reject(e))?;

    Ok(Json(UserResponse::from(&updated)))
}
