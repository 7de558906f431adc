//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::domain::repository::{UserProfileRepository, UserRepository};
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{attach_request_context, require_auth};

/// `/register`, `/login` and the protected `/me`
pub fn auth_router<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + Sync + 'static,
{
    let protected = Router::new()
        .route("/me", get(handlers::me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth::<R>,
        ));

    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .merge(protected)
        .layer(middleware::from_fn_with_state(
            state.config.clone(),
            attach_request_context,
        ))
        .with_state(state)
}

/// `/me` read and update, all behind the Auth Gate
pub fn users_router<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + UserProfileRepository + Sync + 'static,
{
    Router::new()
        .route(
            "/me",
            get(handlers::me).put(handlers::update_me::<R>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth::<R>,
        ))
        .layer(middleware::from_fn_with_state(
            state.config.clone(),
            attach_request_context,
        ))
        .with_state(state)
}
