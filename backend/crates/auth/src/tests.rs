//! End-to-end flows through the HTTP surface against the in-memory store

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use chrono::{Duration, Utc};
use platform::password::HashCost;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::application::context::RequestContext;
use crate::application::token::TokenService;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    person_name::PersonName,
    user_id::UserId,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::AuthResult;
use crate::presentation::middleware::optional_auth;
use crate::{AuthAppState, AuthConfig, InMemoryUserRepository, auth_router, users_router};

const SECRET: &str = "test-signing-secret";

fn config() -> AuthConfig {
    AuthConfig {
        hash_cost: HashCost::new(8, 1, 1),
        ..AuthConfig::with_secret(SECRET)
    }
}

fn state(repo: &InMemoryUserRepository) -> AuthAppState<InMemoryUserRepository> {
    AuthAppState::new(Arc::new(repo.clone()), Arc::new(config()))
}

fn app(repo: &InMemoryUserRepository) -> Router {
    let state = state(repo);
    Router::new()
        .nest("/auth", auth_router(state.clone()))
        .nest("/users", users_router(state))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_with_auth(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

fn alice() -> Value {
    json!({
        "email": "a@x.com",
        "username": "alice",
        "password": "secret1",
        "first_name": "A",
        "last_name": "L",
    })
}

async fn register(app: &Router, body: Value) -> (StatusCode, Value) {
    send(app, json_request("POST", "/auth/register", body)).await
}

async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        json_request("POST", "/auth/login", json!({ "email": email, "password": password })),
    )
    .await
}

async fn token_for(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = login(app, email, password).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["token"].as_str().unwrap().to_string()
}

async fn stored(repo: &InMemoryUserRepository, email: &str) -> User {
    repo.find_by_email(&Email::new(email).unwrap())
        .await
        .unwrap()
        .unwrap()
}

// ============================================================================
// Register / Login / Me
// ============================================================================

#[tokio::test]
async fn test_register_login_me_scenario() {
    let repo = InMemoryUserRepository::new();
    let app = app(&repo);

    let (status, created) = register(&app, alice()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["id"].as_str().is_some());
    assert_eq!(created["email"], "a@x.com");
    assert_eq!(created["username"], "alice");
    assert_eq!(created["is_active"], true);
    assert!(created.get("password").is_none());
    assert!(created.get("password_hash").is_none());

    let user = stored(&repo, "a@x.com").await;
    assert_ne!(user.password.as_phc_string(), "secret1");

    let mut again = alice();
    again["username"] = json!("alice2");
    let (status, body) = register(&app, again).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["type"], "CONFLICT");
    assert_eq!(body["code"], "USER_ALREADY_EXISTS");

    let (status, logged_in) = login(&app, "a@x.com", "secret1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(logged_in["token_type"], "Bearer");
    assert!(logged_in["expires_at"].is_string());
    assert_eq!(logged_in["user"]["id"], created["id"]);
    let token = logged_in["token"].as_str().unwrap();
    assert_eq!(token.split('.').count(), 3);

    let (status, me) = send(
        &app,
        get_with_auth("/auth/me", Some(format!("Bearer {token}").as_str())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], created["id"]);
    assert!(me.get("password").is_none());
}

#[tokio::test]
async fn test_duplicate_username_with_fresh_email_conflicts() {
    let repo = InMemoryUserRepository::new();
    let app = app(&repo);
    register(&app, alice()).await;

    let mut other = alice();
    other["email"] = json!("other@x.com");
    other["username"] = json!("ALICE");
    let (status, body) = register(&app, other).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "User with this username already exists");
}

#[tokio::test]
async fn test_email_is_compared_case_insensitively() {
    let repo = InMemoryUserRepository::new();
    let app = app(&repo);
    register(&app, alice()).await;

    let mut other = alice();
    other["email"] = json!("A@X.COM");
    other["username"] = json!("alice2");
    let (status, body) = register(&app, other).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "User with this email already exists");

    let (status, _) = login(&app, "A@x.Com", "secret1").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_reports_every_invalid_field() {
    let repo = InMemoryUserRepository::new();
    let app = app(&repo);

    let (status, body) = register(
        &app,
        json!({ "email": "not-an-email", "username": "a!", "password": "123" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "VALIDATION_ERROR");
    assert_eq!(body["code"], "INVALID_VALUE");
    assert_eq!(body["message"], "Invalid request body");
    let details = body["details"].as_object().unwrap();
    for field in ["email", "username", "password", "first_name", "last_name"] {
        assert!(details.contains_key(field), "missing detail for {field}");
    }
    assert_eq!(details["first_name"]["code"], "REQUIRED_FIELD");
    assert_eq!(details["password"]["code"], "FIELD_TOO_SHORT");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let repo = InMemoryUserRepository::new();
    let app = app(&repo);

    let req = Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-request-id", "req-json")
        .body(Body::from("{\"email\": "))
        .unwrap();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "BAD_REQUEST");
    assert_eq!(body["code"], "INVALID_REQUEST_BODY");
    assert_eq!(body["request_id"], "req-json");
    assert!(body["timestamp"].is_string());
}

// ============================================================================
// Login failures
// ============================================================================

#[tokio::test]
async fn test_login_does_not_reveal_which_credential_was_wrong() {
    let repo = InMemoryUserRepository::new();
    let app = app(&repo);
    register(&app, alice()).await;

    let (wrong_status, wrong_password) = login(&app, "a@x.com", "secret2").await;
    let (unknown_status, unknown_email) = login(&app, "nobody@x.com", "secret1").await;
    let (bad_status, bad_format) = login(&app, "not-an-email", "secret1").await;

    for (status, body) in [
        (wrong_status, &wrong_password),
        (unknown_status, &unknown_email),
        (bad_status, &bad_format),
    ] {
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "INVALID_CREDENTIALS");
        assert_eq!(body["message"], wrong_password["message"]);
    }
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let repo = InMemoryUserRepository::new();
    let app = app(&repo);

    let (status, body) = send(&app, json_request("POST", "/auth/login", json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "VALIDATION_ERROR");
    assert_eq!(body["details"]["email"]["code"], "REQUIRED_FIELD");
    assert_eq!(body["details"]["password"]["code"], "REQUIRED_FIELD");
}

#[tokio::test]
async fn test_deactivated_user_is_forbidden_only_with_correct_password() {
    let repo = InMemoryUserRepository::new();
    let app = app(&repo);
    register(&app, alice()).await;
    let user = stored(&repo, "a@x.com").await;
    assert!(repo.set_active(&user.user_id, false).await);

    let (status, body) = login(&app, "a@x.com", "secret1").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "ACCOUNT_DEACTIVATED");

    let (status, body) = login(&app, "a@x.com", "wrong-one").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

// ============================================================================
// Auth Gate
// ============================================================================

#[tokio::test]
async fn test_gate_without_header() {
    let repo = InMemoryUserRepository::new();
    let app = app(&repo);

    let req = Request::builder()
        .method("GET")
        .uri("/auth/me")
        .header("x-request-id", "req-gate")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["type"], "UNAUTHORIZED");
    assert_eq!(body["code"], "MISSING_AUTHORIZATION_HEADER");
    assert_eq!(body["message"], "Missing authorization header");
    assert_eq!(body["request_id"], "req-gate");
}

#[tokio::test]
async fn test_gate_with_wrong_scheme() {
    let repo = InMemoryUserRepository::new();
    let app = app(&repo);

    let (status, body) = send(&app, get_with_auth("/auth/me", Some("Token xyz"))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_AUTHORIZATION_FORMAT");
    assert_eq!(body["message"], "Invalid authorization header format");
}

#[tokio::test]
async fn test_gate_collapses_token_failures() {
    let repo = InMemoryUserRepository::new();
    let app = app(&repo);
    register(&app, alice()).await;
    let user = stored(&repo, "a@x.com").await;

    let expired = TokenService::new(&config())
        .issue_at(&user, Utc::now() - Duration::hours(48))
        .unwrap()
        .token;
    let foreign = TokenService::new(&AuthConfig::with_secret("another-secret"))
        .issue(&user)
        .unwrap()
        .token;

    for token in [expired.as_str(), foreign.as_str(), "not.a.token", ""] {
        let (status, body) = send(
            &app,
            get_with_auth("/auth/me", Some(format!("Bearer {token}").as_str())),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "token {token:?}");
        assert_eq!(body["code"], "TOKEN_INVALID");
        assert_eq!(body["message"], "Invalid or expired token");
    }
}

#[tokio::test]
async fn test_gate_rejects_token_of_deleted_user() {
    let repo = InMemoryUserRepository::new();
    let app = app(&repo);
    register(&app, alice()).await;
    let token = token_for(&app, "a@x.com", "secret1").await;
    let user = stored(&repo, "a@x.com").await;
    assert!(repo.soft_delete(&user.user_id).await);

    let (status, body) = send(
        &app,
        get_with_auth("/auth/me", Some(format!("Bearer {token}").as_str())),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "TOKEN_INVALID");
}

#[tokio::test]
async fn test_gate_forbids_deactivated_user() {
    let repo = InMemoryUserRepository::new();
    let app = app(&repo);
    register(&app, alice()).await;
    let token = token_for(&app, "a@x.com", "secret1").await;
    let user = stored(&repo, "a@x.com").await;
    repo.set_active(&user.user_id, false).await;

    let (status, body) = send(
        &app,
        get_with_auth("/auth/me", Some(format!("Bearer {token}").as_str())),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "ACCOUNT_DEACTIVATED");
    assert_eq!(body["message"], "User account is deactivated");
}

#[tokio::test]
async fn test_optional_gate_never_rejects() {
    let repo = InMemoryUserRepository::new();
    let app = app(&repo);
    register(&app, alice()).await;
    let token = token_for(&app, "a@x.com", "secret1").await;

    let whoami = Router::new()
        .route(
            "/whoami",
            get(|ctx: RequestContext| async move {
                ctx.user()
                    .map(|u| u.user_name.to_string())
                    .unwrap_or_else(|| "anonymous".to_string())
            }),
        )
        .route_layer(from_fn_with_state(
            state(&repo),
            optional_auth::<InMemoryUserRepository>,
        ));

    let bearer = format!("Bearer {token}");
    let cases = [
        (None, "anonymous"),
        (Some("Token xyz"), "anonymous"),
        (Some("Bearer garbage"), "anonymous"),
        (Some(bearer.as_str()), "alice"),
    ];
    for (authorization, expected) in cases {
        let (status, body) = send(&whoami, get_with_auth("/whoami", authorization)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::String(expected.to_string()));
    }
}

// ============================================================================
// Profile update
// ============================================================================

#[tokio::test]
async fn test_profile_update_without_password_keeps_hash() {
    let repo = InMemoryUserRepository::new();
    let app = app(&repo);
    register(&app, alice()).await;
    let token = token_for(&app, "a@x.com", "secret1").await;
    let before = stored(&repo, "a@x.com").await;

    for name in ["Ada", "Augusta"] {
        let mut req = json_request("PUT", "/users/me", json!({ "first_name": name }));
        req.headers_mut().insert(
            header::AUTHORIZATION,
            format!("Bearer {token}").parse().unwrap(),
        );
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["first_name"], name);
        assert_eq!(body["last_name"], "L");
    }

    let after = stored(&repo, "a@x.com").await;
    assert_eq!(after.password.as_phc_string(), before.password.as_phc_string());

    let (status, _) = login(&app, "a@x.com", "secret1").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_profile_update_with_password_rehashes() {
    let repo = InMemoryUserRepository::new();
    let app = app(&repo);
    register(&app, alice()).await;
    let token = token_for(&app, "a@x.com", "secret1").await;
    let before = stored(&repo, "a@x.com").await;

    let mut req = json_request("PUT", "/users/me", json!({ "password": "secret2" }));
    req.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {token}").parse().unwrap(),
    );
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    let after = stored(&repo, "a@x.com").await;
    assert_ne!(after.password.as_phc_string(), before.password.as_phc_string());

    let (status, _) = login(&app, "a@x.com", "secret1").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = login(&app, "a@x.com", "secret2").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_profile_update_requires_a_field_and_a_user() {
    let repo = InMemoryUserRepository::new();
    let app = app(&repo);
    register(&app, alice()).await;
    let token = token_for(&app, "a@x.com", "secret1").await;

    let mut req = json_request("PUT", "/users/me", json!({}));
    req.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {token}").parse().unwrap(),
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "REQUIRED_FIELD");

    let req = json_request("PUT", "/users/me", json!({ "first_name": "Ada" }));
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "MISSING_AUTHORIZATION_HEADER");
}

// ============================================================================
// Concurrent registration
// ============================================================================

/// Lets another registration land between the existence checks and the insert
struct RacingRepository {
    inner: InMemoryUserRepository,
    rival: User,
}

impl RacingRepository {
    fn new(inner: InMemoryUserRepository) -> Self {
        let raw = RawPassword::new("secret9".to_string()).unwrap();
        let rival = User::new(
            Email::new("a@x.com").unwrap(),
            UserName::new("rival").unwrap(),
            UserPassword::from_raw(&raw, HashCost::new(8, 1, 1), None).unwrap(),
            PersonName::new("First name", "R").unwrap(),
            PersonName::new("Last name", "V").unwrap(),
        );
        Self { inner, rival }
    }
}

impl UserRepository for RacingRepository {
    async fn insert(&self, user: &User) -> AuthResult<()> {
        self.inner.insert(user).await
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        self.inner.find_by_id(user_id).await
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        self.inner.find_by_email(email).await
    }

    async fn find_by_username(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        let _ = self.inner.insert(&self.rival).await;
        self.inner.find_by_username(user_name).await
    }
}

#[tokio::test]
async fn test_register_losing_the_race_is_a_conflict() {
    let repo = InMemoryUserRepository::new();
    let state = AuthAppState::new(
        Arc::new(RacingRepository::new(repo.clone())),
        Arc::new(config()),
    );
    let app = Router::new().nest("/auth", auth_router(state));

    let (status, body) = register(&app, alice()).await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");
    assert_eq!(body["type"], "CONFLICT");
    assert_eq!(body["code"], "USER_ALREADY_EXISTS");

    let winner = stored(&repo, "a@x.com").await;
    assert_eq!(winner.user_name.to_string(), "rival");
}
