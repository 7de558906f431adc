//! Presentation Layer
//!
//! HTTP handlers, DTOs, extractors, router, and middleware.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use extract::CurrentUser;
pub use handlers::AuthAppState;
pub use middleware::{attach_request_context, optional_auth, require_auth};
pub use router::{auth_router, users_router};
