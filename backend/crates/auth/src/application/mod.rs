//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod context;
pub mod login;
pub mod password;
pub mod register;
pub mod resolve_user;
pub mod token;
pub mod update_profile;

// Re-exports
pub use config::AuthConfig;
pub use context::{RequestContext, within};
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use register::{RegisterInput, RegisterUseCase};
pub use resolve_user::ResolveUserUseCase;
pub use token::{IssuedToken, TokenService};
pub use update_profile::{UpdateProfileInput, UpdateProfileUseCase};
