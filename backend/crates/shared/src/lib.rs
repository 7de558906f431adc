//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of domain vocabulary:
//! - The error envelope (kind, code, message, details, request id)
//! - Common primitive value objects (ID types)
//! - Request-scoped metadata (request id + deadline)
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod code;
    pub mod conversions;
    pub mod field;
    pub mod kind;
}
pub mod id;
pub mod request;
