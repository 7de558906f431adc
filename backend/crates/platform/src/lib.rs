//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing (Argon2id with tunable cost and optional pepper)
//! - Cryptographic utilities (secure random bytes and secrets)

pub mod crypto;
pub mod password;
