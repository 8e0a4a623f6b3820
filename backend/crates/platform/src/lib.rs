//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Signed, expiring tokens (HS256 JWT)
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - Cookie management
//! - Client request helpers (User-Agent, bearer tokens)

pub mod client;
pub mod cookie;
pub mod password;
pub mod token;
