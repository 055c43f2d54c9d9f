//! # auth-adapters
//!
//! Credential and token implementations behind the `domains` auth ports.
//! Argon2 hashing is always compiled; JWT issuance sits behind the
//! `auth-jwt` feature.

mod hasher;
pub use hasher::Argon2CredentialHasher;

#[cfg(feature = "auth-jwt")]
mod jwt;
#[cfg(feature = "auth-jwt")]
pub use jwt::JwtTokenIssuer;
