//! `finapi-auth` — identity, credentials and session tokens.
//!
//! This crate is decoupled from HTTP and storage: it defines the user entity,
//! hashes/verifies passwords and issues/validates signed session tokens.

pub mod claims;
pub mod jwt;
pub mod password;
pub mod user;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtIssuer, Hs256JwtValidator, JwtIssuer, JwtValidator, TokenError};
pub use password::{Argon2PasswordHasher, PasswordError, PasswordHasher};
pub use user::{NewUser, User, UserProfile, normalize_email};
