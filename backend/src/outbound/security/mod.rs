//! Credential adapters: Argon2id password hashing and HS256 access tokens.

mod argon2_password_hasher;
mod jwt_token_service;

pub use argon2_password_hasher::{Argon2PasswordHasher, PasswordConfig};
pub use jwt_token_service::{Claims, JwtTokenService};
