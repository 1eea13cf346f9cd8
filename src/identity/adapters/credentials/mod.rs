//! Credential adapters: Argon2id password hashing and HS256 session tokens.

mod argon;
mod jwt;

pub use argon::Argon2PasswordHasher;
pub use jwt::JwtTokenCodec;
