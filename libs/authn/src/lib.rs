//! Identity mechanism for the Workboard server.
//!
//! Issues and validates HS256 JWT pairs (short-lived access token plus a
//! refresh token) and hashes credentials with bcrypt. The tracker module only
//! consumes the resolved [`CurrentUser`]; everything else in this crate is
//! the gateway's internal machinery.

mod config;
mod jwt;
mod password;

pub use config::AuthnConfig;
pub use jwt::{
    authenticate_bearer, decode_token, issue_access_token, issue_refresh_token, issue_token_pair,
    refresh_access_token, Claims, TokenKind, TokenPair,
};
pub use password::{hash_password, verify_password};

use thiserror::Error;
use uuid::Uuid;

/// Identity resolved from a validated access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
}

#[derive(Error, Debug)]
pub enum AuthnError {
    #[error("Missing or malformed Authorization header")]
    MissingCredentials,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Expected a {expected} token")]
    WrongTokenType { expected: &'static str },

    #[error("Token subject is not a valid user id")]
    InvalidSubject,

    #[error("Credential hashing failed: {0}")]
    Hashing(String),

    #[error("Token encoding failed: {0}")]
    Encoding(String),
}
