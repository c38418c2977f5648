//! CineApp auth for Rust
//!
//! This crate covers the consumer side of the hosted identity provider:
//! reading the sealed session cookie, enforcing its lifetime, decoding the
//! role claim into capabilities and handing out bearer tokens.

mod identity;
mod resolver;
mod session;
mod token;

use thiserror::Error;

pub use identity::*;
pub use resolver::*;
pub use session::*;
pub use token::*;

/// Errors raised while handling sessions and tokens
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Missing session")]
    MissingSession,

    #[error("Session carries no access token")]
    MissingAccessToken,

    #[error("Session secret must not be empty")]
    InvalidSecret,
}

/// Failure to resolve the session of a request
#[derive(Error, Debug)]
pub enum SessionError {
    /// The session cookie could not be verified with the session secret
    #[error("session cookie could not be decrypted: {0}")]
    Decryption(#[source] jsonwebtoken::errors::Error),

    #[error("session resolution failed: {0}")]
    Other(String),
}

impl SessionError {
    pub fn other<T: std::fmt::Display>(msg: T) -> Self {
        Self::Other(msg.to_string())
    }

    /// Whether the stored cookies must be discarded
    pub fn is_decryption(&self) -> bool {
        matches!(self, Self::Decryption(_))
    }
}
