//! Error handling for the CineApp client

use std::fmt;
use thiserror::Error;

use cineapp_auth::AuthError;
use cineapp_catalog::CatalogError;

/// Unified error type for the CineApp client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Session and token errors
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Catalog API errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Whether the backend refused the caller's role
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Error::Catalog(e) if e.is_forbidden())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
