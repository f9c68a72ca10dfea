// Pokémon Battle - Proxy Errors
// One variant per HTTP status the name and listing proxies can surface.

use thiserror::Error;

pub const MISSING_NAME: &str = "Could not determine Pokémon name from URL";
pub const NOT_FOUND: &str = "Pokémon not found. Please check the spelling.";
pub const UPSTREAM_FAILED: &str = "Failed to fetch data from the Pokémon API";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    /// Required input was missing or blank
    #[error("{0}")]
    BadRequest(String),
    /// The provider answered with a non-success status
    #[error("{0}")]
    NotFound(String),
    /// Network, decode or provider failure
    #[error("{0}")]
    Upstream(String),
}

impl ProxyError {
    pub fn missing_name() -> Self {
        ProxyError::BadRequest(MISSING_NAME.to_string())
    }

    pub fn not_found() -> Self {
        ProxyError::NotFound(NOT_FOUND.to_string())
    }

    pub fn upstream() -> Self {
        ProxyError::Upstream(UPSTREAM_FAILED.to_string())
    }

    /// HTTP status code this error is reported with
    pub fn status_code(&self) -> u16 {
        match self {
            ProxyError::BadRequest(_) => 400,
            ProxyError::NotFound(_) => 404,
            ProxyError::Upstream(_) => 500,
        }
    }
}
