//! Error Taxonomy
//!
//! Failures surfaced by a fetch gateway.

use std::fmt::Display;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Transport failure, the server was never reached
    #[error("can't connect with the server: {0}")]
    Network(String),
    /// Session is no longer valid (401-equivalent)
    #[error("session expired, please login again")]
    Auth,
    /// Server rejected a write, or a response had the wrong shape
    #[error("{0}")]
    Validation(String),
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },
}

impl ApiError {
    /// Response body did not match the expected shape
    pub fn malformed(what: impl Display) -> Self {
        ApiError::Validation(format!("malformed response: {}", what))
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(ApiError::Auth.to_string(), "session expired, please login again");
        assert_eq!(
            ApiError::malformed("missing data").to_string(),
            "malformed response: missing data"
        );
        let server = ApiError::Server { status: 500, message: "boom".to_string() };
        assert_eq!(server.to_string(), "server error 500: boom");
        assert!(!server.is_auth());
    }
}
