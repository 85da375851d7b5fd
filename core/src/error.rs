//! Error types for the catalog admin API client.
//!
//! # Design
//! Two failure families reach callers. `Transport` covers everything that
//! prevented a well-formed exchange: the network, a request body that could
//! not be encoded, or a success response whose JSON could not be read. `Api`
//! carries what the server said, including the HTTP status so callers can
//! tell a 2xx-with-`success:false` apart from an ordinary 4xx/5xx.

use thiserror::Error;

/// Error code the backend uses when the bearer credential is no longer valid.
pub const INVALID_TOKEN: &str = "INVALID_TOKEN";

/// Error code raised locally when login succeeds without returning a token.
pub const TOKEN_MISSING: &str = "TOKEN_MISSING";

/// Message used when a failed response carries no readable envelope.
pub const GENERIC_FAILURE: &str = "Request failed";

/// Coarse classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Api,
}

/// Errors returned by `ApiClient` and every facade built on it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The exchange never produced a usable response.
    #[error("transport error: {message}")]
    Transport { message: String },

    /// The server reported a failure, either through a non-2xx status or an
    /// envelope whose `success` flag is false.
    #[error("api error ({status}): {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },
}

impl ApiError {
    pub(crate) fn transport(message: impl Into<String>) -> Self {
        ApiError::Transport {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transport { .. } => ErrorKind::Transport,
            ApiError::Api { .. } => ErrorKind::Api,
        }
    }

    /// The server-supplied error code, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Api { code, .. } => code.as_deref(),
            ApiError::Transport { .. } => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Transport { .. } => None,
        }
    }

    pub fn is_invalid_token(&self) -> bool {
        self.code() == Some(INVALID_TOKEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_carry_no_code() {
        let err = ApiError::transport("connection refused");
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.code().is_none());
        assert!(err.status().is_none());
        assert_eq!(err.to_string(), "transport error: connection refused");
    }

    #[test]
    fn invalid_token_is_detected_by_code() {
        let err = ApiError::Api {
            status: 401,
            code: Some(INVALID_TOKEN.to_string()),
            message: "expired".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Api);
        assert!(err.is_invalid_token());
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "api error (401): expired");
    }
}
