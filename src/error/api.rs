//! Errors returned by the chat API client.

use thiserror::Error;

use crate::traits::HttpError;

/// Failure of a single API round trip.
///
/// The client logs these and hands them to the caller unchanged; it never
/// retries or translates them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Network unreachable, timeout, or body read failure.
    #[error(transparent)]
    Transport(#[from] HttpError),

    /// The server does not know the requested resource (HTTP 404).
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// Any other non-2xx status.
    #[error("HTTP {status} error: {message}")]
    Status { status: u16, message: String },

    /// The body could not be decoded into the expected shape.
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    /// The request body could not be encoded.
    #[error("Failed to encode request: {message}")]
    Encode { message: String },
}

impl ApiError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Transport(err) => err.error_code(),
            ApiError::NotFound { .. } => "E_API_NOT_FOUND",
            ApiError::Status { .. } => "E_API_STATUS",
            ApiError::InvalidResponse { .. } => "E_API_INVALID",
            ApiError::Encode { .. } => "E_API_ENCODE",
        }
    }

    /// HTTP status attached to the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InvalidResponse {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_is_transparent() {
        let err: ApiError = HttpError::ConnectionFailed("refused".to_string()).into();
        assert_eq!(err.to_string(), "Connection failed: refused");
        assert_eq!(err.error_code(), "E_NET_CONN");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_not_found() {
        let err = ApiError::NotFound {
            resource: "thread 5".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "thread 5 not found");
    }

    #[test]
    fn test_status_error_display() {
        let err = ApiError::Status {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 500 error: boom");
        assert_eq!(err.error_code(), "E_API_STATUS");
    }

    #[test]
    fn test_json_error_becomes_invalid_response() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ApiError = json_err.into();
        assert!(matches!(err, ApiError::InvalidResponse { .. }));
    }
}
