//! Backend error types for maeum-llm.
//!
//! All backend operations return [`Result<T>`] which uses [`BackendError`]
//! as the error type.

use thiserror::Error;

/// Errors that can occur when talking to the generation backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend answered with a non-success status.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The backend is up but reports itself unavailable (HTTP 503), or the
    /// health endpoint did not answer with success.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The backend returned a body without a usable answer field.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The request timed out.
    #[error("timeout")]
    Timeout,

    /// An HTTP-level error from reqwest.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BackendError {
    /// Map a transport error, keeping timeouts distinguishable.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout
        } else {
            BackendError::Http(err)
        }
    }
}

/// A convenience type alias for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;

impl From<BackendError> for maeum_types::MaeumError {
    fn from(err: BackendError) -> Self {
        // Transport timeouts carry no deadline; the dispatcher's own
        // deadline produces `MaeumError::Timeout { secs }` instead.
        maeum_types::MaeumError::Backend(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_request_failed() {
        let err = BackendError::RequestFailed("HTTP 500: boom".into());
        assert_eq!(err.to_string(), "request failed: HTTP 500: boom");
    }

    #[test]
    fn display_unavailable() {
        let err = BackendError::Unavailable("model loading".into());
        assert_eq!(err.to_string(), "backend unavailable: model loading");
    }

    #[test]
    fn display_invalid_response() {
        let err = BackendError::InvalidResponse("missing `response` field".into());
        assert_eq!(
            err.to_string(),
            "invalid response: missing `response` field"
        );
    }

    #[test]
    fn display_timeout() {
        assert_eq!(BackendError::Timeout.to_string(), "timeout");
    }

    #[test]
    fn converts_to_turn_local_engine_error() {
        let err: maeum_types::MaeumError = BackendError::Unavailable("down".into()).into();
        assert_eq!(err.to_string(), "backend error: backend unavailable: down");
        assert!(err.is_turn_local());
    }

    #[test]
    fn json_error_converts() {
        let json_err = serde_json::from_str::<serde_json::Value>("{bad").unwrap_err();
        let err: BackendError = json_err.into();
        assert!(err.to_string().starts_with("json error:"));
    }
}
