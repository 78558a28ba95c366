//! Error types shared by every endpoint call.
//!
//! A call fails for exactly one of three reasons, mirrored by the variants of
//! [`Error`]:
//!
//! - [`Error::InvalidParameters`]: the request options were rejected locally,
//!   nothing was sent.
//! - [`Error::Transport`]: the request could not be completed or its response
//!   could not be decoded. All underlying causes are kept.
//! - [`Error::Semantic`]: toncenter answered with `"ok": false`.

use std::fmt;

/// Client error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid parameters: {0}")]
    InvalidParameters(#[from] InvalidParameters),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("API error: {0}")]
    Semantic(#[from] ApiError),
}

impl Error {
    /// Returns `true` if repeating the same call unmodified may succeed.
    ///
    /// Only transport failures qualify. Parameter errors need a corrected
    /// request and API errors are the server's final answer.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// The server-reported error, if this is a semantic failure.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Semantic(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A request option set that failed its own validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidParameters {
    /// A logical-time cursor was given without its transaction hash, or the
    /// other way round.
    #[error("`{lt_field}` must be sent together with `{hash_field}`")]
    UnpairedCursor {
        lt_field: &'static str,
        hash_field: &'static str,
    },
    #[error("`lt` ({lt}) must not exceed `to_lt` ({to_lt})")]
    InvertedRange { lt: u64, to_lt: u64 },
    #[error("one of `seqno`, `lt` or `unixtime` must be set")]
    MissingBlockSelector,
    #[error("only one block selector may be set, got {}", .0.join(", "))]
    ConflictingBlockSelectors(Vec<&'static str>),
}

/// Error reported by toncenter in a response with `"ok": false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub message: String,
    pub code: Option<i32>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {code})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ApiError {}

/// One or more failures that prevented a usable response envelope.
#[derive(Debug)]
pub struct TransportError {
    failures: Vec<TransportFailure>,
}

impl TransportError {
    pub(crate) fn new(failures: Vec<TransportFailure>) -> Self {
        debug_assert!(!failures.is_empty());
        Self { failures }
    }

    /// Every cause, in the order it was observed.
    pub fn failures(&self) -> &[TransportFailure] {
        &self.failures
    }

    /// HTTP status of the response, if one was received and was not a success.
    pub fn status(&self) -> Option<u16> {
        self.failures.iter().find_map(|failure| match failure {
            TransportFailure::Status(status) => Some(*status),
            _ => None,
        })
    }
}

impl From<TransportFailure> for TransportError {
    fn from(failure: TransportFailure) -> Self {
        Self::new(vec![failure])
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.failures
            .first()
            .map(|failure| failure as &(dyn std::error::Error + 'static))
    }
}

/// A single transport-level cause.
#[derive(Debug, thiserror::Error)]
pub enum TransportFailure {
    #[cfg(feature = "client")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("empty response body")]
    EmptyBody,
    #[error("JSON error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("response is ok but carries no result")]
    MissingResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_each_kind() {
        let err = Error::from(InvalidParameters::InvertedRange { lt: 5, to_lt: 3 });
        assert_eq!(
            err.to_string(),
            "invalid parameters: `lt` (5) must not exceed `to_lt` (3)"
        );

        let err = Error::from(ApiError {
            message: "not found".into(),
            code: Some(404),
        });
        assert_eq!(err.to_string(), "API error: not found (code 404)");

        let err = Error::from(TransportError::new(vec![
            TransportFailure::Status(502),
            TransportFailure::EmptyBody,
        ]));
        assert_eq!(
            err.to_string(),
            "transport error: unexpected HTTP status 502; empty response body"
        );
    }

    #[test]
    fn only_transport_errors_are_retryable() {
        assert!(Error::from(TransportError::from(TransportFailure::EmptyBody)).is_retryable());
        assert!(!Error::from(InvalidParameters::MissingBlockSelector).is_retryable());
        assert!(
            !Error::from(ApiError {
                message: "boom".into(),
                code: None,
            })
            .is_retryable()
        );
    }

    #[test]
    fn conflicting_selectors_are_listed() {
        let err = InvalidParameters::ConflictingBlockSelectors(vec!["seqno", "unixtime"]);
        assert_eq!(
            err.to_string(),
            "only one block selector may be set, got seqno, unixtime"
        );
    }

    #[test]
    fn status_is_found_among_failures() {
        let err = TransportError::new(vec![
            TransportFailure::Status(504),
            TransportFailure::MissingResult,
        ]);
        assert_eq!(err.status(), Some(504));
        assert_eq!(err.failures().len(), 2);
    }
}
