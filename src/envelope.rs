//! The `{ok, error, code, result}` wrapper around every toncenter response.

use crate::error::{ApiError, Error, Result, TransportError, TransportFailure};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::value::RawValue;

/// Response wrapper. `result` stays unparsed until `ok` has been checked.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<'a> {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    code: Option<i32>,
    #[serde(borrow, default)]
    result: Option<&'a RawValue>,
}

impl<'a> Envelope<'a> {
    pub(crate) fn parse(body: &'a str) -> std::result::Result<Self, TransportFailure> {
        if body.trim().is_empty() {
            return Err(TransportFailure::EmptyBody);
        }
        Ok(serde_json::from_str(body)?)
    }

    /// Unwraps the envelope into the typed result or the server-reported error.
    pub(crate) fn into_result<T: DeserializeOwned>(self) -> Result<T> {
        if !self.ok {
            return Err(Error::Semantic(ApiError {
                message: self
                    .error
                    .unwrap_or_else(|| "response status is not ok".to_owned()),
                code: self.code,
            }));
        }
        let Some(raw) = self.result else {
            return Err(TransportError::from(TransportFailure::MissingResult).into());
        };
        serde_json::from_str(raw.get())
            .map_err(|err| Error::Transport(TransportFailure::Decode(err).into()))
    }
}

/// Turns an HTTP status and body into the call outcome.
///
/// Transport failures win over the envelope: if the body cannot be decoded,
/// `ok` is never looked at. A non-success status is only reported when the
/// body is unusable, since toncenter wraps its own errors in an envelope.
pub(crate) fn resolve<T: DeserializeOwned>(status: u16, body: &str) -> Result<T> {
    match Envelope::parse(body) {
        Ok(envelope) => envelope.into_result(),
        Err(failure) => {
            let mut failures = Vec::with_capacity(2);
            if !(200..300).contains(&status) {
                failures.push(TransportFailure::Status(status));
            }
            failures.push(failure);
            Err(TransportError::new(failures).into())
        }
    }
}
