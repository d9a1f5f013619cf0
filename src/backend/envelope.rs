//! The backend's uniform response wrapper.
//!
//! Every endpoint answers `{success, status_code, message, data}`; this
//! module decodes that shape and turns it into a `Result`.

use serde::Deserialize;

use super::FetchError;

/// Wire shape of the backend envelope.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub(crate) success: bool,
    #[serde(default)]
    pub(crate) status_code: Option<u16>,
    #[serde(default)]
    pub(crate) message: Option<String>,
    #[serde(default)]
    pub(crate) data: Option<T>,
}

impl<T> Envelope<T> {
    /// Decode an envelope from a response body.
    pub(crate) fn parse(body: &str) -> Result<Self, FetchError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Err(FetchError::Decode("Empty response body".to_string()));
        }
        serde_json::from_str(trimmed).map_err(|err| FetchError::Decode(err.to_string()))
    }

    /// Unwrap the payload, mapping `success=false` to a backend error that
    /// carries the backend message when one was provided.
    pub(crate) fn into_data(self) -> Result<T, FetchError> {
        if !self.success {
            return Err(FetchError::Backend {
                status: self.status_code,
                message: self
                    .message
                    .unwrap_or_else(|| "Backend reported failure without a message".to_string()),
            });
        }
        self.data
            .ok_or_else(|| FetchError::Decode("Envelope is missing its data payload".to_string()))
    }

    /// Backend message from a failure envelope, if any.
    pub(crate) fn failure_message(self) -> Option<String> {
        if self.success { None } else { self.message }
    }
}
