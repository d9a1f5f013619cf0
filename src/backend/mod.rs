//! Typed client for the KPI backend REST API.
//!
//! The only code in the application performing network I/O. Every call is a
//! single attempt: no retries, failures are classified and surfaced to the
//! caller as user-presentable errors.

mod envelope;
mod performance;
mod upload;

pub use performance::{
    GroupQuery, PerformanceQuery, SortDirection, SortField, fetch_dataset_status,
    fetch_group_performance, fetch_performance,
};
pub use upload::{UploadOutcome, upload_dataset};

pub(crate) use envelope::Envelope;

/// Upper bound for response bodies read into memory.
pub(crate) const MAX_RESPONSE_BYTES: usize = 2 * 1024 * 1024;

/// Failure of a read request.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request ran past its deadline.
    #[error("Request timed out; the backend did not respond in time")]
    Timeout,
    /// The backend was unreachable or the connection failed.
    #[error("Network error: {0}")]
    Transport(String),
    /// The backend answered but reported failure in its envelope.
    #[error("Backend error: {message}")]
    Backend {
        /// HTTP or envelope status code when the backend provided one.
        status: Option<u16>,
        /// Backend-provided message, or a generic fallback.
        message: String,
    },
    /// The response body did not match the expected shape.
    #[error("Invalid backend response: {0}")]
    Decode(String),
}

/// Failure of a dataset upload.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The file was rejected client-side before any request was issued.
    #[error("{0}")]
    Validation(String),
    /// The upload ran past its deadline.
    #[error("Upload timed out; large files may take a while, try again")]
    Timeout,
    /// The backend was unreachable or the connection failed.
    #[error("Network error during upload: {0}")]
    Transport(String),
    /// The backend answered but reported failure in its envelope.
    #[error("Backend rejected the upload: {message}")]
    Backend {
        /// HTTP or envelope status code when the backend provided one.
        status: Option<u16>,
        /// Backend-provided message, or a generic fallback.
        message: String,
    },
    /// The response body did not match the expected shape.
    #[error("Invalid upload response: {0}")]
    Decode(String),
    /// The local file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path passed to the upload call.
        path: std::path::PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

/// True when a `ureq` transport failure is a timeout rather than some other
/// connection problem.
pub(crate) fn transport_is_timeout(err: &ureq::Transport) -> bool {
    if err.kind() != ureq::ErrorKind::Io {
        return false;
    }
    let text = err.to_string().to_ascii_lowercase();
    text.contains("timed out") || text.contains("timeout")
}
