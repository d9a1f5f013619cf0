//! Dataset upload: client-side validation, multipart encoding, size-aware
//! timeouts.

use std::path::Path;
use std::time::Duration;

use rand::{Rng, distr::Alphanumeric};

use crate::config::Config;
use crate::http_client;
use crate::model::{DatasetKind, UploadMode, UploadReport};

use super::{Envelope, MAX_RESPONSE_BYTES, UploadError, transport_is_timeout};

/// Outcome of a successful upload call.
#[derive(Clone, Debug, PartialEq)]
pub enum UploadOutcome {
    /// Every row was processed.
    Complete(UploadReport),
    /// The upload succeeded but some rows were rejected; surfaced as a
    /// warning, not a failure.
    Partial(UploadReport),
}

impl UploadOutcome {
    /// The backend report regardless of completeness.
    pub fn report(&self) -> &UploadReport {
        match self {
            Self::Complete(report) | Self::Partial(report) => report,
        }
    }
}

/// Upload a CSV dataset file.
///
/// The filename is validated before any file or network I/O: anything not
/// ending in `.csv` (case-insensitive) is rejected with
/// [`UploadError::Validation`] and no request is issued. Uploads over 10 MiB
/// get a doubled timeout.
pub fn upload_dataset(
    config: &Config,
    kind: DatasetKind,
    file: &Path,
    mode: UploadMode,
) -> Result<UploadOutcome, UploadError> {
    validate_csv_name(file)?;

    let bytes = std::fs::read(file).map_err(|source| UploadError::Io {
        path: file.to_path_buf(),
        source,
    })?;
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.csv".to_string());

    let timeout = upload_timeout(bytes.len() as u64);
    let boundary = boundary_token();
    let body = multipart_body(&boundary, &file_name, &bytes, mode);

    let url = config.endpoint(kind.upload_path());
    let request = http_client::agent()
        .post(url.as_str())
        .timeout(timeout)
        .set("Accept", "application/json")
        .set(
            "Content-Type",
            &format!("multipart/form-data; boundary={boundary}"),
        );

    let response = match request.send_bytes(&body) {
        Ok(response) => response,
        Err(ureq::Error::Status(code, response)) => {
            let body = http_client::read_response_text(response, MAX_RESPONSE_BYTES)
                .unwrap_or_default();
            let message = Envelope::<serde_json::Value>::parse(&body)
                .ok()
                .and_then(Envelope::failure_message)
                .unwrap_or_else(|| format!("HTTP {code}"));
            return Err(UploadError::Backend {
                status: Some(code),
                message,
            });
        }
        Err(ureq::Error::Transport(err)) => {
            return Err(if transport_is_timeout(&err) {
                UploadError::Timeout
            } else {
                UploadError::Transport(err.to_string())
            });
        }
    };

    let body = http_client::read_response_text(response, MAX_RESPONSE_BYTES)
        .map_err(|err| UploadError::Decode(err.to_string()))?;
    let report = Envelope::<UploadReport>::parse(&body)
        .and_then(Envelope::into_data)
        .map_err(map_fetch_error)?;

    if report.has_row_errors() {
        Ok(UploadOutcome::Partial(report))
    } else {
        Ok(UploadOutcome::Complete(report))
    }
}

/// Reject filenames without a `.csv` extension before any I/O happens.
fn validate_csv_name(file: &Path) -> Result<(), UploadError> {
    let is_csv = file
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        Ok(())
    } else {
        Err(UploadError::Validation(format!(
            "'{}' is not a CSV file; expected a .csv extension",
            file.display()
        )))
    }
}

fn upload_timeout(payload_bytes: u64) -> Duration {
    if payload_bytes > http_client::LARGE_UPLOAD_BYTES {
        http_client::LARGE_UPLOAD_TIMEOUT
    } else {
        http_client::UPLOAD_TIMEOUT
    }
}

fn boundary_token() -> String {
    let token: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(24)
        .map(char::from)
        .collect();
    format!("adboard-{token}")
}

/// Assemble a multipart/form-data body with the `file` field and the `mode`
/// field the backend expects.
fn multipart_body(boundary: &str, file_name: &str, bytes: &[u8], mode: UploadMode) -> Vec<u8> {
    let mut body = Vec::with_capacity(bytes.len() + 512);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: text/csv\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"mode\"\r\n\r\n");
    body.extend_from_slice(mode.wire_name().as_bytes());
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

fn map_fetch_error(err: super::FetchError) -> UploadError {
    match err {
        super::FetchError::Timeout => UploadError::Timeout,
        super::FetchError::Transport(text) => UploadError::Transport(text),
        super::FetchError::Backend { status, message } => {
            UploadError::Backend { status, message }
        }
        super::FetchError::Decode(text) => UploadError::Decode(text),
    }
}
