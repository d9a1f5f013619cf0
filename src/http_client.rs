//! Shared HTTP client configuration and bounded response helpers.

use std::io::{self, Read};
use std::sync::OnceLock;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Base timeout applied to read requests.
pub(crate) const BASE_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for dataset uploads.
pub(crate) const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for dataset uploads above [`LARGE_UPLOAD_BYTES`].
pub(crate) const LARGE_UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Payload size past which the longer upload timeout applies.
pub(crate) const LARGE_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Return a shared HTTP agent with consistent timeouts.
///
/// Every request is a single attempt; failures are surfaced to the caller
/// rather than retried.
pub(crate) fn agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout_read(BASE_TIMEOUT)
            .timeout_write(BASE_TIMEOUT)
            .build()
    })
}

/// Read a response body into a string, enforcing a maximum byte size.
pub(crate) fn read_response_text(
    response: ureq::Response,
    max_bytes: usize,
) -> Result<String, io::Error> {
    check_content_length(&response, max_bytes)?;
    let reader = response.into_reader();
    let mut limited = reader.take(max_bytes as u64 + 1);
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes)?;
    if bytes.len() > max_bytes {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Response exceeded {max_bytes} bytes"),
        ));
    }
    String::from_utf8(bytes)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))
}

fn check_content_length(response: &ureq::Response, max_bytes: usize) -> Result<(), io::Error> {
    let Some(length) = response.header("Content-Length") else {
        return Ok(());
    };
    let Ok(length) = length.parse::<u64>() else {
        return Ok(());
    };
    if length > max_bytes as u64 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Response too large: {length} bytes"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::net::TcpListener;
    use std::thread;

    fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{}", addr)
    }

    #[test]
    fn read_response_text_rejects_content_length_over_max() {
        let response = concat!("HTTP/1.1 200 OK\r\n", "Content-Length: 100\r\n", "\r\n", "ok")
            .to_string();
        let url = serve_once(response);
        let response = agent().get(&url).call().unwrap();
        let err = read_response_text(response, 10).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn read_response_text_rejects_body_over_max() {
        let body = "a".repeat(32);
        let response = format!("HTTP/1.0 200 OK\r\n\r\n{body}");
        let url = serve_once(response);
        let response = agent().get(&url).call().unwrap();
        let err = read_response_text(response, 16).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn read_response_text_accepts_under_limit() {
        let body = "hello";
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        let url = serve_once(response);
        let response = agent().get(&url).call().unwrap();
        let text = read_response_text(response, 16).unwrap();
        assert_eq!(text, body);
    }
}
