//! Minimal single-request HTTP server capturing what the client sent.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc::{Receiver, channel};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// A server that answers exactly one request with a canned response.
pub struct StubBackend {
    /// Base URL to point the client at.
    pub base_url: String,
    request_rx: Receiver<String>,
    handle: Option<JoinHandle<()>>,
}

impl StubBackend {
    /// Serve one request with the given status line and JSON body.
    pub fn serve_once(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub listener");
        let addr = listener.local_addr().expect("stub local addr");
        let response = format!(
            "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
            reason(status),
            body.len(),
        );
        let (request_tx, request_rx) = channel();

        let handle = thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let request = read_request(&mut stream);
                let _ = stream.write_all(response.as_bytes());
                let _ = request_tx.send(request);
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            request_rx,
            handle: Some(handle),
        }
    }

    /// The raw request (headers and body) the client sent.
    pub fn request(mut self) -> String {
        let request = self
            .request_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("stub received a request");
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        request
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        _ => "Other",
    }
}

/// Read headers plus a Content-Length delimited body.
fn read_request(stream: &mut std::net::TcpStream) -> String {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let mut bytes = Vec::new();
    let mut buf = [0u8; 4096];
    let mut header_end = None;
    while header_end.is_none() {
        let Ok(read) = stream.read(&mut buf) else {
            break;
        };
        if read == 0 {
            break;
        }
        bytes.extend_from_slice(&buf[..read]);
        header_end = find_header_end(&bytes);
    }

    if let Some(end) = header_end {
        let headers = String::from_utf8_lossy(&bytes[..end]).into_owned();
        let expected = content_length(&headers).unwrap_or(0);
        while bytes.len() < end + 4 + expected {
            let Ok(read) = stream.read(&mut buf) else {
                break;
            };
            if read == 0 {
                break;
            }
            bytes.extend_from_slice(&buf[..read]);
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

fn find_header_end(bytes: &[u8]) -> Option<usize> {
    bytes.windows(4).position(|window| window == b"\r\n\r\n")
}

fn content_length(headers: &str) -> Option<usize> {
    headers
        .lines()
        .find_map(|line| line.to_ascii_lowercase().strip_prefix("content-length:").map(str::to_string))
        .and_then(|value| value.trim().parse().ok())
}
