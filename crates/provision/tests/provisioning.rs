//! Integration tests for the provisioning client — uses a mock HTTP server.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::thread;
use std::time::Duration;

use warp_label::SerialSource;
use warp_label_provision::{
    CredentialSource, Credentials, HttpSerialSource, ProvisionError,
};

// ── Mock provisioning server ────────────────────────────────────────────────

/// A mock provisioning endpoint on a background thread. Serves one canned
/// response per expected request and records the raw request heads.
struct MockProvisionServer {
    addr: SocketAddr,
    handle: Option<thread::JoinHandle<Vec<String>>>,
}

impl MockProvisionServer {
    /// Spawn a server answering each expected request with `(status, body)`.
    fn start(responses: Vec<(&'static str, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let mut requests = Vec::new();

            for (status, body) in responses {
                let (mut stream, _) = listener.accept().unwrap();
                stream
                    .set_read_timeout(Some(Duration::from_secs(5)))
                    .unwrap();

                // A GET has no body; the head ends at the blank line.
                let mut head = Vec::new();
                let mut buf = [0u8; 4096];
                loop {
                    match stream.read(&mut buf) {
                        Ok(0) => break,
                        Ok(n) => {
                            head.extend_from_slice(&buf[..n]);
                            if head.windows(4).any(|w| w == b"\r\n\r\n") {
                                break;
                            }
                        }
                        Err(_) => break,
                    }
                }
                requests.push(String::from_utf8_lossy(&head).to_string());

                let response = format!(
                    "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len(),
                );
                stream.write_all(response.as_bytes()).unwrap();
                stream.flush().unwrap();
            }

            requests
        });

        Self {
            addr,
            handle: Some(handle),
        }
    }

    fn endpoint(&self) -> String {
        format!("http://{}/warpsn", self.addr)
    }

    /// Wait for the server thread and return the recorded request heads.
    fn requests(mut self) -> Vec<String> {
        self.handle.take().unwrap().join().unwrap()
    }
}

struct FakeCredentials;

impl CredentialSource for FakeCredentials {
    fn load(&self) -> Result<Credentials, ProvisionError> {
        Ok(Credentials {
            username: "staging".to_string(),
            password: "hunter2".to_string(),
        })
    }
}

fn source_for(server: &MockProvisionServer) -> HttpSerialSource {
    HttpSerialSource::new(server.endpoint(), &FakeCredentials, Duration::from_secs(5)).unwrap()
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[test]
fn fetches_and_formats_serials() {
    let server = MockProvisionServer::start(vec![("200 OK", "7"), ("200 OK", "12345")]);
    let mut source = source_for(&server);

    assert_eq!(source.next_serial().unwrap(), "5000000007");
    assert_eq!(source.next_serial().unwrap(), "5000012345");

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        assert!(
            request.starts_with("GET /warpsn HTTP/1.1"),
            "unexpected request line: {request}"
        );
        assert!(
            request.contains("Basic c3RhZ2luZzpodW50ZXIy"),
            "missing basic-auth header: {request}"
        );
    }
}

#[test]
fn body_whitespace_is_tolerated() {
    let server = MockProvisionServer::start(vec![("200 OK", "42\n")]);
    let mut source = source_for(&server);
    assert_eq!(source.next_serial().unwrap(), "5000000042");
    server.requests();
}

#[test]
fn unauthorized_is_a_dedicated_error() {
    let server = MockProvisionServer::start(vec![("401 Unauthorized", "")]);
    let mut source = source_for(&server);

    let err = source.next_serial().unwrap_err();
    assert!(
        err.to_string().contains("rejected the credentials"),
        "unexpected error: {err}"
    );
    server.requests();
}

#[test]
fn server_error_carries_the_status() {
    let server = MockProvisionServer::start(vec![("500 Internal Server Error", "boom")]);
    let mut source = source_for(&server);

    let err = source.next_serial().unwrap_err();
    assert!(
        err.to_string().contains("status 500"),
        "unexpected error: {err}"
    );
    server.requests();
}

#[test]
fn non_numeric_body_is_malformed() {
    let server = MockProvisionServer::start(vec![("200 OK", "not-a-number")]);
    let mut source = source_for(&server);

    let err = source.next_serial().unwrap_err();
    assert!(
        err.to_string().contains("malformed provisioning response"),
        "unexpected error: {err}"
    );
    server.requests();
}

#[test]
fn oversized_counter_is_malformed() {
    let server = MockProvisionServer::start(vec![("200 OK", "1000000000")]);
    let mut source = source_for(&server);

    let err = source.next_serial().unwrap_err();
    assert!(
        err.to_string().contains("malformed provisioning response"),
        "unexpected error: {err}"
    );
    server.requests();
}

#[test]
fn connection_failure_is_fatal() {
    // Bind a port, then drop the listener so the connect is refused.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut source = HttpSerialSource::new(
        format!("http://{addr}/warpsn"),
        &FakeCredentials,
        Duration::from_secs(2),
    )
    .unwrap();
    assert!(source.next_serial().is_err());
}
