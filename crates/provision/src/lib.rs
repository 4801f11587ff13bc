//! Serial-number provisioning for WARP2 Charger package labels.
//!
//! Serial numbers are issued by the staging server, one per request, over
//! authenticated HTTPS. The response body is a bare counter value; the
//! on-label serial is that counter rendered as `5` plus nine zero-padded
//! digits. The API is synchronous (`reqwest::blocking`), matching the
//! strictly sequential label pipeline — one bounded-timeout request per
//! instance, no retries.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use warp_label::{SerialSource, SerialSourceError};

/// Provisioning endpoint used in production.
pub const DEFAULT_ENDPOINT: &str = "https://stagingwww.tinkerforge.com/warpsn";

/// Basic-auth username for the staging server.
pub const DEFAULT_USERNAME: &str = "staging";

/// How long to wait for a provisioning response before giving up.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Largest counter value that still fits the 9-digit on-label format.
const MAX_RAW_SERIAL: u64 = 999_999_999;

/// Failures while obtaining a serial number from the provisioning service.
///
/// Every variant is fatal to the whole run; the pipeline never prints a
/// partial batch.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The credentials file could not be read.
    #[error("cannot read credentials file {path}: {source}")]
    Credentials {
        /// Path that was attempted.
        path: PathBuf,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The HTTP request failed (connect, TLS, or timeout).
    #[error("provisioning request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server rejected the credentials.
    #[error("provisioning service rejected the credentials")]
    Unauthorized,

    /// The server answered with an unexpected status code.
    #[error("provisioning service answered with status {0}")]
    Status(u16),

    /// The response body is not a renderable serial counter.
    #[error("malformed provisioning response: {0:?}")]
    MalformedResponse(String),
}

// ── Credentials ─────────────────────────────────────────────────────────────

/// Basic-auth credentials for the provisioning service.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Basic-auth username.
    pub username: String,
    /// Basic-auth password.
    pub password: String,
}

/// Where credentials come from.
///
/// The production implementation reads a password file from disk; tests
/// substitute an in-memory fake and never touch the filesystem.
pub trait CredentialSource {
    /// Load the credentials, reading any backing storage in full.
    fn load(&self) -> Result<Credentials, ProvisionError>;
}

/// Credentials stored as a single-line password file next to the tool.
#[derive(Debug, Clone)]
pub struct PasswordFile {
    username: String,
    path: PathBuf,
}

impl PasswordFile {
    /// Password file at `path`, paired with `username`.
    pub fn new(username: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            username: username.into(),
            path: path.into(),
        }
    }
}

impl CredentialSource for PasswordFile {
    fn load(&self) -> Result<Credentials, ProvisionError> {
        let password =
            fs::read_to_string(&self.path).map_err(|source| ProvisionError::Credentials {
                path: self.path.clone(),
                source,
            })?;
        Ok(Credentials {
            username: self.username.clone(),
            password: password.trim().to_string(),
        })
    }
}

// ── Serial sources ──────────────────────────────────────────────────────────

/// Fetches a fresh serial number from the provisioning service per call.
///
/// The client and credentials are built once per run, before any network
/// activity; the connection may be reused across calls but each call is one
/// logical provisioning request.
pub struct HttpSerialSource {
    client: reqwest::blocking::Client,
    endpoint: String,
    credentials: Credentials,
}

impl HttpSerialSource {
    /// Build the authenticated client for `endpoint`.
    ///
    /// Loads the credentials eagerly so a missing password file fails here,
    /// not halfway through a batch.
    pub fn new(
        endpoint: impl Into<String>,
        credentials: &dyn CredentialSource,
        timeout: Duration,
    ) -> Result<Self, ProvisionError> {
        let credentials = credentials.load()?;
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            credentials,
        })
    }

    /// One provisioning round-trip: GET the counter, render the serial.
    fn fetch(&self) -> Result<String, ProvisionError> {
        let response = self
            .client
            .get(&self.endpoint)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send()?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProvisionError::Unauthorized);
        }
        if !status.is_success() {
            return Err(ProvisionError::Status(status.as_u16()));
        }

        let body = response.text()?;
        format_serial(body.trim())
    }
}

impl SerialSource for HttpSerialSource {
    fn next_serial(&mut self) -> Result<String, SerialSourceError> {
        self.fetch().map_err(SerialSourceError::new)
    }
}

/// Reuses one literal serial number for every instance. No network access.
#[derive(Debug, Clone)]
pub struct LiteralSerialSource(String);

impl LiteralSerialSource {
    /// Source that always yields `serial`.
    pub fn new(serial: impl Into<String>) -> Self {
        Self(serial.into())
    }
}

impl SerialSource for LiteralSerialSource {
    fn next_serial(&mut self) -> Result<String, SerialSourceError> {
        Ok(self.0.clone())
    }
}

/// Render a raw counter body as the on-label serial format.
fn format_serial(body: &str) -> Result<String, ProvisionError> {
    let malformed = || ProvisionError::MalformedResponse(body.to_string());
    let raw: u64 = body.parse().map_err(|_| malformed())?;
    if raw > MAX_RAW_SERIAL {
        return Err(malformed());
    }
    Ok(format!("5{raw:09}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// In-memory credentials, no filesystem.
    struct FakeCredentials;

    impl CredentialSource for FakeCredentials {
        fn load(&self) -> Result<Credentials, ProvisionError> {
            Ok(Credentials {
                username: "staging".to_string(),
                password: "hunter2".to_string(),
            })
        }
    }

    #[test]
    fn format_serial_zero_pads() {
        assert_eq!(format_serial("1").unwrap(), "5000000001");
        assert_eq!(format_serial("123").unwrap(), "5000000123");
        assert_eq!(format_serial("999999999").unwrap(), "5999999999");
        assert_eq!(format_serial("0").unwrap(), "5000000000");
    }

    #[test]
    fn format_serial_rejects_junk() {
        for bad in ["", "abc", "12.5", "-1", "1000000000"] {
            let err = format_serial(bad).unwrap_err();
            assert!(
                matches!(err, ProvisionError::MalformedResponse(_)),
                "expected malformed response for {bad:?}"
            );
        }
    }

    #[test]
    fn password_file_trims_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("password.txt");
        fs::write(&path, "secret\n").unwrap();

        let creds = PasswordFile::new("staging", &path).load().unwrap();
        assert_eq!(creds.username, "staging");
        assert_eq!(creds.password, "secret");
    }

    #[test]
    fn missing_password_file_is_a_credentials_error() {
        let source = PasswordFile::new("staging", "/nonexistent/warp-label/password.txt");
        match source.load() {
            Err(ProvisionError::Credentials { path, .. }) => {
                assert!(path.ends_with("password.txt"));
            }
            other => panic!("expected credentials error, got {other:?}"),
        }
    }

    #[test]
    fn http_source_loads_credentials_eagerly() {
        // Construction succeeds with fake credentials and makes no request.
        let source =
            HttpSerialSource::new("http://127.0.0.1:9/warpsn", &FakeCredentials, DEFAULT_TIMEOUT)
                .unwrap();
        assert_eq!(source.credentials.username, "staging");
    }

    #[test]
    fn literal_source_repeats() {
        let mut source = LiteralSerialSource::new("5000000042");
        assert_eq!(source.next_serial().unwrap(), "5000000042");
        assert_eq!(source.next_serial().unwrap(), "5000000042");
    }
}
