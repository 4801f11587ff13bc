//! Typed error types for the print client.

use std::io;
use std::time::Duration;

/// Printer transport failures.
///
/// Every variant is fatal: a label job is either delivered in full or the
/// run aborts without printing.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum PrintError {
    /// The printer actively refused the connection (e.g. port not open).
    #[error("connection refused: {addr}")]
    ConnectionRefused {
        /// The address that was attempted.
        addr: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// TCP connect timed out before the printer responded.
    #[error("connection timed out: {addr} ({timeout:?})")]
    ConnectionTimeout {
        /// The address that was attempted.
        addr: String,
        /// The configured timeout that elapsed.
        timeout: Duration,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Connection failed for a reason other than refusal or timeout.
    #[error("connection failed: {addr}")]
    ConnectionFailed {
        /// The address that was attempted.
        addr: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// DNS resolution found no addresses for the given input.
    #[error("no address found for printer: {0}")]
    NoAddressFound(String),

    /// Writing the label data failed; short and interrupted sends surface
    /// here as well.
    #[error("write failed: {0}")]
    WriteFailed(#[source] io::Error),
}
