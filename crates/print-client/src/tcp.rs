//! TCP transport for the label printer (port 9100 / JetDirect / RAW).

use std::io::{self, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

use socket2::{SockRef, TcpKeepalive};

use crate::addr::resolve_printer_addr;
use crate::{PrintError, Printer};

/// Timeout settings for printer connections.
///
/// Defaults are tuned for a LAN-connected label printer: 5 s to connect,
/// 30 s to write (a full batch of patched labels is still well under a
/// megabyte, but the printer may stall mid-job while feeding stock).
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct PrinterTimeouts {
    /// Maximum time to wait for the TCP connection to establish.
    pub connect: Duration,
    /// Maximum time to wait for a write to complete.
    pub write: Duration,
}

impl Default for PrinterTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(5),
            write: Duration::from_secs(30),
        }
    }
}

/// A synchronous TCP connection to the label printer.
///
/// The job protocol is one-shot: connect, send the full byte buffer, close.
/// The printer sends nothing back.
#[derive(Debug)]
pub struct TcpPrinter {
    stream: TcpStream,
    addr: SocketAddr,
}

impl TcpPrinter {
    /// Connect to a printer at the given address.
    ///
    /// The address can be any format accepted by [`resolve_printer_addr`]:
    /// `IP`, `IP:PORT`, `hostname`, `hostname:PORT`. Port defaults to 9100.
    ///
    /// Configures the socket with TCP_NODELAY, TCP keepalive, and the write
    /// timeout from `timeouts`.
    pub fn connect(addr: &str, timeouts: PrinterTimeouts) -> Result<Self, PrintError> {
        let socket_addr = resolve_printer_addr(addr)?;

        let stream =
            TcpStream::connect_timeout(&socket_addr, timeouts.connect).map_err(|e| {
                match e.kind() {
                    io::ErrorKind::ConnectionRefused => PrintError::ConnectionRefused {
                        addr: socket_addr.to_string(),
                        source: e,
                    },
                    io::ErrorKind::TimedOut => PrintError::ConnectionTimeout {
                        addr: socket_addr.to_string(),
                        timeout: timeouts.connect,
                        source: e,
                    },
                    _ => PrintError::ConnectionFailed {
                        addr: socket_addr.to_string(),
                        source: e,
                    },
                }
            })?;

        configure_stream(&stream, &socket_addr, &timeouts)?;

        Ok(Self {
            stream,
            addr: socket_addr,
        })
    }

    /// Return the resolved socket address this printer is connected to.
    pub fn remote_addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Printer for TcpPrinter {
    fn send_raw(&mut self, data: &[u8]) -> Result<(), PrintError> {
        self.stream
            .write_all(data)
            .map_err(PrintError::WriteFailed)?;
        self.stream.flush().map_err(PrintError::WriteFailed)?;
        Ok(())
    }
}

impl Drop for TcpPrinter {
    fn drop(&mut self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

// ── Helpers ────────────────────────────────────────────────────────────────

/// Configure TCP_NODELAY, keepalive, and the write timeout on a stream.
fn configure_stream(
    stream: &TcpStream,
    addr: &SocketAddr,
    timeouts: &PrinterTimeouts,
) -> Result<(), PrintError> {
    let failed = |e: io::Error| PrintError::ConnectionFailed {
        addr: addr.to_string(),
        source: e,
    };

    // TCP_NODELAY -- the job is a single burst, nothing to coalesce.
    stream.set_nodelay(true).map_err(failed)?;

    configure_keepalive(stream, Duration::from_secs(60)).map_err(failed)?;

    stream
        .set_write_timeout(Some(timeouts.write))
        .map_err(failed)?;

    Ok(())
}

/// Configure TCP keepalive on a `TcpStream` via `socket2`.
fn configure_keepalive(stream: &TcpStream, interval: Duration) -> io::Result<()> {
    let keepalive = TcpKeepalive::new().with_time(interval);

    #[cfg(any(target_os = "linux", target_os = "macos"))]
    let keepalive = keepalive.with_interval(interval);

    SockRef::from(stream).set_tcp_keepalive(&keepalive)?;
    Ok(())
}
