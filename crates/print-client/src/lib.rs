//! Print client for the packaging label printer.
//!
//! EZPL label printers accept jobs on the RAW port (9100): open a TCP
//! connection, send the document bytes, close. There is no handshake and no
//! acknowledgement read, so the whole protocol is "deliver fully or fail".
//! The API is synchronous (`std::net`), no async runtime required.

mod addr;
mod error;
mod tcp;

pub use addr::{DEFAULT_PORT, resolve_printer_addr};
pub use error::PrintError;
pub use tcp::{PrinterTimeouts, TcpPrinter};

/// Send data to a printer.
///
/// The one production transport is [`TcpPrinter`]; tests substitute mocks.
pub trait Printer: Send {
    /// Send raw bytes to the printer, completing fully or failing.
    fn send_raw(&mut self, data: &[u8]) -> Result<(), PrintError>;
}
