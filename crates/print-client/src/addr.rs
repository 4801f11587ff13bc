//! Printer address resolution.
//!
//! Accepts the formats users pass on the command line and in config files:
//! `IP`, `IP:PORT`, `hostname`, `hostname:PORT`. The port defaults to 9100.

use std::net::{IpAddr, SocketAddr, ToSocketAddrs};

use crate::PrintError;

/// Default raw printing port.
pub const DEFAULT_PORT: u16 = 9100;

/// Resolve a printer address string to a `SocketAddr`.
///
/// Hostnames that resolve to multiple addresses (dual-stack) use the first
/// result.
pub fn resolve_printer_addr(input: &str) -> Result<SocketAddr, PrintError> {
    // Literal socket address or bare IP first; neither touches DNS.
    if let Ok(addr) = input.parse::<SocketAddr>() {
        return Ok(addr);
    }
    if let Ok(ip) = input.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }

    // Hostname, with or without a port.
    let resolved = match input.rsplit_once(':') {
        Some(_) => input.to_socket_addrs(),
        None => (input, DEFAULT_PORT).to_socket_addrs(),
    };
    if let Ok(mut addrs) = resolved
        && let Some(addr) = addrs.next()
    {
        return Ok(addr);
    }

    Err(PrintError::NoAddressFound(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ip_with_port() {
        let addr = resolve_printer_addr("192.168.178.241:9100").unwrap();
        assert_eq!(addr.ip().to_string(), "192.168.178.241");
        assert_eq!(addr.port(), 9100);
    }

    #[test]
    fn ip_without_port_defaults() {
        let addr = resolve_printer_addr("192.168.178.241").unwrap();
        assert_eq!(addr.port(), DEFAULT_PORT);
    }

    #[test]
    fn custom_port() {
        let addr = resolve_printer_addr("10.0.0.1:6101").unwrap();
        assert_eq!(addr.port(), 6101);
    }

    #[test]
    fn ipv6_with_port() {
        let addr = resolve_printer_addr("[::1]:9100").unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 9100);
    }

    #[test]
    fn localhost_resolves() {
        let addr = resolve_printer_addr("localhost:9100").unwrap();
        assert!(addr.ip().is_loopback());
        let addr = resolve_printer_addr("localhost").unwrap();
        assert_eq!(addr.port(), DEFAULT_PORT);
    }

    #[test]
    fn unresolvable_hostname() {
        match resolve_printer_addr("no-such-host.invalid") {
            Err(PrintError::NoAddressFound(s)) => assert_eq!(s, "no-such-host.invalid"),
            other => panic!("expected NoAddressFound, got {other:?}"),
        }
    }
}
