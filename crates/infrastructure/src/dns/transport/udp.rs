//! UDP transport (RFC 1035 §4.2.1).
//!
//! One datagram out, one datagram in. A reply with the TC bit set is
//! returned as-is; retrying over TCP is the caller's decision.

use super::{io_error, timeout_error, DnsTransport};
use async_trait::async_trait;
use ferrous_recursor_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::debug;

/// Large enough for any EDNS(0) reply we are likely to see.
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    fn bind_addr(&self) -> SocketAddr {
        if self.server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, DomainError> {
        let server_addr = self.server_addr;

        let socket = UdpSocket::bind(self.bind_addr())
            .await
            .map_err(|e| io_error(server_addr, "bind UDP socket for", e))?;
        // Connected sockets only accept datagrams from the server and
        // surface ICMP port-unreachable as ConnectionRefused.
        socket
            .connect(server_addr)
            .await
            .map_err(|e| io_error(server_addr, "connect UDP socket to", e))?;

        let bytes_sent = tokio::time::timeout(timeout, socket.send(message_bytes))
            .await
            .map_err(|_| timeout_error(server_addr))?
            .map_err(|e| io_error(server_addr, "send UDP query to", e))?;

        debug!(server = %server_addr, bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let bytes_received = tokio::time::timeout(timeout, socket.recv(&mut recv_buf))
            .await
            .map_err(|_| timeout_error(server_addr))?
            .map_err(|e| io_error(server_addr, "receive UDP response from", e))?;
        recv_buf.truncate(bytes_received);

        validate_response_id(message_bytes, &recv_buf, server_addr)?;

        debug!(server = %server_addr, bytes_received, "UDP response received");

        Ok(recv_buf)
    }
}

pub(crate) fn validate_response_id(
    query: &[u8],
    response: &[u8],
    server: SocketAddr,
) -> Result<(), DomainError> {
    if query.len() < 2 || response.len() < 2 {
        return Err(DomainError::IoError(format!(
            "UDP exchange with {} too short to carry a message ID",
            server
        )));
    }
    if query[..2] != response[..2] {
        return Err(DomainError::IoError(format!(
            "UDP response ID mismatch from {}: sent {:02x}{:02x}, got {:02x}{:02x}",
            server, query[0], query[1], response[0], response[1]
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "udp_test.rs"]
mod tests;
