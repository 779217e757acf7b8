//! Single-exchange DNS transports.
//!
//! A transport sends one query to one address and returns the raw reply.
//! Choosing between UDP and TCP is left to the caller.

pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use ferrous_recursor_domain::{DnsProtocol, DomainError};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

/// Query timeout used when the configuration does not say otherwise.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, DomainError>;
}

pub enum Transport {
    Udp(udp::UdpTransport),
    Tcp(tcp::TcpTransport),
}

impl Transport {
    pub async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, DomainError> {
        match self {
            Self::Udp(t) => DnsTransport::send(t, message_bytes, timeout).await,
            Self::Tcp(t) => DnsTransport::send(t, message_bytes, timeout).await,
        }
    }
}

pub fn create_transport(protocol: &DnsProtocol) -> Transport {
    match protocol {
        DnsProtocol::Udp { addr } => Transport::Udp(udp::UdpTransport::new(*addr)),
        DnsProtocol::Tcp { addr } => Transport::Tcp(tcp::TcpTransport::new(*addr)),
    }
}

/// Sends `message_bytes` over `protocol` and returns the reply with any
/// TCP framing removed.
pub async fn send_query(
    protocol: &DnsProtocol,
    message_bytes: &[u8],
    timeout: Duration,
) -> Result<Vec<u8>, DomainError> {
    create_transport(protocol)
        .send(message_bytes, timeout)
        .await
}

pub(crate) fn timeout_error(server: SocketAddr) -> DomainError {
    DomainError::TransportTimeout {
        server: server.to_string(),
    }
}

pub(crate) fn io_error(server: SocketAddr, action: &str, err: io::Error) -> DomainError {
    match err.kind() {
        io::ErrorKind::ConnectionRefused => DomainError::TransportConnectionRefused {
            server: server.to_string(),
        },
        io::ErrorKind::TimedOut => timeout_error(server),
        _ => DomainError::IoError(format!("{} {}: {}", action, server, err)),
    }
}
