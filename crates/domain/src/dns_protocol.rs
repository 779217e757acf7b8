use std::fmt;
use std::net::SocketAddr;

/// Wire transport used for a single query to a single server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DnsProtocol {
    Udp { addr: SocketAddr },
    Tcp { addr: SocketAddr },
}

impl DnsProtocol {
    pub fn udp(addr: SocketAddr) -> Self {
        DnsProtocol::Udp { addr }
    }

    pub fn tcp(addr: SocketAddr) -> Self {
        DnsProtocol::Tcp { addr }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        match self {
            DnsProtocol::Udp { addr } | DnsProtocol::Tcp { addr } => *addr,
        }
    }

    /// Same server, other transport. Used for the truncation retry.
    pub fn as_tcp(&self) -> Self {
        DnsProtocol::tcp(self.socket_addr())
    }
}

impl fmt::Display for DnsProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DnsProtocol::Udp { addr } => write!(f, "udp://{}", addr),
            DnsProtocol::Tcp { addr } => write!(f, "tcp://{}", addr),
        }
    }
}
