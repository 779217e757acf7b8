use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

/// A name server the resolver can query.
///
/// Built from root hints, from glue in a referral, or by resolving the
/// address of an NS target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Server {
    pub fqdn: String,
    pub ipv4: Option<Ipv4Addr>,
    pub ipv6: Option<Ipv6Addr>,
}

impl Server {
    pub fn new(fqdn: impl AsRef<str>) -> Self {
        Self {
            fqdn: normalize_fqdn(fqdn.as_ref()),
            ipv4: None,
            ipv6: None,
        }
    }

    pub fn with_ipv4(mut self, addr: Ipv4Addr) -> Self {
        self.ipv4 = Some(addr);
        self
    }

    pub fn with_ipv6(mut self, addr: Ipv6Addr) -> Self {
        self.ipv6 = Some(addr);
        self
    }

    pub fn has_address(&self) -> bool {
        self.ipv4.is_some() || self.ipv6.is_some()
    }

    /// IPv4 when present, IPv6 otherwise.
    pub fn preferred_ip(&self) -> Option<IpAddr> {
        self.ipv4
            .map(IpAddr::V4)
            .or_else(|| self.ipv6.map(IpAddr::V6))
    }

    pub fn socket_addr(&self, port: u16) -> Option<SocketAddr> {
        self.preferred_ip().map(|ip| SocketAddr::new(ip, port))
    }

    /// Attaches `ip` to the matching address family slot.
    pub fn attach(&mut self, ip: IpAddr) {
        match ip {
            IpAddr::V4(v4) => self.ipv4 = Some(v4),
            IpAddr::V6(v6) => self.ipv6 = Some(v6),
        }
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.preferred_ip() {
            Some(ip) => write!(f, "{} ({})", self.fqdn, ip),
            None => write!(f, "{} (no address)", self.fqdn),
        }
    }
}

/// Lower-cases `name` and appends the root dot if missing.
pub fn normalize_fqdn(name: &str) -> String {
    let mut fqdn = name.trim().to_ascii_lowercase();
    if !fqdn.ends_with('.') {
        fqdn.push('.');
    }
    fqdn
}
