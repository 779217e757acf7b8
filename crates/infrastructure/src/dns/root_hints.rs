//! Root hints (`named.root`) loading.
//!
//! Data lines are `name ttl [class] type rdata`. An `NS` line starts a new
//! candidate named by its RDATA; `A`/`AAAA` lines owned by that candidate
//! attach addresses to it.

use ferrous_recursor_domain::server::normalize_fqdn;
use ferrous_recursor_domain::{DomainError, Server};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::Path;
use tracing::{debug, info, warn};

const BUNDLED_ROOT_HINTS: &str = include_str!("../../assets/named.root");

#[derive(Debug, Clone)]
pub struct RootHints {
    servers: Vec<Server>,
}

impl RootHints {
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        let mut servers = Vec::new();
        let mut current: Option<Server> = None;

        for (line_no, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') {
                continue;
            }

            let Some((owner, rtype, rdata)) = split_fields(line) else {
                warn!(line = line_no + 1, content = %line, "Skipping malformed root hints line");
                continue;
            };

            match rtype.to_ascii_uppercase().as_str() {
                "NS" => {
                    admit(&mut servers, current.take());
                    current = Some(Server::new(rdata));
                }
                "A" | "AAAA" => {
                    let Some(server) = current.as_mut() else {
                        debug!(line = line_no + 1, owner, "Address line before any NS line");
                        continue;
                    };
                    if server.fqdn != normalize_fqdn(owner) {
                        debug!(line = line_no + 1, owner, current = %server.fqdn, "Address for a different name");
                        continue;
                    }
                    attach_address(server, rtype, rdata, line_no + 1);
                }
                other => {
                    debug!(line = line_no + 1, rtype = other, "Ignoring root hints record type");
                }
            }
        }
        admit(&mut servers, current);

        if servers.is_empty() {
            return Err(DomainError::NoRootServersFound);
        }

        debug!(count = servers.len(), "Root hints parsed");
        Ok(Self { servers })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            DomainError::IoError(format!("Failed to read root hints {}: {}", path.display(), e))
        })?;
        let hints = Self::parse(&text)?;
        info!(path = %path.display(), count = hints.len(), "Loaded root hints");
        Ok(hints)
    }

    /// Hints compiled into the binary.
    pub fn bundled() -> Result<Self, DomainError> {
        Self::parse(BUNDLED_ROOT_HINTS)
    }

    /// Loads `path` when given, the bundled hints otherwise.
    pub fn load(path: Option<&str>) -> Result<Self, DomainError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::bundled(),
        }
    }

    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    pub fn into_servers(self) -> Vec<Server> {
        self.servers
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

/// Returns `(owner, type, rdata)`, skipping the optional class column.
fn split_fields(line: &str) -> Option<(&str, &str, &str)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    match fields.as_slice() {
        [owner, _ttl, class, rtype, rdata, ..] if class.eq_ignore_ascii_case("IN") => {
            Some((*owner, *rtype, *rdata))
        }
        [owner, _ttl, rtype, rdata, ..] => Some((*owner, *rtype, *rdata)),
        _ => None,
    }
}

fn attach_address(server: &mut Server, rtype: &str, rdata: &str, line: usize) {
    if rtype.eq_ignore_ascii_case("A") {
        match rdata.parse::<Ipv4Addr>() {
            Ok(addr) => server.ipv4 = Some(addr),
            Err(_) => warn!(line, server = %server.fqdn, address = rdata, "Invalid IPv4 address in root hints"),
        }
    } else {
        match rdata.parse::<Ipv6Addr>() {
            Ok(addr) => server.ipv6 = Some(addr),
            Err(_) => warn!(line, server = %server.fqdn, address = rdata, "Invalid IPv6 address in root hints"),
        }
    }
}

fn admit(servers: &mut Vec<Server>, candidate: Option<Server>) {
    match candidate {
        Some(server) if server.has_address() => servers.push(server),
        Some(server) => warn!(server = %server.fqdn, "Root server has no usable address, skipping"),
        None => {}
    }
}
