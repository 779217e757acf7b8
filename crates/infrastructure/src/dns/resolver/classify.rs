use ferrous_recursor_domain::{Message, RData, RecordType, Server};
use std::net::IpAddr;

/// What a name server's reply lets the resolver do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyKind {
    /// Final: answers, or an SOA-only authority section (NODATA/NXDOMAIN).
    Answer,
    /// Delegation with addresses in the additional section.
    GlueReferral(Vec<Server>),
    /// Delegation naming servers whose addresses still have to be found.
    NsReferral(Vec<String>),
    Unusable,
}

pub fn classify_reply(reply: &Message) -> ReplyKind {
    if !reply.answers.is_empty() {
        return ReplyKind::Answer;
    }

    if let [only] = reply.nameservers.as_slice() {
        if only.is_type(RecordType::SOA) {
            return ReplyKind::Answer;
        }
    }

    let glue = glue_servers(reply);
    if !glue.is_empty() {
        return ReplyKind::GlueReferral(glue);
    }

    let names = referral_names(reply);
    if !names.is_empty() {
        return ReplyKind::NsReferral(names);
    }

    ReplyKind::Unusable
}

/// A/AAAA records of the additional section, one `Server` per owner name
/// in first-seen order.
fn glue_servers(reply: &Message) -> Vec<Server> {
    let mut servers: Vec<Server> = Vec::new();

    for record in &reply.additionals {
        let ip = match &record.rdata {
            RData::A(addr) => IpAddr::V4(*addr),
            RData::AAAA(addr) => IpAddr::V6(*addr),
            _ => continue,
        };

        let candidate = Server::new(&record.name);
        match servers.iter_mut().find(|s| s.fqdn == candidate.fqdn) {
            // First address of each family wins.
            Some(existing) => {
                let free = match ip {
                    IpAddr::V4(_) => existing.ipv4.is_none(),
                    IpAddr::V6(_) => existing.ipv6.is_none(),
                };
                if free {
                    existing.attach(ip);
                }
            }
            None => {
                let mut server = candidate;
                server.attach(ip);
                servers.push(server);
            }
        }
    }

    servers
}

fn referral_names(reply: &Message) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for record in &reply.nameservers {
        if let RData::NS(name) = &record.rdata {
            if !names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
                names.push(name.clone());
            }
        }
    }
    names
}
