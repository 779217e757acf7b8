use super::config::ResolverConfig;
use crate::dns::transport::send_query;
use async_trait::async_trait;
use ferrous_recursor_domain::wire::peek_header;
use ferrous_recursor_domain::{DnsProtocol, DomainError};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::debug;

/// One query/reply round trip with a single name server.
#[async_trait]
pub trait NameServerExchange: Send + Sync {
    async fn exchange(&self, server: SocketAddr, query: &[u8]) -> Result<Vec<u8>, DomainError>;
}

/// UDP first; the identical query is repeated over TCP when the UDP reply
/// comes back truncated.
#[derive(Debug, Clone)]
pub struct NetworkExchange {
    timeout: Duration,
    tcp_fallback: bool,
}

impl NetworkExchange {
    pub fn new(timeout: Duration, tcp_fallback: bool) -> Self {
        Self {
            timeout,
            tcp_fallback,
        }
    }
}

impl From<&ResolverConfig> for NetworkExchange {
    fn from(config: &ResolverConfig) -> Self {
        Self::new(config.query_timeout, config.tcp_fallback)
    }
}

#[async_trait]
impl NameServerExchange for NetworkExchange {
    async fn exchange(&self, server: SocketAddr, query: &[u8]) -> Result<Vec<u8>, DomainError> {
        let udp = DnsProtocol::udp(server);
        let reply = send_query(&udp, query, self.timeout).await?;

        let truncated = peek_header(&reply)
            .map(|header| header.flags.truncated)
            .unwrap_or(false);
        if !truncated || !self.tcp_fallback {
            return Ok(reply);
        }

        let tcp = udp.as_tcp();
        debug!(upstream = %tcp, udp_len = reply.len(), "Truncated UDP reply, retrying");
        send_query(&tcp, query, self.timeout).await
    }
}
