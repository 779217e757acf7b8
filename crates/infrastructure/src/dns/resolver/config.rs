use ferrous_recursor_domain::config::ResolverSettings;
use std::time::Duration;

use crate::dns::transport::DEFAULT_QUERY_TIMEOUT;

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Referral hops allowed below the starting servers.
    pub max_recursion_depth: usize,

    pub query_timeout: Duration,

    pub tcp_fallback: bool,

    pub nameserver_port: u16,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_recursion_depth: 5,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            tcp_fallback: true,
            nameserver_port: 53,
        }
    }
}

impl ResolverConfig {
    pub fn with_max_recursion_depth(mut self, depth: usize) -> Self {
        self.max_recursion_depth = depth;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub fn with_nameserver_port(mut self, port: u16) -> Self {
        self.nameserver_port = port;
        self
    }

    pub fn without_tcp_fallback(mut self) -> Self {
        self.tcp_fallback = false;
        self
    }
}

impl From<&ResolverSettings> for ResolverConfig {
    fn from(settings: &ResolverSettings) -> Self {
        Self {
            max_recursion_depth: settings.max_recursion_depth,
            query_timeout: Duration::from_millis(settings.query_timeout_ms),
            tcp_fallback: settings.tcp_fallback,
            nameserver_port: settings.nameserver_port,
        }
    }
}
