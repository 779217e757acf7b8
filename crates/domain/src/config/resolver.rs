use serde::{Deserialize, Serialize};

/// Iterative resolution settings as read from the config file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverSettings {
    /// Referral hops allowed before a resolution fails.
    #[serde(default = "default_max_recursion_depth")]
    pub max_recursion_depth: usize,

    /// Per-query timeout in milliseconds.
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// Retry over TCP when a UDP reply has the TC bit set.
    #[serde(default = "default_true")]
    pub tcp_fallback: bool,

    /// Port name servers are contacted on.
    #[serde(default = "default_nameserver_port")]
    pub nameserver_port: u16,

    /// `named.root` file to load; the bundled copy is used when unset.
    #[serde(default)]
    pub root_hints_path: Option<String>,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            max_recursion_depth: default_max_recursion_depth(),
            query_timeout_ms: default_query_timeout_ms(),
            tcp_fallback: true,
            nameserver_port: default_nameserver_port(),
            root_hints_path: None,
        }
    }
}

fn default_max_recursion_depth() -> usize {
    5
}

fn default_query_timeout_ms() -> u64 {
    5000
}

fn default_nameserver_port() -> u16 {
    53
}

fn default_true() -> bool {
    true
}
