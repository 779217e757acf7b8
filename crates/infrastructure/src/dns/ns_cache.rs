use dashmap::DashMap;
use ferrous_recursor_domain::server::normalize_fqdn;
use ferrous_recursor_domain::Server;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CachedServer {
    pub server: Server,
    pub expires_at: Instant,
}

impl CachedServer {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Resolved name-server addresses keyed by lower-case FQDN.
///
/// Shared by every resolution running on a resolver. Expired entries are
/// dropped lazily by `get`, or in bulk by `purge_expired`.
#[derive(Debug, Default)]
pub struct NameserverCache {
    entries: DashMap<String, CachedServer>,
}

impl NameserverCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, fqdn: &str) -> Option<Server> {
        let key = normalize_fqdn(fqdn);
        let now = Instant::now();

        if let Some(entry) = self.entries.get(&key) {
            if !entry.is_expired(now) {
                return Some(entry.server.clone());
            }
        }

        // Re-check under the shard's write lock; a concurrent `put` may have
        // refreshed the entry since the read above.
        match self.entries.entry(key) {
            dashmap::Entry::Vacant(_) => None,
            dashmap::Entry::Occupied(e) => {
                if e.get().is_expired(Instant::now()) {
                    let (fqdn, _) = e.remove_entry();
                    debug!(server = %fqdn, "Name server cache entry expired");
                    None
                } else {
                    Some(e.get().server.clone())
                }
            }
        }
    }

    pub fn put(&self, server: Server, ttl: Duration) {
        let key = normalize_fqdn(&server.fqdn);
        let expires_at = Instant::now() + ttl;
        debug!(server = %key, ttl_secs = ttl.as_secs(), "Caching name server");
        self.entries.insert(key, CachedServer { server, expires_at });
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, cached| !cached.is_expired(now));
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
