use super::classify::{classify_reply, ReplyKind};
use super::config::ResolverConfig;
use super::exchange::NameServerExchange;
use crate::dns::ns_cache::NameserverCache;
use ferrous_recursor_domain::wire::peek_header;
use ferrous_recursor_domain::{
    decode_message, encode_message, DnsQuery, DomainError, Message, RData, RecordType, Server,
};
use futures::future::{BoxFuture, FutureExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Walks the delegation tree from the root servers down to an answer.
pub struct IterativeResolver {
    roots: Vec<Server>,
    next_root: AtomicUsize,
    exchange: Arc<dyn NameServerExchange>,
    cache: NameserverCache,
    config: ResolverConfig,
}

impl IterativeResolver {
    pub fn new(
        roots: Vec<Server>,
        exchange: Arc<dyn NameServerExchange>,
        config: ResolverConfig,
    ) -> Result<Self, DomainError> {
        let roots: Vec<Server> = roots.into_iter().filter(Server::has_address).collect();
        if roots.is_empty() {
            return Err(DomainError::NoRootServersFound);
        }

        info!(
            roots = roots.len(),
            max_depth = config.max_recursion_depth,
            "Iterative resolver ready"
        );

        Ok(Self {
            roots,
            next_root: AtomicUsize::new(0),
            exchange,
            cache: NameserverCache::new(),
            config,
        })
    }

    pub fn cache(&self) -> &NameserverCache {
        &self.cache
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves `query` and returns the decoded final reply.
    pub async fn resolve(&self, query: &DnsQuery) -> Result<Message, DomainError> {
        let message = Message::query(
            fastrand::u16(..),
            &*query.domain,
            query.record_type,
            false,
        );
        let bytes = encode_message(&message)?;

        debug!(domain = %query.domain, record_type = %query.record_type, "Resolving");
        let reply = self.resolve_raw(&bytes).await?;
        decode_message(&reply)
    }

    /// Resolves an already encoded query and returns the final reply
    /// exactly as the answering server sent it.
    pub async fn resolve_raw(&self, query: &[u8]) -> Result<Vec<u8>, DomainError> {
        peek_header(query)?;
        self.resolve_with(query, self.starting_servers(), 0).await
    }

    /// The root list, rotated to start at the next round-robin position.
    fn starting_servers(&self) -> Vec<Server> {
        let start = self.next_root.fetch_add(1, Ordering::Relaxed) % self.roots.len();
        let mut servers = Vec::with_capacity(self.roots.len());
        servers.extend_from_slice(&self.roots[start..]);
        servers.extend_from_slice(&self.roots[..start]);
        servers
    }

    fn resolve_with<'a>(
        &'a self,
        query: &'a [u8],
        servers: Vec<Server>,
        depth: usize,
    ) -> BoxFuture<'a, Result<Vec<u8>, DomainError>> {
        async move {
            if depth > self.config.max_recursion_depth {
                warn!(depth, max = self.config.max_recursion_depth, "Referral chain too long");
                return Err(DomainError::RecursionDepthExceeded {
                    max: self.config.max_recursion_depth,
                });
            }

            for server in &servers {
                let Some(addr) = server.socket_addr(self.config.nameserver_port) else {
                    debug!(server = %server.fqdn, depth, "No valid IP, skipping");
                    continue;
                };

                let reply_bytes = match self.exchange.exchange(addr, query).await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        warn!(server = %server, depth, error = %e, "Server failed, trying next");
                        continue;
                    }
                };

                let reply = match decode_message(&reply_bytes) {
                    Ok(reply) => reply,
                    Err(e) => {
                        warn!(server = %server, depth, error = %e, "Malformed reply, trying next");
                        continue;
                    }
                };

                match classify_reply(&reply) {
                    ReplyKind::Answer => {
                        debug!(
                            server = %server,
                            depth,
                            rcode = %reply.response_code(),
                            answers = reply.answers.len(),
                            "Answer received"
                        );
                        return Ok(reply_bytes);
                    }
                    ReplyKind::GlueReferral(next) => {
                        debug!(server = %server, depth, next = next.len(), "Following glue referral");
                        return self.resolve_with(query, next, depth + 1).await;
                    }
                    ReplyKind::NsReferral(names) => {
                        debug!(server = %server, depth, names = names.len(), "Referral without glue");
                        let next = self.resolve_nameservers(&names, server, depth).await?;
                        if next.is_empty() {
                            warn!(server = %server, depth, "No referred name server could be resolved");
                            continue;
                        }
                        return self.resolve_with(query, next, depth + 1).await;
                    }
                    ReplyKind::Unusable => {
                        debug!(server = %server, depth, "Nothing usable in reply, trying next");
                    }
                }
            }

            Err(DomainError::AllServersFailed { depth })
        }
        .boxed()
    }

    /// Finds addresses for the NS targets of a glue-less referral, asking
    /// the server that sent the referral rather than starting over at the
    /// root.
    async fn resolve_nameservers(
        &self,
        names: &[String],
        referrer: &Server,
        depth: usize,
    ) -> Result<Vec<Server>, DomainError> {
        let mut servers = Vec::with_capacity(names.len());
        let mut depth_error = None;

        for name in names {
            if let Some(cached) = self.cache.get(name) {
                debug!(server = %cached, "Name server address from cache");
                servers.push(cached);
                continue;
            }
            // Past the depth bound only cached addresses are usable.
            if depth_error.is_some() {
                continue;
            }

            let sub_query = Message::query(fastrand::u16(..), name.as_str(), RecordType::A, false);
            let bytes = match encode_message(&sub_query) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(name = %name, error = %e, "Cannot build name server address query");
                    continue;
                }
            };

            let reply = match self
                .resolve_with(&bytes, vec![referrer.clone()], depth + 1)
                .await
            {
                Ok(reply) => reply,
                Err(e @ DomainError::RecursionDepthExceeded { .. }) => {
                    debug!(name = %name, "Name server address lookup too deep");
                    depth_error = Some(e);
                    continue;
                }
                Err(e) => {
                    warn!(name = %name, error = %e, "Name server address lookup failed");
                    continue;
                }
            };

            match decode_message(&reply).map(|reply| address_from_reply(name, &reply)) {
                Ok(Some((server, ttl))) => {
                    if ttl > 0 {
                        self.cache.put(server.clone(), Duration::from_secs(ttl as u64));
                    }
                    servers.push(server);
                }
                Ok(None) => debug!(name = %name, "No A record for name server"),
                Err(e) => warn!(name = %name, error = %e, "Malformed name server address reply"),
            }
        }

        match depth_error {
            Some(e) if servers.is_empty() => Err(e),
            _ => Ok(servers),
        }
    }
}

/// First A record of the answer section and the smallest A TTL.
fn address_from_reply(name: &str, reply: &Message) -> Option<(Server, u32)> {
    let mut server: Option<Server> = None;
    let mut min_ttl = u32::MAX;

    for record in reply.answers_of_type(RecordType::A) {
        if let RData::A(addr) = record.rdata {
            min_ttl = min_ttl.min(record.ttl);
            if server.is_none() {
                server = Some(Server::new(name).with_ipv4(addr));
            }
        }
    }

    server.map(|server| (server, min_ttl))
}
