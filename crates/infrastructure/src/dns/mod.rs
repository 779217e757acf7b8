pub mod ns_cache;
pub mod resolver;
pub mod root_hints;
pub mod transport;

pub use ns_cache::{CachedServer, NameserverCache};
pub use resolver::{
    classify_reply, IterativeResolver, NameServerExchange, NetworkExchange, ReplyKind,
    ResolverConfig,
};
pub use root_hints::RootHints;
pub use transport::{create_transport, send_query, DnsTransport, Transport};
