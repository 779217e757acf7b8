//! Ferrous Recursor Infrastructure Layer
//!
//! Network transports, root hints loading, the name-server cache and the
//! iterative resolution engine.
pub mod dns;

pub use dns::{
    IterativeResolver, NameServerExchange, NameserverCache, NetworkExchange, ResolverConfig,
    RootHints,
};
