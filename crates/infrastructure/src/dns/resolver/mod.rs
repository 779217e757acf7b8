//! Iterative resolution.

pub mod classify;
pub mod config;
pub mod exchange;
pub mod iterative;

pub use classify::{classify_reply, ReplyKind};
pub use config::ResolverConfig;
pub use exchange::{NameServerExchange, NetworkExchange};
pub use iterative::IterativeResolver;
