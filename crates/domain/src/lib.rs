//! Ferrous Recursor Domain Layer
//!
//! Pure, synchronous building blocks: the DNS wire codec, record types,
//! name-server descriptors, errors and configuration.
pub mod config;
pub mod dns_protocol;
pub mod dns_query;
pub mod dns_record;
pub mod errors;
pub mod server;
pub mod wire;

pub use config::{CliOverrides, Config, ConfigError};
pub use dns_protocol::DnsProtocol;
pub use dns_query::DnsQuery;
pub use dns_record::{RecordType, ResponseCode};
pub use errors::{DomainError, MessageSection};
pub use server::Server;
pub use wire::{
    decode_message, encode_message, Flags, Header, Message, Mx, Question, RData, ResourceRecord,
    Soa, CLASS_IN,
};
