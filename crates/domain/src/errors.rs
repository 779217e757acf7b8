use std::fmt;
use thiserror::Error;

/// Message section a codec error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSection {
    Header,
    Question,
    Answer,
    Authority,
    Additional,
}

impl MessageSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageSection::Header => "header",
            MessageSection::Question => "question",
            MessageSection::Answer => "answer",
            MessageSection::Authority => "authority",
            MessageSection::Additional => "additional",
        }
    }
}

impl fmt::Display for MessageSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Read out of bounds at offset {offset}: requested {requested} bytes, {available} available")]
    OutOfBounds {
        offset: usize,
        requested: usize,
        available: usize,
    },

    #[error("Invalid DNS message ({section}): {reason}")]
    InvalidMessage {
        section: MessageSection,
        reason: String,
    },

    #[error("RDATA length mismatch for type {rtype}: declared {declared}, consumed {consumed}")]
    RdataLengthMismatch {
        rtype: u16,
        declared: u16,
        consumed: usize,
    },

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid IP address: {0}")]
    InvalidIp(String),

    #[error("No root servers found")]
    NoRootServersFound,

    #[error("Recursion depth exceeded (max {max})")]
    RecursionDepthExceeded { max: usize },

    #[error("All name servers failed at depth {depth}")]
    AllServersFailed { depth: usize },

    #[error("Transport timeout talking to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    /// Attaches the failing section to a codec error. Name and address errors
    /// keep their kind; everything else becomes `InvalidMessage`.
    pub(crate) fn in_section(self, section: MessageSection, context: &str) -> Self {
        match self {
            DomainError::InvalidMessage { .. } => self,
            DomainError::InvalidDomainName(msg) => {
                DomainError::InvalidDomainName(format!("{} {}: {}", section, context, msg))
            }
            DomainError::InvalidIp(msg) => {
                DomainError::InvalidIp(format!("{} {}: {}", section, context, msg))
            }
            other => DomainError::InvalidMessage {
                section,
                reason: format!("{}: {}", context, other),
            },
        }
    }
}
