//! DNS wire format (RFC 1035 §4).
//!
//! Everything here is pure and synchronous: a decode borrows the input
//! buffer, an encode returns a freshly grown `Vec<u8>`.
pub mod cursor;
pub mod header;
pub mod message;
pub mod name;
pub mod question;
pub mod rdata;
pub mod record;

pub use cursor::{WireReader, WireWriter};
pub use header::{peek_header, Flags, Header, HEADER_LEN};
pub use message::{decode_message, encode_message, Message};
pub use name::{read_domain_name, write_domain_name, MAX_POINTER_JUMPS};
pub use question::Question;
pub use rdata::{Mx, RData, Soa};
pub use record::ResourceRecord;

/// The Internet class.
pub const CLASS_IN: u16 = 1;
