use super::cursor::{WireReader, WireWriter};
use crate::dns_record::ResponseCode;
use crate::errors::{DomainError, MessageSection};

pub const HEADER_LEN: usize = 12;

const QR_BIT: u16 = 1 << 15;
const OPCODE_SHIFT: u16 = 11;
const AA_BIT: u16 = 1 << 10;
const TC_BIT: u16 = 1 << 9;
const RD_BIT: u16 = 1 << 8;
const RA_BIT: u16 = 1 << 7;
const DO_BIT: u16 = 1 << 6;
const AD_BIT: u16 = 1 << 5;
const CD_BIT: u16 = 1 << 4;
const NIBBLE: u16 = 0x0F;

/// Second and third header octets (RFC 1035 §4.1.1, RFC 3225, RFC 4035).
///
/// `opcode` and `response_code` hold the raw 4-bit values; anything above
/// 15 is masked off on encode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flags {
    pub response: bool,
    pub opcode: u8,
    pub authoritative: bool,
    pub truncated: bool,
    pub recursion_desired: bool,
    pub recursion_available: bool,
    pub dnssec_ok: bool,
    pub authentic_data: bool,
    pub checking_disabled: bool,
    pub response_code: u8,
}

impl Flags {
    pub fn from_u16(word: u16) -> Self {
        Self {
            response: word & QR_BIT != 0,
            opcode: ((word >> OPCODE_SHIFT) & NIBBLE) as u8,
            authoritative: word & AA_BIT != 0,
            truncated: word & TC_BIT != 0,
            recursion_desired: word & RD_BIT != 0,
            recursion_available: word & RA_BIT != 0,
            dnssec_ok: word & DO_BIT != 0,
            authentic_data: word & AD_BIT != 0,
            checking_disabled: word & CD_BIT != 0,
            response_code: (word & NIBBLE) as u8,
        }
    }

    pub fn to_u16(&self) -> u16 {
        let mut word = ((self.opcode as u16) & NIBBLE) << OPCODE_SHIFT;
        word |= (self.response_code as u16) & NIBBLE;
        for (set, bit) in [
            (self.response, QR_BIT),
            (self.authoritative, AA_BIT),
            (self.truncated, TC_BIT),
            (self.recursion_desired, RD_BIT),
            (self.recursion_available, RA_BIT),
            (self.dnssec_ok, DO_BIT),
            (self.authentic_data, AD_BIT),
            (self.checking_disabled, CD_BIT),
        ] {
            if set {
                word |= bit;
            }
        }
        word
    }

    pub fn rcode(&self) -> ResponseCode {
        ResponseCode::from_u8(self.response_code)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Header {
    pub id: u16,
    pub flags: Flags,
    pub question_count: u16,
    pub answer_count: u16,
    pub authority_count: u16,
    pub additional_count: u16,
}

impl Header {
    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self, DomainError> {
        let read = |reader: &mut WireReader<'_>| {
            reader
                .read_u16()
                .map_err(|e| e.in_section(MessageSection::Header, "truncated header"))
        };

        Ok(Self {
            id: read(reader)?,
            flags: Flags::from_u16(read(reader)?),
            question_count: read(reader)?,
            answer_count: read(reader)?,
            authority_count: read(reader)?,
            additional_count: read(reader)?,
        })
    }

    pub fn encode(&self, writer: &mut WireWriter) {
        writer.write_u16(self.id);
        writer.write_u16(self.flags.to_u16());
        writer.write_u16(self.question_count);
        writer.write_u16(self.answer_count);
        writer.write_u16(self.authority_count);
        writer.write_u16(self.additional_count);
    }
}

/// Decodes only the fixed 12-byte header of a raw message.
pub fn peek_header(bytes: &[u8]) -> Result<Header, DomainError> {
    Header::decode(&mut WireReader::new(bytes))
}
