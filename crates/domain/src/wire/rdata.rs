//! Typed RDATA.
//!
//! The set of modelled record kinds is closed; everything else is carried
//! verbatim in [`RData::Unknown`] so unfamiliar types never fail a decode.

use super::cursor::{WireReader, WireWriter};
use super::name::{encoded_name_len, read_domain_name, write_domain_name};
use crate::dns_record::RecordType;
use crate::errors::DomainError;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mx {
    pub preference: u16,
    pub exchange: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Soa {
    pub mname: String,
    pub rname: String,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minimum: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RData {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    CNAME(String),
    NS(String),
    PTR(String),
    /// Raw TXT payload, character-string length prefixes included.
    TXT(Vec<u8>),
    MX(Mx),
    SOA(Soa),
    Unknown(Vec<u8>),
}

impl RData {
    /// Decodes `rdlength` bytes of RDATA for `rtype` at the reader's offset.
    ///
    /// Decoding is confined to `offset + rdlength`; length-prefixed kinds
    /// must consume exactly that many bytes. On success the reader is moved
    /// to the end of the RDATA.
    pub fn decode(
        reader: &mut WireReader<'_>,
        rtype: u16,
        rdlength: u16,
    ) -> Result<Self, DomainError> {
        let start = reader.offset();
        let end = start + rdlength as usize;
        let mut body = reader.limit_to(end)?;

        let rdata = match RecordType::from_u16(rtype) {
            Some(RecordType::A) => {
                if rdlength != 4 {
                    return Err(DomainError::InvalidIp(format!(
                        "A record with {} bytes of RDATA",
                        rdlength
                    )));
                }
                let octets = body.read_bytes(4)?;
                RData::A(Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]))
            }
            Some(RecordType::AAAA) => {
                if rdlength != 16 {
                    return Err(DomainError::InvalidIp(format!(
                        "AAAA record with {} bytes of RDATA",
                        rdlength
                    )));
                }
                let mut octets = [0u8; 16];
                octets.copy_from_slice(body.read_bytes(16)?);
                RData::AAAA(Ipv6Addr::from(octets))
            }
            Some(RecordType::CNAME) => RData::CNAME(read_domain_name(&mut body)?),
            Some(RecordType::NS) => RData::NS(read_domain_name(&mut body)?),
            Some(RecordType::PTR) => RData::PTR(read_domain_name(&mut body)?),
            Some(RecordType::MX) => RData::MX(Mx {
                preference: body.read_u16()?,
                exchange: read_domain_name(&mut body)?,
            }),
            Some(RecordType::SOA) => RData::SOA(Soa {
                mname: read_domain_name(&mut body)?,
                rname: read_domain_name(&mut body)?,
                serial: body.read_u32()?,
                refresh: body.read_u32()?,
                retry: body.read_u32()?,
                expire: body.read_u32()?,
                minimum: body.read_u32()?,
            }),
            Some(RecordType::TXT) => RData::TXT(body.read_bytes(rdlength as usize)?.to_vec()),
            _ => RData::Unknown(body.read_bytes(rdlength as usize)?.to_vec()),
        };

        if body.offset() != end {
            return Err(DomainError::RdataLengthMismatch {
                rtype,
                declared: rdlength,
                consumed: body.offset() - start,
            });
        }

        reader.seek(end)?;
        Ok(rdata)
    }

    pub fn encode(&self, writer: &mut WireWriter) -> Result<(), DomainError> {
        match self {
            RData::A(addr) => writer.write_bytes(&addr.octets()),
            RData::AAAA(addr) => writer.write_bytes(&addr.octets()),
            RData::CNAME(name) | RData::NS(name) | RData::PTR(name) => {
                write_domain_name(writer, name)?
            }
            RData::MX(mx) => {
                writer.write_u16(mx.preference);
                write_domain_name(writer, &mx.exchange)?;
            }
            RData::SOA(soa) => {
                write_domain_name(writer, &soa.mname)?;
                write_domain_name(writer, &soa.rname)?;
                writer.write_u32(soa.serial);
                writer.write_u32(soa.refresh);
                writer.write_u32(soa.retry);
                writer.write_u32(soa.expire);
                writer.write_u32(soa.minimum);
            }
            RData::TXT(raw) | RData::Unknown(raw) => writer.write_bytes(raw),
        }
        Ok(())
    }

    /// Byte length `encode` produces.
    pub fn encoded_len(&self) -> usize {
        match self {
            RData::A(_) => 4,
            RData::AAAA(_) => 16,
            RData::CNAME(name) | RData::NS(name) | RData::PTR(name) => encoded_name_len(name),
            RData::MX(mx) => 2 + encoded_name_len(&mx.exchange),
            RData::SOA(soa) => encoded_name_len(&soa.mname) + encoded_name_len(&soa.rname) + 20,
            RData::TXT(raw) | RData::Unknown(raw) => raw.len(),
        }
    }

    /// Record type this variant is decoded from, `None` for `Unknown`.
    pub fn record_type(&self) -> Option<RecordType> {
        match self {
            RData::A(_) => Some(RecordType::A),
            RData::AAAA(_) => Some(RecordType::AAAA),
            RData::CNAME(_) => Some(RecordType::CNAME),
            RData::NS(_) => Some(RecordType::NS),
            RData::PTR(_) => Some(RecordType::PTR),
            RData::TXT(_) => Some(RecordType::TXT),
            RData::MX(_) => Some(RecordType::MX),
            RData::SOA(_) => Some(RecordType::SOA),
            RData::Unknown(_) => None,
        }
    }

    /// Splits a TXT payload into its character-strings. A truncated trailing
    /// string is returned as far as it goes.
    pub fn txt_strings(&self) -> Vec<String> {
        let RData::TXT(raw) = self else {
            return vec![];
        };

        let mut strings = Vec::new();
        let mut pos = 0;
        while pos < raw.len() {
            let len = raw[pos] as usize;
            let end = (pos + 1 + len).min(raw.len());
            strings.push(String::from_utf8_lossy(&raw[pos + 1..end]).into_owned());
            pos = end;
        }
        strings
    }
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RData::A(addr) => write!(f, "{}", addr),
            RData::AAAA(addr) => write!(f, "{}", addr),
            RData::CNAME(name) | RData::NS(name) | RData::PTR(name) => f.write_str(name),
            RData::MX(mx) => write!(f, "{} {}", mx.preference, mx.exchange),
            RData::SOA(soa) => write!(
                f,
                "{} {} {} {} {} {} {}",
                soa.mname, soa.rname, soa.serial, soa.refresh, soa.retry, soa.expire, soa.minimum
            ),
            RData::TXT(_) => {
                let quoted: Vec<String> = self
                    .txt_strings()
                    .iter()
                    .map(|s| format!("\"{}\"", s))
                    .collect();
                f.write_str(&quoted.join(" "))
            }
            RData::Unknown(raw) => {
                // RFC 3597 generic presentation.
                write!(f, "\\# {}", raw.len())?;
                if !raw.is_empty() {
                    f.write_str(" ")?;
                    for byte in raw {
                        write!(f, "{:02x}", byte)?;
                    }
                }
                Ok(())
            }
        }
    }
}
