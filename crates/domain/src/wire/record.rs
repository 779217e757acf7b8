use super::cursor::{WireReader, WireWriter};
use super::name::{read_domain_name, write_domain_name};
use super::rdata::RData;
use crate::dns_record::RecordType;
use crate::errors::DomainError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRecord {
    pub name: String,
    pub rtype: u16,
    pub rclass: u16,
    pub ttl: u32,
    pub rdlength: u16,
    pub rdata: RData,
}

impl ResourceRecord {
    /// Builds a record whose `rdlength` matches the encoded RDATA.
    pub fn new(name: impl Into<String>, rtype: u16, rclass: u16, ttl: u32, rdata: RData) -> Self {
        let rdlength = rdata.encoded_len().min(u16::MAX as usize) as u16;
        Self {
            name: name.into(),
            rtype,
            rclass,
            ttl,
            rdlength,
            rdata,
        }
    }

    pub fn record_type(&self) -> Option<RecordType> {
        RecordType::from_u16(self.rtype)
    }

    pub fn is_type(&self, record_type: RecordType) -> bool {
        self.rtype == record_type.to_u16()
    }

    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self, DomainError> {
        let name = read_domain_name(reader)?;
        let rtype = reader.read_u16()?;
        let rclass = reader.read_u16()?;
        let ttl = reader.read_u32()?;
        let rdlength = reader.read_u16()?;
        let rdata = RData::decode(reader, rtype, rdlength)?;

        Ok(Self {
            name,
            rtype,
            rclass,
            ttl,
            rdlength,
            rdata,
        })
    }

    /// Encodes the record. RDLENGTH is back-patched from the bytes actually
    /// written, so the wire is consistent even if `rdlength` is stale.
    pub fn encode(&self, writer: &mut WireWriter) -> Result<(), DomainError> {
        write_domain_name(writer, &self.name)?;
        writer.write_u16(self.rtype);
        writer.write_u16(self.rclass);
        writer.write_u32(self.ttl);

        let length_at = writer.len();
        writer.write_u16(0);
        self.rdata.encode(writer)?;

        let written = writer.len() - length_at - 2;
        let rdlength =
            u16::try_from(written).map_err(|_| DomainError::RdataLengthMismatch {
                rtype: self.rtype,
                declared: u16::MAX,
                consumed: written,
            })?;
        writer.patch_u16(length_at, rdlength)
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let type_name = match self.record_type() {
            Some(record_type) => record_type.to_string(),
            None => format!("TYPE{}", self.rtype),
        };
        let class_name = match self.rclass {
            super::CLASS_IN => "IN".to_string(),
            other => format!("CLASS{}", other),
        };
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.name, self.ttl, class_name, type_name, self.rdata
        )
    }
}
