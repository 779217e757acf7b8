use super::cursor::{WireReader, WireWriter};
use super::name::{read_domain_name, write_domain_name};
use super::CLASS_IN;
use crate::dns_record::RecordType;
use crate::errors::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Question {
    pub name: String,
    pub qtype: u16,
    pub qclass: u16,
}

impl Question {
    pub fn new(name: impl Into<String>, record_type: RecordType) -> Self {
        Self {
            name: name.into(),
            qtype: record_type.to_u16(),
            qclass: CLASS_IN,
        }
    }

    pub fn record_type(&self) -> Option<RecordType> {
        RecordType::from_u16(self.qtype)
    }

    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self, DomainError> {
        let name = read_domain_name(reader)?;
        let qtype = reader.read_u16()?;
        let qclass = reader.read_u16()?;
        Ok(Self {
            name,
            qtype,
            qclass,
        })
    }

    pub fn encode(&self, writer: &mut WireWriter) -> Result<(), DomainError> {
        write_domain_name(writer, &self.name)?;
        writer.write_u16(self.qtype);
        writer.write_u16(self.qclass);
        Ok(())
    }
}
