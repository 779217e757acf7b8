#![allow(dead_code)]
use ferrous_recursor_domain::{
    Flags, Header, Message, Mx, Question, RData, RecordType, ResourceRecord, Soa, CLASS_IN,
};
use std::net::{Ipv4Addr, Ipv6Addr};

pub struct RecordBuilder {
    name: String,
    ttl: u32,
    rclass: u16,
}

impl RecordBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ttl: 300,
            rclass: CLASS_IN,
        }
    }

    pub fn ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn class(mut self, rclass: u16) -> Self {
        self.rclass = rclass;
        self
    }

    fn typed(self, record_type: RecordType, rdata: RData) -> ResourceRecord {
        ResourceRecord::new(self.name, record_type.to_u16(), self.rclass, self.ttl, rdata)
    }

    pub fn a(self, addr: [u8; 4]) -> ResourceRecord {
        self.typed(RecordType::A, RData::A(Ipv4Addr::from(addr)))
    }

    pub fn aaaa(self, addr: &str) -> ResourceRecord {
        let addr: Ipv6Addr = addr.parse().unwrap();
        self.typed(RecordType::AAAA, RData::AAAA(addr))
    }

    pub fn ns(self, target: &str) -> ResourceRecord {
        self.typed(RecordType::NS, RData::NS(target.to_string()))
    }

    pub fn cname(self, target: &str) -> ResourceRecord {
        self.typed(RecordType::CNAME, RData::CNAME(target.to_string()))
    }

    pub fn ptr(self, target: &str) -> ResourceRecord {
        self.typed(RecordType::PTR, RData::PTR(target.to_string()))
    }

    pub fn mx(self, preference: u16, exchange: &str) -> ResourceRecord {
        self.typed(
            RecordType::MX,
            RData::MX(Mx {
                preference,
                exchange: exchange.to_string(),
            }),
        )
    }

    pub fn txt(self, strings: &[&str]) -> ResourceRecord {
        let mut raw = Vec::new();
        for s in strings {
            raw.push(s.len() as u8);
            raw.extend_from_slice(s.as_bytes());
        }
        self.typed(RecordType::TXT, RData::TXT(raw))
    }

    pub fn soa(self, mname: &str, rname: &str, serial: u32) -> ResourceRecord {
        self.typed(
            RecordType::SOA,
            RData::SOA(Soa {
                mname: mname.to_string(),
                rname: rname.to_string(),
                serial,
                refresh: 7200,
                retry: 3600,
                expire: 1_209_600,
                minimum: 3600,
            }),
        )
    }

    pub fn unknown(self, rtype: u16, raw: &[u8]) -> ResourceRecord {
        ResourceRecord::new(self.name, rtype, self.rclass, self.ttl, RData::Unknown(raw.to_vec()))
    }
}

pub struct MessageBuilder {
    message: Message,
}

impl MessageBuilder {
    pub fn query(name: &str, record_type: RecordType) -> Self {
        Self {
            message: Message::query(0x1234, name, record_type, false),
        }
    }

    pub fn response(id: u16) -> Self {
        Self {
            message: Message {
                header: Header {
                    id,
                    flags: Flags {
                        response: true,
                        ..Flags::default()
                    },
                    ..Header::default()
                },
                ..Message::default()
            },
        }
    }

    pub fn flags(mut self, flags: Flags) -> Self {
        self.message.header.flags = flags;
        self
    }

    pub fn question(mut self, name: &str, record_type: RecordType) -> Self {
        self.message.questions.push(Question::new(name, record_type));
        self
    }

    pub fn answer(mut self, record: ResourceRecord) -> Self {
        self.message.answers.push(record);
        self
    }

    pub fn authority(mut self, record: ResourceRecord) -> Self {
        self.message.nameservers.push(record);
        self
    }

    pub fn additional(mut self, record: ResourceRecord) -> Self {
        self.message.additionals.push(record);
        self
    }

    pub fn build(mut self) -> Message {
        self.message.sync_counts();
        self.message
    }
}
