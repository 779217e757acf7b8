#![allow(dead_code)]
use ferrous_recursor_domain::{Message, RData, RecordType, ResourceRecord, Soa, CLASS_IN};
use std::net::Ipv4Addr;

fn record(name: &str, record_type: RecordType, ttl: u32, rdata: RData) -> ResourceRecord {
    ResourceRecord::new(name, record_type.to_u16(), CLASS_IN, ttl, rdata)
}

pub fn answer_a(name: &str, ip: [u8; 4], ttl: u32) -> Message {
    let mut message = Message::default();
    message.header.flags.authoritative = true;
    message
        .answers
        .push(record(name, RecordType::A, ttl, RData::A(Ipv4Addr::from(ip))));
    message
}

pub fn glue_referral(zone: &str, servers: &[(&str, [u8; 4])]) -> Message {
    let mut message = Message::default();
    for (name, ip) in servers {
        message
            .nameservers
            .push(record(zone, RecordType::NS, 172800, RData::NS(name.to_string())));
        message
            .additionals
            .push(record(name, RecordType::A, 172800, RData::A(Ipv4Addr::from(*ip))));
    }
    message
}

pub fn ns_referral(zone: &str, servers: &[&str]) -> Message {
    let mut message = Message::default();
    for name in servers {
        message
            .nameservers
            .push(record(zone, RecordType::NS, 172800, RData::NS(name.to_string())));
    }
    message
}

pub fn soa_only(zone: &str, rcode: u8) -> Message {
    let mut message = Message::default();
    message.header.flags.authoritative = true;
    message.header.flags.response_code = rcode;
    message.nameservers.push(record(
        zone,
        RecordType::SOA,
        900,
        RData::SOA(Soa {
            mname: format!("ns1.{}", zone),
            rname: format!("hostmaster.{}", zone),
            serial: 2024010101,
            refresh: 7200,
            retry: 3600,
            expire: 1209600,
            minimum: 300,
        }),
    ));
    message
}

pub fn empty() -> Message {
    Message::default()
}
