use std::fmt;
use std::str::FromStr;

/// Named view over the 16-bit TYPE code.
///
/// Wire structures keep the raw `u16`; this enum is for building queries,
/// dispatching RDATA decode and display. Codes not listed here map to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    NS,
    CNAME,
    SOA,
    PTR,
    HINFO,
    MX,
    TXT,
    AAAA,
    SRV,
    NAPTR,
    DNAME,
    OPT,
    DS,
    RRSIG,
    NSEC,
    DNSKEY,
    SVCB,
    HTTPS,
    ANY,
    CAA,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::NS => "NS",
            RecordType::CNAME => "CNAME",
            RecordType::SOA => "SOA",
            RecordType::PTR => "PTR",
            RecordType::HINFO => "HINFO",
            RecordType::MX => "MX",
            RecordType::TXT => "TXT",
            RecordType::AAAA => "AAAA",
            RecordType::SRV => "SRV",
            RecordType::NAPTR => "NAPTR",
            RecordType::DNAME => "DNAME",
            RecordType::OPT => "OPT",
            RecordType::DS => "DS",
            RecordType::RRSIG => "RRSIG",
            RecordType::NSEC => "NSEC",
            RecordType::DNSKEY => "DNSKEY",
            RecordType::SVCB => "SVCB",
            RecordType::HTTPS => "HTTPS",
            RecordType::ANY => "ANY",
            RecordType::CAA => "CAA",
        }
    }

    pub fn to_u16(&self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::NS => 2,
            RecordType::CNAME => 5,
            RecordType::SOA => 6,
            RecordType::PTR => 12,
            RecordType::HINFO => 13,
            RecordType::MX => 15,
            RecordType::TXT => 16,
            RecordType::AAAA => 28,
            RecordType::SRV => 33,
            RecordType::NAPTR => 35,
            RecordType::DNAME => 39,
            RecordType::OPT => 41,
            RecordType::DS => 43,
            RecordType::RRSIG => 46,
            RecordType::NSEC => 47,
            RecordType::DNSKEY => 48,
            RecordType::SVCB => 64,
            RecordType::HTTPS => 65,
            RecordType::ANY => 255,
            RecordType::CAA => 257,
        }
    }

    pub fn from_u16(code: u16) -> Option<Self> {
        match code {
            1 => Some(RecordType::A),
            2 => Some(RecordType::NS),
            5 => Some(RecordType::CNAME),
            6 => Some(RecordType::SOA),
            12 => Some(RecordType::PTR),
            13 => Some(RecordType::HINFO),
            15 => Some(RecordType::MX),
            16 => Some(RecordType::TXT),
            28 => Some(RecordType::AAAA),
            33 => Some(RecordType::SRV),
            35 => Some(RecordType::NAPTR),
            39 => Some(RecordType::DNAME),
            41 => Some(RecordType::OPT),
            43 => Some(RecordType::DS),
            46 => Some(RecordType::RRSIG),
            47 => Some(RecordType::NSEC),
            48 => Some(RecordType::DNSKEY),
            64 => Some(RecordType::SVCB),
            65 => Some(RecordType::HTTPS),
            255 => Some(RecordType::ANY),
            257 => Some(RecordType::CAA),
            _ => None,
        }
    }

    /// Types whose RDATA the codec decodes into a typed variant.
    pub fn has_typed_rdata(&self) -> bool {
        matches!(
            self,
            RecordType::A
                | RecordType::AAAA
                | RecordType::CNAME
                | RecordType::NS
                | RecordType::PTR
                | RecordType::MX
                | RecordType::TXT
                | RecordType::SOA
        )
    }

    pub fn is_address(&self) -> bool {
        matches!(self, RecordType::A | RecordType::AAAA)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "A" => Ok(RecordType::A),
            "NS" => Ok(RecordType::NS),
            "CNAME" => Ok(RecordType::CNAME),
            "SOA" => Ok(RecordType::SOA),
            "PTR" => Ok(RecordType::PTR),
            "HINFO" => Ok(RecordType::HINFO),
            "MX" => Ok(RecordType::MX),
            "TXT" => Ok(RecordType::TXT),
            "AAAA" => Ok(RecordType::AAAA),
            "SRV" => Ok(RecordType::SRV),
            "NAPTR" => Ok(RecordType::NAPTR),
            "DNAME" => Ok(RecordType::DNAME),
            "OPT" => Ok(RecordType::OPT),
            "DS" => Ok(RecordType::DS),
            "RRSIG" => Ok(RecordType::RRSIG),
            "NSEC" => Ok(RecordType::NSEC),
            "DNSKEY" => Ok(RecordType::DNSKEY),
            "SVCB" => Ok(RecordType::SVCB),
            "HTTPS" => Ok(RecordType::HTTPS),
            "ANY" => Ok(RecordType::ANY),
            "CAA" => Ok(RecordType::CAA),
            _ => Err(format!("Unknown record type: {}", s)),
        }
    }
}
