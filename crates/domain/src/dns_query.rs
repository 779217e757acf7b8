use super::RecordType;
use crate::server::normalize_fqdn;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct DnsQuery {
    pub domain: Arc<str>,
    pub record_type: RecordType,
}

impl DnsQuery {
    pub fn new(domain: impl AsRef<str>, record_type: RecordType) -> Self {
        Self {
            domain: normalize_fqdn(domain.as_ref()).into(),
            record_type,
        }
    }
}
