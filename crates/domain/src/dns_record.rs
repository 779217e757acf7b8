pub mod record_type;
pub mod response_code;

pub use record_type::RecordType;
pub use response_code::ResponseCode;
