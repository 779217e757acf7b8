pub mod dns_server_mock;
pub mod replies;
pub mod scripted_exchange;

#[allow(unused_imports)]
pub use dns_server_mock::{MockDnsServer, MockTcpDnsServer};
#[allow(unused_imports)]
pub use scripted_exchange::ScriptedExchange;
