#![allow(dead_code)]
use async_trait::async_trait;
use ferrous_recursor_domain::{decode_message, encode_message, DomainError, Message};
use ferrous_recursor_infrastructure::NameServerExchange;
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Mutex;

type Handler = Box<dyn Fn(&Message) -> Message + Send + Sync>;

enum Script {
    Reply(Handler),
    Raw(Vec<u8>),
}

/// In-memory name servers keyed by IP. Each handler sees the decoded query
/// and returns the reply body; ID, QR and the question are filled in.
/// Unknown addresses behave like a refused connection.
#[derive(Default)]
pub struct ScriptedExchange {
    servers: HashMap<IpAddr, Script>,
    calls: Mutex<Vec<(IpAddr, String)>>,
}

impl ScriptedExchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(mut self, ip: [u8; 4], handler: F) -> Self
    where
        F: Fn(&Message) -> Message + Send + Sync + 'static,
    {
        self.servers
            .insert(IpAddr::from(ip), Script::Reply(Box::new(handler)));
        self
    }

    pub fn on_raw(mut self, ip: [u8; 4], bytes: Vec<u8>) -> Self {
        self.servers.insert(IpAddr::from(ip), Script::Raw(bytes));
        self
    }

    /// `(server, question name)` for every exchange, in order.
    pub fn calls(&self) -> Vec<(IpAddr, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl NameServerExchange for ScriptedExchange {
    async fn exchange(&self, server: SocketAddr, query: &[u8]) -> Result<Vec<u8>, DomainError> {
        let query = decode_message(query)?;
        let qname = query
            .questions
            .first()
            .map(|q| q.name.clone())
            .unwrap_or_default();
        self.calls.lock().unwrap().push((server.ip(), qname));

        match self.servers.get(&server.ip()) {
            Some(Script::Reply(handler)) => {
                let mut reply = handler(&query);
                reply.header.id = query.header.id;
                reply.header.flags.response = true;
                reply.questions = query.questions.clone();
                reply.sync_counts();
                encode_message(&reply)
            }
            Some(Script::Raw(bytes)) => Ok(bytes.clone()),
            None => Err(DomainError::TransportConnectionRefused {
                server: server.to_string(),
            }),
        }
    }
}
