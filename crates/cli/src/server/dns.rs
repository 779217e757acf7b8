use ferrous_recursor_domain::{decode_message, encode_message, Flags, Header, Message, ResponseCode};
use ferrous_recursor_infrastructure::IterativeResolver;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::{debug, error, info, warn};

const MAX_QUERY_SIZE: usize = 4096;
const RD_BYTE: usize = 2;
const RD_MASK: u8 = 0x01;
const RA_BYTE: usize = 3;
const RA_MASK: u8 = 0x80;

/// UDP listener handing each datagram to its own resolution task.
pub async fn start_dns_server(
    bind_addr: SocketAddr,
    resolver: Arc<IterativeResolver>,
) -> anyhow::Result<()> {
    let socket = Arc::new(UdpSocket::bind(bind_addr).await?);
    info!(bind_address = %socket.local_addr()?, "DNS server listening (UDP)");

    let mut recv_buf = vec![0u8; MAX_QUERY_SIZE];
    loop {
        let (len, client) = match socket.recv_from(&mut recv_buf).await {
            Ok(received) => received,
            Err(e) => {
                error!(error = %e, "UDP recv error");
                continue;
            }
        };

        let query = recv_buf[..len].to_vec();
        let resolver = resolver.clone();
        let socket = socket.clone();
        tokio::spawn(async move {
            if let Some(response) = handle_query(&resolver, &query, client).await {
                if let Err(e) = socket.send_to(&response, client).await {
                    warn!(client = %client, error = %e, "Failed to send response");
                }
            }
        });
    }
}

/// Resolves one client datagram. `None` means the datagram is not worth
/// answering.
pub async fn handle_query(
    resolver: &IterativeResolver,
    query: &[u8],
    client: SocketAddr,
) -> Option<Vec<u8>> {
    let request = match decode_message(query) {
        Ok(request) => request,
        Err(e) => {
            debug!(client = %client, error = %e, "Dropping malformed query");
            return formerr_for(query);
        }
    };
    if request.header.flags.response {
        debug!(client = %client, "Ignoring datagram with QR set");
        return None;
    }

    // Upstream servers are asked iteratively.
    let mut upstream = query.to_vec();
    upstream[RD_BYTE] &= !RD_MASK;

    match resolver.resolve_raw(&upstream).await {
        Ok(reply) => Some(restamp(reply, query)),
        Err(e) => {
            warn!(
                client = %client,
                domain = request.questions.first().map(|q| q.name.as_str()).unwrap_or("."),
                error = %e,
                "Resolution failed"
            );
            error_response(&request, ResponseCode::ServFail)
        }
    }
}

/// Puts the client's ID and RD bit back on an upstream reply and sets RA.
fn restamp(mut reply: Vec<u8>, query: &[u8]) -> Vec<u8> {
    if reply.len() > RA_BYTE && query.len() > RD_BYTE {
        reply[0] = query[0];
        reply[1] = query[1];
        reply[RD_BYTE] = (reply[RD_BYTE] & !RD_MASK) | (query[RD_BYTE] & RD_MASK);
        reply[RA_BYTE] |= RA_MASK;
    }
    reply
}

fn error_response(request: &Message, rcode: ResponseCode) -> Option<Vec<u8>> {
    let response = Message {
        header: Header {
            id: request.header.id,
            flags: Flags {
                response: true,
                opcode: request.header.flags.opcode,
                recursion_desired: request.header.flags.recursion_desired,
                recursion_available: true,
                checking_disabled: request.header.flags.checking_disabled,
                response_code: rcode.to_u8(),
                ..Flags::default()
            },
            ..Header::default()
        },
        questions: request.questions.clone(),
        ..Message::default()
    };

    match encode_message(&response) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            error!(error = %e, "Failed to encode error response");
            None
        }
    }
}

/// Header-only FORMERR when at least the ID can be read.
fn formerr_for(query: &[u8]) -> Option<Vec<u8>> {
    if query.len() < 2 {
        return None;
    }
    let request = Message {
        header: Header {
            id: u16::from_be_bytes([query[0], query[1]]),
            ..Header::default()
        },
        ..Message::default()
    };
    error_response(&request, ResponseCode::FormErr)
}
