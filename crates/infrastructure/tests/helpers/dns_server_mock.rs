#![allow(dead_code)]
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

pub type Responder = Arc<dyn Fn(&[u8]) -> Vec<u8> + Send + Sync>;

/// UDP server on localhost answering every datagram through `responder`.
/// An empty response means "stay silent".
pub struct MockDnsServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(responder: Responder) -> Result<Self, std::io::Error> {
        Self::start_on(SocketAddr::from(([127, 0, 0, 1], 0)), responder).await
    }

    pub async fn start_on(addr: SocketAddr, responder: Responder) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind(addr).await?;
        let local_addr = socket.local_addr()?;
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            let response = responder(&buf[..len]);
                            if !response.is_empty() {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr: local_addr,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// TCP server on localhost speaking length-prefixed DNS.
pub struct MockTcpDnsServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockTcpDnsServer {
    pub async fn start(responder: Responder) -> Result<Self, std::io::Error> {
        Self::start_on(SocketAddr::from(([127, 0, 0, 1], 0)), responder).await
    }

    pub async fn start_on(addr: SocketAddr, responder: Responder) -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    accepted = listener.accept() => {
                        let Ok((mut stream, _)) = accepted else { continue };
                        let responder = responder.clone();
                        tokio::spawn(async move {
                            let mut len_buf = [0u8; 2];
                            if stream.read_exact(&mut len_buf).await.is_err() {
                                return;
                            }
                            let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
                            if stream.read_exact(&mut query).await.is_err() {
                                return;
                            }
                            let response = responder(&query);
                            let mut framed = (response.len() as u16).to_be_bytes().to_vec();
                            framed.extend_from_slice(&response);
                            let _ = stream.write_all(&framed).await;
                        });
                    }
                }
            }
        });

        Ok(Self {
            addr: local_addr,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Drop for MockTcpDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Echoes the query back as a response carrying one A record for the
/// question name.
pub fn answer_with(ip: [u8; 4], truncated: bool) -> Responder {
    Arc::new(move |query: &[u8]| {
        if query.len() < 12 {
            return vec![];
        }

        let mut response = Vec::with_capacity(query.len() + 16);
        response.extend_from_slice(&query[0..2]);
        response.push(if truncated { 0x83 } else { 0x81 });
        response.push(0x80);
        response.extend_from_slice(&query[4..6]);
        response.extend_from_slice(&[0x00, 0x01, 0x00, 0x00, 0x00, 0x00]);
        response.extend_from_slice(&query[12..]);
        response.extend_from_slice(&[
            0xc0, 0x0c, // question name
            0x00, 0x01, // A
            0x00, 0x01, // IN
            0x00, 0x00, 0x00, 0x3c, // TTL 60
            0x00, 0x04,
        ]);
        response.extend_from_slice(&ip);
        response
    })
}

pub fn silent() -> Responder {
    Arc::new(|_: &[u8]| Vec::new())
}
