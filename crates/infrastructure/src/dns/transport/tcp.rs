//! TCP transport (RFC 1035 §4.2.2): every message carries a two-byte
//! big-endian length prefix.

use super::{io_error, timeout_error, DnsTransport};
use async_trait::async_trait;
use ferrous_recursor_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

pub struct TcpTransport {
    server_addr: SocketAddr,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    async fn connect(&self, timeout: Duration) -> Result<TcpStream, DomainError> {
        let stream = tokio::time::timeout(timeout, TcpStream::connect(self.server_addr))
            .await
            .map_err(|_| timeout_error(self.server_addr))?
            .map_err(|e| io_error(self.server_addr, "connect to", e))?;

        stream
            .set_nodelay(true)
            .map_err(|e| io_error(self.server_addr, "set TCP_NODELAY for", e))?;

        Ok(stream)
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, DomainError> {
        let server_addr = self.server_addr;
        let mut stream = self.connect(timeout).await?;

        tokio::time::timeout(timeout, send_with_length_prefix(&mut stream, message_bytes))
            .await
            .map_err(|_| timeout_error(server_addr))?
            .map_err(|e| io_error(server_addr, "send TCP query to", e))?;

        debug!(server = %server_addr, message_len = message_bytes.len(), "TCP query sent");

        let response_bytes = tokio::time::timeout(timeout, read_with_length_prefix(&mut stream))
            .await
            .map_err(|_| timeout_error(server_addr))?
            .map_err(|e| io_error(server_addr, "read TCP response from", e))?;

        debug!(server = %server_addr, response_len = response_bytes.len(), "TCP response received");

        Ok(response_bytes)
    }
}

pub(crate) async fn send_with_length_prefix<S>(
    stream: &mut S,
    message_bytes: &[u8],
) -> std::io::Result<()>
where
    S: AsyncWriteExt + Unpin,
{
    let length = u16::try_from(message_bytes.len()).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} byte message does not fit a TCP length prefix", message_bytes.len()),
        )
    })?;

    let mut framed = Vec::with_capacity(2 + message_bytes.len());
    framed.extend_from_slice(&length.to_be_bytes());
    framed.extend_from_slice(message_bytes);

    stream.write_all(&framed).await?;
    stream.flush().await
}

pub(crate) async fn read_with_length_prefix<S>(stream: &mut S) -> std::io::Result<Vec<u8>>
where
    S: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await?;

    let mut response = vec![0u8; u16::from_be_bytes(len_buf) as usize];
    stream.read_exact(&mut response).await?;
    Ok(response)
}
