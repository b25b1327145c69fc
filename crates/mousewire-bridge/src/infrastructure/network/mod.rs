//! UDP datagram source.
//!
//! Binds one UDP socket and hands each received datagram, with its source
//! address, to the session loop. UDP keeps datagram boundaries, so one
//! `recv_from` is one protocol report; ordering and delivery are not
//! guaranteed, which is exactly what the sequence classification upstream
//! is for.

use async_trait::async_trait;
use mousewire_core::SenderId;
use tokio::net::UdpSocket;
use tracing::info;

use crate::application::session::{DatagramSource, SourceError};

/// Receive buffer size. Generously above any valid report size so that an
/// oversized datagram arrives intact and is rejected by the codec instead
/// of being silently truncated to a decodable prefix.
const RECV_BUF_LEN: usize = 1500;

/// [`DatagramSource`] implementation over a bound UDP socket.
pub struct UdpDatagramSource {
    socket: UdpSocket,
    buf: Vec<u8>,
}

impl UdpDatagramSource {
    /// Binds a UDP socket on `host:port`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Bind`] if the address cannot be bound.
    pub async fn bind(host: &str, port: u16) -> Result<Self, SourceError> {
        let addr = format!("{host}:{port}");
        let socket = UdpSocket::bind(&addr)
            .await
            .map_err(|source| SourceError::Bind {
                addr: addr.clone(),
                source,
            })?;
        info!(%addr, "listening for pointer reports");
        Ok(Self {
            socket,
            buf: vec![0u8; RECV_BUF_LEN],
        })
    }

    /// Returns the locally bound address (useful when binding port 0).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Recv`] if the socket cannot report its
    /// address.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr, SourceError> {
        self.socket.local_addr().map_err(SourceError::Recv)
    }
}

#[async_trait]
impl DatagramSource for UdpDatagramSource {
    async fn recv(&mut self) -> Result<(Vec<u8>, SenderId), SourceError> {
        let (len, addr) = self
            .socket
            .recv_from(&mut self.buf)
            .await
            .map_err(SourceError::Recv)?;
        Ok((self.buf[..len].to_vec(), SenderId::from(addr)))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
