use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::time::Instant;

use super::stats::NetworkStats;

pub const DEFAULT_RECV_BUFFER_SIZE: usize = 64 * 1024;

/// A UDP socket on an ephemeral local port, connected to a single server.
#[derive(Debug)]
pub struct RconEndpoint {
    socket: UdpSocket,
    local_addr: SocketAddr,
    remote_addr: SocketAddr,
    recv_buffer: Vec<u8>,
    stats: NetworkStats,
}

impl RconEndpoint {
    pub fn connect(remote_addr: SocketAddr, recv_buffer_size: usize) -> io::Result<Self> {
        let bind_addr: SocketAddr = if remote_addr.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(bind_addr)?;
        socket.connect(remote_addr)?;

        let local_addr = socket.local_addr()?;
        let recv_buffer_size = if recv_buffer_size == 0 {
            DEFAULT_RECV_BUFFER_SIZE
        } else {
            recv_buffer_size
        };

        Ok(Self {
            socket,
            local_addr,
            remote_addr,
            recv_buffer: vec![0u8; recv_buffer_size],
            stats: NetworkStats::default(),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    pub fn stats(&self) -> &NetworkStats {
        &self.stats
    }

    pub fn send(&mut self, data: &[u8]) -> io::Result<usize> {
        let bytes = self.socket.send(data)?;
        self.stats.record_sent(bytes);
        Ok(bytes)
    }

    /// Blocks for one datagram until `deadline`.
    ///
    /// `Ok(None)` means the deadline passed without anything arriving.
    pub fn recv_until(&mut self, deadline: Instant) -> io::Result<Option<&[u8]>> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(None);
        }

        self.socket.set_read_timeout(Some(remaining))?;

        match self.socket.recv(&mut self.recv_buffer) {
            Ok(size) => {
                self.stats.record_received(size);
                Ok(Some(&self.recv_buffer[..size]))
            }
            Err(ref e) if is_timeout(e) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

// Unix reports an expired SO_RCVTIMEO as WouldBlock, Windows as TimedOut.
fn is_timeout(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}
