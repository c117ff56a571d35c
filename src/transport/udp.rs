//! UDP transport implementation.

use super::{MAX_DATAGRAM, Transport};
use crate::util::bind_udp_socket;
use bytes::Bytes;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::UdpSocket;

/// UDP transport for a single target.
///
/// Owns a connected socket, so datagrams from other sources are dropped by
/// the kernel.
pub struct UdpTransport {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpTransport {
    /// Bind an ephemeral socket of the target's family and connect it.
    pub async fn connect(target: SocketAddr) -> io::Result<Self> {
        tracing::debug!(target: "easy_snmp::transport", { snmp.target = %target }, "connecting UDP transport");

        let local: SocketAddr = if target.is_ipv6() {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        };
        let socket = bind_udp_socket(local, None)?;
        socket.connect(target).await?;

        tracing::debug!(
            target: "easy_snmp::transport",
            { snmp.target = %target, snmp.local_addr = ?socket.local_addr().ok() },
            "UDP transport connected"
        );
        Ok(Self { socket, target })
    }
}

impl Transport for UdpTransport {
    async fn send(&self, data: &[u8]) -> io::Result<()> {
        tracing::trace!(target: "easy_snmp::transport", { snmp.target = %self.target, snmp.bytes = data.len() }, "UDP send");
        self.socket.send(data).await?;
        Ok(())
    }

    async fn recv(&self) -> io::Result<Bytes> {
        let mut buf = vec![0u8; MAX_DATAGRAM];
        let len = self.socket.recv(&mut buf).await?;
        buf.truncate(len);
        tracing::trace!(target: "easy_snmp::transport", { snmp.target = %self.target, snmp.bytes = len }, "UDP recv complete");
        Ok(Bytes::from(buf))
    }

    fn peer_addr(&self) -> SocketAddr {
        self.target
    }
}
