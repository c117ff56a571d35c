//! Transport layer abstraction.
//!
//! Provides the `Transport` trait, a UDP implementation and a scripted mock.

mod mock;
mod udp;

pub use mock::*;
pub use udp::*;

use bytes::Bytes;
use std::future::Future;
use std::io;
use std::net::SocketAddr;

/// Datagram transport to a single agent.
///
/// Timeouts are applied by the session around [`Transport::recv`]. A
/// transport may also report an elapsed attempt itself by failing with
/// [`io::ErrorKind::TimedOut`].
pub trait Transport: Send + Sync {
    /// Send one encoded message to the peer.
    fn send(&self, data: &[u8]) -> impl Future<Output = io::Result<()>> + Send;

    /// Receive the next datagram from the peer.
    fn recv(&self) -> impl Future<Output = io::Result<Bytes>> + Send;

    /// The agent address this transport talks to.
    fn peer_addr(&self) -> SocketAddr;
}

/// Largest datagram accepted from an agent.
pub const MAX_DATAGRAM: usize = 65535;
