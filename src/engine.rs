//! Protocol engine seam.
//!
//! The runtime initializes an [`Engine`] once per active epoch and asks it to
//! open one session per call. [`UdpEngine`] is the real network engine; tests
//! plug in engines whose sessions run over [`MockTransport`](crate::transport::MockTransport).

use std::net::{SocketAddr, ToSocketAddrs};

use crate::error::{Error, Result};
use crate::mib::Mib;
use crate::options::SessionConfig;
use crate::session::{Session, SnmpSession, current_thread_runtime};
use crate::transport::UdpTransport;

/// Default agent port.
pub const SNMP_PORT: u16 = 161;

/// Engine-wide lifecycle plus the session factory.
pub trait Engine: Send + Sync {
    /// One-time setup for the first active caller. Returns the MIB tree.
    fn init(&self, app: &str) -> Mib {
        tracing::debug!(target: "easy_snmp::engine", { app }, "engine init");
        Mib::builtin()
    }

    /// Teardown after the last caller leaves.
    fn shutdown(&self, app: &str) {
        tracing::debug!(target: "easy_snmp::engine", { app }, "engine shutdown");
    }

    /// Open a session for operation `app`.
    fn open(&self, app: &str, config: &SessionConfig) -> Result<Box<dyn SnmpSession>>;
}

/// Engine that talks UDP to real agents.
#[derive(Debug, Default, Clone, Copy)]
pub struct UdpEngine;

impl Engine for UdpEngine {
    fn open(&self, app: &str, config: &SessionConfig) -> Result<Box<dyn SnmpSession>> {
        let target = resolve_peer(app, &config.peer)?;
        let runtime = current_thread_runtime()
            .map_err(|e| Error::session_failure(app, &config.peer, &e.to_string()))?;
        let transport = runtime
            .block_on(UdpTransport::connect(target))
            .map_err(|e| Error::transport(app, &config.peer, &e.to_string()))?;
        let session = Session::with_runtime(runtime, app, config.clone(), transport)?;
        Ok(Box::new(session))
    }
}

/// Address family requested by a transport prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Any,
    V4,
    V6,
}

/// Split a host token into host, port and preferred family.
///
/// Accepts `host`, `host:port`, `[v6]`, `[v6]:port`, bare IPv6 literals and
/// the `udp:` / `udp6:` prefixes.
fn split_peer(peer: &str) -> Option<(&str, u16, Family)> {
    let (rest, family) = if let Some(rest) = peer.strip_prefix("udp6:") {
        (rest, Family::V6)
    } else if let Some(rest) = peer.strip_prefix("udp:") {
        (rest, Family::V4)
    } else {
        (peer, Family::Any)
    };

    let port = |p: &str| -> Option<u16> {
        if p.is_empty() {
            Some(SNMP_PORT)
        } else {
            p.parse().ok()
        }
    };

    if let Some(inner) = rest.strip_prefix('[') {
        let (host, tail) = inner.split_once(']')?;
        let port = match tail {
            "" => SNMP_PORT,
            t => port(t.strip_prefix(':')?)?,
        };
        return Some((host, port, family));
    }
    match rest.matches(':').count() {
        0 => Some((rest, SNMP_PORT, family)),
        1 => {
            let (host, p) = rest.split_once(':')?;
            Some((host, port(p)?, family))
        }
        _ => Some((rest, SNMP_PORT, family)),
    }
}

/// Resolve a host token to a socket address.
pub fn resolve_peer(app: &str, peer: &str) -> Result<SocketAddr> {
    let unknown = |host: &str| Error::session_failure(app, host, "Unknown host");
    let (host, port, family) = split_peer(peer).ok_or_else(|| unknown(peer))?;
    if host.is_empty() {
        return Err(unknown(peer));
    }
    let addrs: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|e| {
            tracing::debug!(target: "easy_snmp::engine", { host, error = %e }, "resolution failed");
            unknown(host)
        })?
        .collect();
    let pick = match family {
        Family::V4 => addrs.iter().find(|a| a.is_ipv4()),
        Family::V6 => addrs.iter().find(|a| a.is_ipv6()),
        Family::Any => addrs.iter().find(|a| a.is_ipv4()).or(addrs.first()),
    };
    let addr = pick.copied().ok_or_else(|| unknown(host))?;
    tracing::debug!(target: "easy_snmp::engine", { snmp.peer = peer, snmp.target = %addr }, "resolved peer");
    Ok(addr)
}
