//! Internal utilities.

use std::io;
use std::net::SocketAddr;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;

/// Create and bind a UDP socket with optional receive buffer size.
///
/// IPv6 sockets are dual-stack (`IPV6_V6ONLY = false`). Must be called
/// inside a tokio runtime.
pub(crate) fn bind_udp_socket(
    addr: SocketAddr,
    recv_buffer_size: Option<usize>,
) -> io::Result<UdpSocket> {
    let domain = if addr.is_ipv6() {
        Domain::IPV6
    } else {
        Domain::IPV4
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;

    if addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }

    if let Some(size) = recv_buffer_size {
        // the kernel caps this at rmem_max
        let _ = socket.set_recv_buffer_size(size);
    }

    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;

    UdpSocket::from_std(socket.into())
}

/// Parse a hex string such as `800000020109840301` or `0x8000...`.
///
/// Whitespace and `:` separators between octets are ignored.
pub(crate) fn parse_hex(s: &str) -> Option<Vec<u8>> {
    let s = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    let digits: Vec<u8> = s
        .bytes()
        .filter(|b| !b.is_ascii_whitespace() && *b != b':')
        .collect();
    if digits.len() % 2 != 0 {
        return None;
    }
    digits
        .chunks(2)
        .map(|pair| {
            let hi = (pair[0] as char).to_digit(16)?;
            let lo = (pair[1] as char).to_digit(16)?;
            Some((hi * 16 + lo) as u8)
        })
        .collect()
}

/// Parse whitespace-separated octets such as `00 1A FF`.
///
/// Returns the first part that is not one or two hex digits on failure.
pub(crate) fn parse_hex_octets(s: &str) -> Result<Vec<u8>, &str> {
    s.split_whitespace()
        .map(|part| {
            if part.len() > 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(part);
            }
            u8::from_str_radix(part, 16).map_err(|_| part)
        })
        .collect()
}

/// `strtol(s, &end, 0)`: optional sign, then `0x` hex, leading-zero octal or
/// decimal digits. Returns the value and the unparsed rest, or `None` when
/// no digit was consumed.
pub(crate) fn parse_c_long(s: &str) -> Option<(i64, &str)> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    let mut negative = false;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        negative = bytes[i] == b'-';
        i += 1;
    }
    let (radix, start) = if bytes[i..].starts_with(b"0x") || bytes[i..].starts_with(b"0X") {
        (16, i + 2)
    } else if bytes.get(i) == Some(&b'0') {
        (8, i)
    } else {
        (10, i)
    };
    let mut end = start;
    let mut value: i64 = 0;
    while let Some(d) = bytes.get(end).and_then(|b| (*b as char).to_digit(radix)) {
        value = value.saturating_mul(radix as i64).saturating_add(d as i64);
        end += 1;
    }
    if end == start {
        // "0x" with no hex digits still consumed the zero
        return if radix == 16 { Some((0, &s[i + 1..])) } else { None };
    }
    Some((if negative { -value } else { value }, &s[end..]))
}
