//! BER encoding into a reverse buffer.
//!
//! Content is written before its header, so every TLV is produced back to
//! front and lengths never need to be computed up front. [`EncodeBuf::finish`]
//! flips the buffer into wire order.

use super::length::encode_length;
use super::tag;
use crate::oid::Oid;
use bytes::Bytes;

/// Reverse-order BER writer.
pub struct EncodeBuf {
    buf: Vec<u8>,
}

impl EncodeBuf {
    /// Create a buffer with room for a typical request.
    pub fn new() -> Self {
        Self::with_capacity(512)
    }

    /// Create a buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Prepend `bytes`, keeping their order in the final output.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend(bytes.iter().rev());
    }

    fn push_header(&mut self, tag: u8, len: usize) {
        let (octets, count) = encode_length(len);
        self.buf.extend_from_slice(&octets[..count]);
        self.buf.push(tag);
    }

    fn push_primitive(&mut self, tag: u8, content: &[u8]) {
        self.push_bytes(content);
        self.push_header(tag, content.len());
    }

    /// Write a constructed TLV whose contents are produced by `f`.
    ///
    /// Because the buffer grows backwards, `f` must push the last element
    /// first.
    pub fn push_constructed<F>(&mut self, tag: u8, f: F)
    where
        F: FnOnce(&mut Self),
    {
        let before = self.len();
        f(self);
        let content_len = self.len() - before;
        self.push_header(tag, content_len);
    }

    /// Write a SEQUENCE.
    pub fn push_sequence<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.push_constructed(tag::universal::SEQUENCE, f);
    }

    /// Write an INTEGER.
    pub fn push_integer(&mut self, value: i32) {
        let bytes = value.to_be_bytes();
        self.push_primitive(tag::universal::INTEGER, minimal_signed(&bytes));
    }

    /// Write a signed 64-bit value under `tag` (opaque Int64).
    pub fn push_signed64(&mut self, tag: u8, value: i64) {
        let bytes = value.to_be_bytes();
        self.push_primitive(tag, minimal_signed(&bytes));
    }

    /// Write an unsigned 32-bit value under `tag`.
    pub fn push_unsigned32(&mut self, tag: u8, value: u32) {
        self.push_unsigned(tag, &value.to_be_bytes());
    }

    /// Write an unsigned 64-bit value under `tag` (Counter64, opaque UInt64).
    pub fn push_unsigned64(&mut self, tag: u8, value: u64) {
        self.push_unsigned(tag, &value.to_be_bytes());
    }

    fn push_unsigned(&mut self, tag: u8, be: &[u8]) {
        let start = be
            .iter()
            .position(|&b| b != 0)
            .unwrap_or(be.len() - 1);
        let digits = &be[start..];
        self.push_bytes(digits);
        let mut len = digits.len();
        // a set high bit would read back as negative
        if digits[0] & 0x80 != 0 {
            self.buf.push(0);
            len += 1;
        }
        self.push_header(tag, len);
    }

    /// Write an OCTET STRING.
    pub fn push_octet_string(&mut self, data: &[u8]) {
        self.push_primitive(tag::universal::OCTET_STRING, data);
    }

    /// Write raw content under an arbitrary primitive tag.
    pub fn push_tagged(&mut self, tag: u8, data: &[u8]) {
        self.push_primitive(tag, data);
    }

    /// Write a NULL.
    pub fn push_null(&mut self) {
        self.push_header(tag::universal::NULL, 0);
    }

    /// Write an OBJECT IDENTIFIER.
    pub fn push_oid(&mut self, oid: &Oid) {
        let content = oid.to_ber();
        self.push_primitive(tag::universal::OBJECT_IDENTIFIER, &content);
    }

    /// Write an IpAddress.
    pub fn push_ip_address(&mut self, addr: [u8; 4]) {
        self.push_primitive(tag::application::IP_ADDRESS, &addr);
    }

    /// Flip into wire order.
    pub fn finish(mut self) -> Bytes {
        self.buf.reverse();
        Bytes::from(self.buf)
    }
}

impl Default for EncodeBuf {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip redundant sign octets from a big-endian two's complement value.
fn minimal_signed(be: &[u8]) -> &[u8] {
    let mut start = 0;
    while start + 1 < be.len() {
        let redundant = (be[start] == 0x00 && be[start + 1] & 0x80 == 0)
            || (be[start] == 0xFF && be[start + 1] & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    &be[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_with(f: impl FnOnce(&mut EncodeBuf)) -> Vec<u8> {
        let mut buf = EncodeBuf::new();
        f(&mut buf);
        buf.finish().to_vec()
    }

    #[test]
    fn test_integer_minimal_forms() {
        assert_eq!(encode_with(|b| b.push_integer(0)), [0x02, 0x01, 0x00]);
        assert_eq!(encode_with(|b| b.push_integer(127)), [0x02, 0x01, 0x7F]);
        assert_eq!(encode_with(|b| b.push_integer(128)), [0x02, 0x02, 0x00, 0x80]);
        assert_eq!(encode_with(|b| b.push_integer(-1)), [0x02, 0x01, 0xFF]);
        assert_eq!(encode_with(|b| b.push_integer(-129)), [0x02, 0x02, 0xFF, 0x7F]);
    }

    #[test]
    fn test_unsigned_gets_leading_zero() {
        assert_eq!(
            encode_with(|b| b.push_unsigned32(tag::application::GAUGE32, 0)),
            [0x42, 0x01, 0x00]
        );
        assert_eq!(
            encode_with(|b| b.push_unsigned32(tag::application::COUNTER32, 0xFFFF_FFFF)),
            [0x41, 0x05, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]
        );
        assert_eq!(
            encode_with(|b| b.push_unsigned64(tag::application::COUNTER64, 256)),
            [0x46, 0x02, 0x01, 0x00]
        );
    }

    #[test]
    fn test_sequence_wraps_contents() {
        let bytes = encode_with(|b| {
            b.push_sequence(|b| {
                b.push_null();
                b.push_octet_string(b"ab");
            })
        });
        assert_eq!(bytes, [0x30, 0x06, 0x04, 0x02, b'a', b'b', 0x05, 0x00]);
    }
}
