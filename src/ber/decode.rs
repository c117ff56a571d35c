//! BER decoding over a shared `Bytes` buffer.
//!
//! Sub-decoders slice the same allocation, so nested SEQUENCEs and OCTET
//! STRING values are zero-copy. Parsing is permissive where net-snmp is:
//! non-minimal integers and lengths are accepted, over-long 32-bit integers
//! are truncated with a warning.

use super::length::decode_length;
use super::tag;
use crate::error::{DecodeErrorKind, Error, Result};
use crate::oid::Oid;
use bytes::Bytes;

/// Cursor over BER data.
pub struct Decoder {
    data: Bytes,
    offset: usize,
    /// Offset of `data[0]` within the outermost buffer, for error reporting.
    base: usize,
}

impl Decoder {
    /// Decode from owned bytes.
    pub fn new(data: Bytes) -> Self {
        Self {
            data,
            offset: 0,
            base: 0,
        }
    }

    /// Decode from a slice (copies).
    pub fn from_slice(data: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(data))
    }

    /// Absolute offset of the cursor.
    pub fn offset(&self) -> usize {
        self.base + self.offset
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Whether the cursor is at the end.
    pub fn is_empty(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Next tag without consuming it.
    pub fn peek_tag(&self) -> Option<u8> {
        self.data.get(self.offset).copied()
    }

    fn fail<T>(&self, kind: DecodeErrorKind) -> Result<T> {
        tracing::debug!(target: "easy_snmp::ber", { snmp.offset = self.offset(), kind = %kind }, "decode error");
        Err(Error::decode(self.offset(), kind))
    }

    /// Read a tag octet.
    pub fn read_tag(&mut self) -> Result<u8> {
        match self.peek_tag() {
            Some(t) => {
                self.offset += 1;
                Ok(t)
            }
            None => self.fail(DecodeErrorKind::TruncatedData),
        }
    }

    /// Read length octets.
    pub fn read_length(&mut self) -> Result<usize> {
        let (len, used) = decode_length(&self.data[self.offset..], self.offset())?;
        self.offset += used;
        Ok(len)
    }

    /// Take `len` bytes without copying.
    pub fn read_bytes(&mut self, len: usize) -> Result<Bytes> {
        let end = self.offset.saturating_add(len);
        if end > self.data.len() {
            return self.fail(DecodeErrorKind::TruncatedData);
        }
        let out = self.data.slice(self.offset..end);
        self.offset = end;
        Ok(out)
    }

    /// Read a tag, require it to be `expected`, and return the length.
    pub fn expect_tag(&mut self, expected: u8) -> Result<usize> {
        let actual = self.read_tag()?;
        if actual != expected {
            self.offset -= 1;
            return self.fail(DecodeErrorKind::UnexpectedTag { expected, actual });
        }
        self.read_length()
    }

    /// Read an INTEGER.
    pub fn read_integer(&mut self) -> Result<i32> {
        let len = self.expect_tag(tag::universal::INTEGER)?;
        self.read_integer_value(len)
    }

    /// Read integer content of `len` octets, sign-extended.
    pub fn read_integer_value(&mut self, len: usize) -> Result<i32> {
        if len == 0 {
            return self.fail(DecodeErrorKind::ZeroLengthInteger);
        }
        if len > 4 {
            tracing::warn!(target: "easy_snmp::ber", { snmp.offset = self.offset(), length = len }, "integer too long, truncating to 4 bytes");
        }
        let bytes = self.read_bytes(len)?;
        let seed: i32 = if bytes[0] & 0x80 != 0 { -1 } else { 0 };
        Ok(bytes
            .iter()
            .take(4)
            .fold(seed, |acc, &b| (acc << 8) | b as i32))
    }

    /// Read a signed 64-bit value of `len` octets (opaque Int64).
    pub fn read_signed64_value(&mut self, len: usize) -> Result<i64> {
        if len == 0 {
            return self.fail(DecodeErrorKind::ZeroLengthInteger);
        }
        if len > 8 {
            return self.fail(DecodeErrorKind::Integer64TooLong { length: len });
        }
        let bytes = self.read_bytes(len)?;
        let seed: i64 = if bytes[0] & 0x80 != 0 { -1 } else { 0 };
        Ok(bytes.iter().fold(seed, |acc, &b| (acc << 8) | b as i64))
    }

    /// Read an unsigned 32-bit value under `expected_tag`.
    pub fn read_unsigned32(&mut self, expected_tag: u8) -> Result<u32> {
        let len = self.expect_tag(expected_tag)?;
        self.read_unsigned32_value(len)
    }

    /// Read unsigned content of `len` octets, keeping the low 32 bits.
    pub fn read_unsigned32_value(&mut self, len: usize) -> Result<u32> {
        if len == 0 {
            return self.fail(DecodeErrorKind::ZeroLengthInteger);
        }
        if len > 5 {
            tracing::warn!(target: "easy_snmp::ber", { snmp.offset = self.offset(), length = len }, "unsigned integer too long, truncating");
        }
        let bytes = self.read_bytes(len)?;
        Ok(bytes.iter().fold(0u32, |acc, &b| (acc << 8) | b as u32))
    }

    /// Read unsigned content of `len` octets as a u64 (Counter64).
    pub fn read_unsigned64_value(&mut self, len: usize) -> Result<u64> {
        if len == 0 {
            return self.fail(DecodeErrorKind::ZeroLengthInteger);
        }
        if len > 9 {
            return self.fail(DecodeErrorKind::Integer64TooLong { length: len });
        }
        let bytes = self.read_bytes(len)?;
        Ok(bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64))
    }

    /// Read an OCTET STRING.
    pub fn read_octet_string(&mut self) -> Result<Bytes> {
        let len = self.expect_tag(tag::universal::OCTET_STRING)?;
        self.read_bytes(len)
    }

    /// Read a NULL.
    pub fn read_null(&mut self) -> Result<()> {
        let len = self.expect_tag(tag::universal::NULL)?;
        if len != 0 {
            return self.fail(DecodeErrorKind::InvalidNull);
        }
        Ok(())
    }

    /// Read an OBJECT IDENTIFIER.
    pub fn read_oid(&mut self) -> Result<Oid> {
        let len = self.expect_tag(tag::universal::OBJECT_IDENTIFIER)?;
        self.read_oid_value(len)
    }

    /// Read OID content of `len` octets.
    pub fn read_oid_value(&mut self, len: usize) -> Result<Oid> {
        let at = self.offset();
        let bytes = self.read_bytes(len)?;
        Oid::from_ber(&bytes).ok_or_else(|| {
            tracing::debug!(target: "easy_snmp::ber", { snmp.offset = at }, "invalid OID encoding");
            Error::decode(at, DecodeErrorKind::InvalidOidEncoding)
        })
    }

    /// Read IpAddress content of `len` octets.
    pub fn read_ip_address_value(&mut self, len: usize) -> Result<[u8; 4]> {
        if len != 4 {
            return self.fail(DecodeErrorKind::InvalidIpAddressLength { length: len });
        }
        let b = self.read_bytes(4)?;
        Ok([b[0], b[1], b[2], b[3]])
    }

    /// Enter a SEQUENCE.
    pub fn read_sequence(&mut self) -> Result<Decoder> {
        self.read_constructed(tag::universal::SEQUENCE)
    }

    /// Enter a constructed TLV with tag `expected`.
    pub fn read_constructed(&mut self, expected: u8) -> Result<Decoder> {
        let len = self.expect_tag(expected)?;
        self.sub_decoder(len)
    }

    /// Split off the next `len` bytes as their own decoder.
    pub fn sub_decoder(&mut self, len: usize) -> Result<Decoder> {
        let base = self.offset();
        let data = self.read_bytes(len)?;
        Ok(Decoder {
            data,
            offset: 0,
            base,
        })
    }

    /// Skip one TLV.
    pub fn skip_tlv(&mut self) -> Result<()> {
        self.read_tag()?;
        let len = self.read_length()?;
        if self.offset.saturating_add(len) > self.data.len() {
            return self.fail(DecodeErrorKind::TlvOverflow);
        }
        self.offset += len;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_sign_extend() {
        let cases: [(&[u8], i32); 5] = [
            (&[0x02, 0x01, 0x00], 0),
            (&[0x02, 0x02, 0x00, 0x80], 128),
            (&[0x02, 0x01, 0xFF], -1),
            (&[0x02, 0x02, 0xFF, 0xFF], -1),
            (&[0x02, 0x03, 0x00, 0x00, 0x80], 128),
        ];
        for (bytes, want) in cases {
            assert_eq!(Decoder::from_slice(bytes).read_integer().unwrap(), want);
        }
    }

    #[test]
    fn test_long_integer_truncates() {
        let mut dec = Decoder::from_slice(&[0x02, 0x05, 0x01, 0x02, 0x03, 0x04, 0x05]);
        assert_eq!(dec.read_integer().unwrap(), 0x0102_0304);
        assert!(dec.is_empty());
    }

    #[test]
    fn test_unexpected_tag_reports_offset() {
        let mut dec = Decoder::from_slice(&[0x30, 0x03, 0x04, 0x01, 0x41]);
        let mut seq = dec.read_sequence().unwrap();
        let err = seq.read_integer().unwrap_err();
        assert!(matches!(
            err,
            Error::Decode {
                offset: 2,
                kind: DecodeErrorKind::UnexpectedTag {
                    expected: 0x02,
                    actual: 0x04
                }
            }
        ));
    }

    #[test]
    fn test_truncated_content() {
        let mut dec = Decoder::from_slice(&[0x04, 0x05, b'a']);
        assert!(dec.read_octet_string().is_err());
        let mut dec = Decoder::from_slice(&[0x04, 0x82, 0x01, 0x00, 0xAA]);
        assert!(dec.skip_tlv().is_err());
    }

    #[test]
    fn test_null_and_oid() {
        let mut dec = Decoder::from_slice(&[0x05, 0x00, 0x06, 0x03, 0x2B, 0x06, 0x01]);
        dec.read_null().unwrap();
        assert_eq!(dec.read_oid().unwrap().arcs(), &[1, 3, 6, 1]);
        assert!(Decoder::from_slice(&[0x05, 0x01, 0x00]).read_null().is_err());
    }

    #[test]
    fn test_counter64_max() {
        let mut dec = Decoder::from_slice(&[0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(dec.read_unsigned64_value(9).unwrap(), u64::MAX);
    }
}
