//! SNMP values as they travel in variable bindings.

use crate::ber::{Decoder, EncodeBuf, tag};
use crate::error::{DecodeErrorKind, Error, Result};
use crate::oid::Oid;
use bytes::Bytes;

/// A typed SNMP value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// INTEGER / Integer32.
    Integer(i32),
    /// OCTET STRING.
    OctetString(Bytes),
    /// NULL, used as the placeholder in requests.
    Null,
    /// OBJECT IDENTIFIER.
    ObjectIdentifier(Oid),
    /// IpAddress (IPv4 only).
    IpAddress([u8; 4]),
    /// Counter32.
    Counter32(u32),
    /// Gauge32 / Unsigned32.
    Gauge32(u32),
    /// TimeTicks, hundredths of a second.
    TimeTicks(u32),
    /// Opaque. See [`Value::opaque`] for the net-snmp special types.
    Opaque(Bytes),
    /// Counter64.
    Counter64(u64),
    /// v2c/v3 exception: the object does not exist.
    NoSuchObject,
    /// v2c/v3 exception: the instance does not exist.
    NoSuchInstance,
    /// v2c/v3 exception: the walk ran off the end of the agent's view.
    EndOfMibView,
    /// Any other tag, kept as raw content.
    Unknown { tag: u8, data: Bytes },
}

/// Special types net-snmp carries inside an Opaque.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OpaqueValue {
    Float(f32),
    Double(f64),
    Int64(i64),
    UInt64(u64),
    Counter64(u64),
}

impl OpaqueValue {
    /// Wrap into the Opaque payload net-snmp produces.
    pub fn to_value(self) -> Value {
        let mut inner = EncodeBuf::with_capacity(16);
        match self {
            OpaqueValue::Float(v) => inner.push_tagged(tag::opaque::FLOAT, &v.to_be_bytes()),
            OpaqueValue::Double(v) => inner.push_tagged(tag::opaque::DOUBLE, &v.to_be_bytes()),
            OpaqueValue::Int64(v) => inner.push_signed64(tag::opaque::INT64, v),
            OpaqueValue::UInt64(v) => inner.push_unsigned64(tag::opaque::UINT64, v),
            OpaqueValue::Counter64(v) => inner.push_unsigned64(tag::opaque::COUNTER64, v),
        }
        // the extension octet precedes the type octet
        inner.push_bytes(&[tag::opaque::EXTENSION]);
        Value::Opaque(inner.finish())
    }
}

impl Value {
    /// Whether this is one of the three exception values.
    pub fn is_exception(&self) -> bool {
        matches!(
            self,
            Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView
        )
    }

    /// Whether the value requires SNMPv2 (Counter64 or an exception).
    pub fn is_v2_only(&self) -> bool {
        matches!(self, Value::Counter64(_)) || self.is_exception()
    }

    /// Decode a net-snmp special type from an Opaque payload.
    ///
    /// Returns `None` for plain opaque data.
    pub fn opaque(&self) -> Option<OpaqueValue> {
        let Value::Opaque(data) = self else {
            return None;
        };
        if data.len() < 3 || data[0] != tag::opaque::EXTENSION {
            return None;
        }
        let kind = data[1];
        let len = data[2] as usize;
        let content = data.get(3..3 + len)?;
        let mut dec = Decoder::new(Bytes::copy_from_slice(content));
        match kind {
            tag::opaque::FLOAT => {
                let b: [u8; 4] = content.try_into().ok()?;
                Some(OpaqueValue::Float(f32::from_be_bytes(b)))
            }
            tag::opaque::DOUBLE => {
                let b: [u8; 8] = content.try_into().ok()?;
                Some(OpaqueValue::Double(f64::from_be_bytes(b)))
            }
            tag::opaque::INT64 => dec.read_signed64_value(len).ok().map(OpaqueValue::Int64),
            tag::opaque::UINT64 => dec.read_unsigned64_value(len).ok().map(OpaqueValue::UInt64),
            tag::opaque::COUNTER64 => dec
                .read_unsigned64_value(len)
                .ok()
                .map(OpaqueValue::Counter64),
            _ => None,
        }
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        match self {
            Value::Integer(v) => buf.push_integer(*v),
            Value::OctetString(data) => buf.push_octet_string(data),
            Value::Null => buf.push_null(),
            Value::ObjectIdentifier(oid) => buf.push_oid(oid),
            Value::IpAddress(addr) => buf.push_ip_address(*addr),
            Value::Counter32(v) => buf.push_unsigned32(tag::application::COUNTER32, *v),
            Value::Gauge32(v) => buf.push_unsigned32(tag::application::GAUGE32, *v),
            Value::TimeTicks(v) => buf.push_unsigned32(tag::application::TIMETICKS, *v),
            Value::Opaque(data) => buf.push_tagged(tag::application::OPAQUE, data),
            Value::Counter64(v) => buf.push_unsigned64(tag::application::COUNTER64, *v),
            Value::NoSuchObject => buf.push_tagged(tag::context::NO_SUCH_OBJECT, &[]),
            Value::NoSuchInstance => buf.push_tagged(tag::context::NO_SUCH_INSTANCE, &[]),
            Value::EndOfMibView => buf.push_tagged(tag::context::END_OF_MIB_VIEW, &[]),
            Value::Unknown { tag, data } => buf.push_tagged(*tag, data),
        }
    }

    /// Decode from BER.
    pub fn decode(dec: &mut Decoder) -> Result<Self> {
        let at = dec.offset();
        let t = dec.read_tag()?;
        let len = dec.read_length()?;

        let value = match t {
            tag::universal::INTEGER => Value::Integer(dec.read_integer_value(len)?),
            tag::universal::OCTET_STRING => Value::OctetString(dec.read_bytes(len)?),
            tag::universal::NULL => {
                if len != 0 {
                    return Err(Error::decode(at, DecodeErrorKind::InvalidNull));
                }
                Value::Null
            }
            tag::universal::OBJECT_IDENTIFIER => Value::ObjectIdentifier(dec.read_oid_value(len)?),
            tag::application::IP_ADDRESS => Value::IpAddress(dec.read_ip_address_value(len)?),
            tag::application::COUNTER32 => Value::Counter32(dec.read_unsigned32_value(len)?),
            tag::application::GAUGE32 => Value::Gauge32(dec.read_unsigned32_value(len)?),
            tag::application::TIMETICKS => Value::TimeTicks(dec.read_unsigned32_value(len)?),
            tag::application::OPAQUE => Value::Opaque(dec.read_bytes(len)?),
            tag::application::COUNTER64 => Value::Counter64(dec.read_unsigned64_value(len)?),
            tag::context::NO_SUCH_OBJECT | tag::context::NO_SUCH_INSTANCE
            | tag::context::END_OF_MIB_VIEW => {
                // some agents put content in exception values; ignore it
                dec.read_bytes(len)?;
                match t {
                    tag::context::NO_SUCH_OBJECT => Value::NoSuchObject,
                    tag::context::NO_SUCH_INSTANCE => Value::NoSuchInstance,
                    _ => Value::EndOfMibView,
                }
            }
            other => {
                tracing::debug!(target: "easy_snmp::value", { snmp.offset = at, tag = other }, "unknown value tag");
                Value::Unknown {
                    tag: other,
                    data: dec.read_bytes(len)?,
                }
            }
        };
        Ok(value)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::OctetString(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<Oid> for Value {
    fn from(oid: Oid) -> Self {
        Value::ObjectIdentifier(oid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    fn roundtrip(v: &Value) -> Value {
        let mut buf = EncodeBuf::new();
        v.encode(&mut buf);
        Value::decode(&mut Decoder::new(buf.finish())).unwrap()
    }

    #[test]
    fn test_application_types_keep_their_tags() {
        for v in [
            Value::Counter32(7),
            Value::Gauge32(u32::MAX),
            Value::TimeTicks(8_912_330),
            Value::Counter64(u64::MAX),
            Value::IpAddress([10, 0, 0, 1]),
            Value::ObjectIdentifier(oid!(1, 3, 6, 1, 4, 1, 8072)),
        ] {
            assert_eq!(roundtrip(&v), v);
        }
    }

    #[test]
    fn test_exception_values() {
        let mut dec = Decoder::from_slice(&[0x80, 0x00, 0x81, 0x00, 0x82, 0x01, 0xFF]);
        assert_eq!(Value::decode(&mut dec).unwrap(), Value::NoSuchObject);
        assert_eq!(Value::decode(&mut dec).unwrap(), Value::NoSuchInstance);
        assert_eq!(Value::decode(&mut dec).unwrap(), Value::EndOfMibView);
        assert!(dec.is_empty());
        assert!(Value::EndOfMibView.is_exception());
        assert!(!Value::Null.is_exception());
    }

    #[test]
    fn test_opaque_float_matches_net_snmp_layout() {
        let v = OpaqueValue::Float(1.5).to_value();
        let Value::Opaque(ref data) = v else {
            panic!("expected opaque");
        };
        assert_eq!(&data[..], &[0x9F, 0x78, 0x04, 0x3F, 0xC0, 0x00, 0x00]);
        assert_eq!(v.opaque(), Some(OpaqueValue::Float(1.5)));
    }

    #[test]
    fn test_opaque_integers() {
        assert_eq!(
            OpaqueValue::Int64(-2).to_value().opaque(),
            Some(OpaqueValue::Int64(-2))
        );
        assert_eq!(
            OpaqueValue::UInt64(1 << 40).to_value().opaque(),
            Some(OpaqueValue::UInt64(1 << 40))
        );
        assert_eq!(Value::Opaque(Bytes::from_static(b"raw")).opaque(), None);
    }

    #[test]
    fn test_unknown_tag_is_preserved() {
        let mut dec = Decoder::from_slice(&[0x47, 0x02, 0xAB, 0xCD]);
        let v = Value::decode(&mut dec).unwrap();
        assert_eq!(
            v,
            Value::Unknown {
                tag: 0x47,
                data: Bytes::from_static(&[0xAB, 0xCD])
            }
        );
    }
}
