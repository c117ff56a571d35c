//! Variable bindings: an OID paired with a value.

use crate::ber::{Decoder, EncodeBuf};
use crate::error::Result;
use crate::oid::Oid;
use crate::value::Value;

/// One OID/value pair.
#[derive(Debug, Clone, PartialEq)]
pub struct VarBind {
    pub oid: Oid,
    pub value: Value,
}

impl VarBind {
    pub fn new(oid: Oid, value: Value) -> Self {
        Self { oid, value }
    }

    /// A NULL-valued binding, as sent in GET/GETNEXT/GETBULK requests.
    pub fn null(oid: Oid) -> Self {
        Self::new(oid, Value::Null)
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_sequence(|buf| {
            self.value.encode(buf);
            buf.push_oid(&self.oid);
        });
    }

    /// Decode from BER.
    pub fn decode(dec: &mut Decoder) -> Result<Self> {
        let mut seq = dec.read_sequence()?;
        let oid = seq.read_oid()?;
        let value = Value::decode(&mut seq)?;
        Ok(Self { oid, value })
    }
}

/// Encode a VarBindList. The reverse buffer needs the last binding first.
pub fn encode_varbind_list(buf: &mut EncodeBuf, varbinds: &[VarBind]) {
    buf.push_sequence(|buf| {
        for vb in varbinds.iter().rev() {
            vb.encode(buf);
        }
    });
}

/// Decode a VarBindList.
pub fn decode_varbind_list(dec: &mut Decoder) -> Result<Vec<VarBind>> {
    let mut seq = dec.read_sequence()?;
    let mut out = Vec::new();
    while !seq.is_empty() {
        out.push(VarBind::decode(&mut seq)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    #[test]
    fn test_null_varbind_wire_form() {
        let mut buf = EncodeBuf::new();
        VarBind::null(oid!(1, 3, 6, 1)).encode(&mut buf);
        assert_eq!(
            &buf.finish()[..],
            &[0x30, 0x07, 0x06, 0x03, 0x2B, 0x06, 0x01, 0x05, 0x00]
        );
    }

    #[test]
    fn test_list_keeps_order() {
        let varbinds = vec![
            VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::from("router")),
            VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), Value::TimeTicks(100)),
            VarBind::new(oid!(1, 3, 6, 1, 2, 1, 2, 1, 0), Value::Integer(2)),
        ];
        let mut buf = EncodeBuf::new();
        encode_varbind_list(&mut buf, &varbinds);
        let decoded = decode_varbind_list(&mut Decoder::new(buf.finish())).unwrap();
        assert_eq!(decoded, varbinds);
    }

    #[test]
    fn test_empty_list() {
        let mut dec = Decoder::from_slice(&[0x30, 0x00]);
        assert!(decode_varbind_list(&mut dec).unwrap().is_empty());
    }
}
