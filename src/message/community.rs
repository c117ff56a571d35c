//! v1/v2c messages: `SEQUENCE { version, community, pdu }`.

use crate::ber::{Decoder, EncodeBuf};
use crate::error::Result;
use crate::pdu::Pdu;
use crate::version::Version;
use bytes::Bytes;

/// Community-based message (v1 or v2c).
#[derive(Debug, Clone)]
pub struct CommunityMessage {
    pub version: Version,
    pub community: Bytes,
    pub pdu: Pdu,
}

impl CommunityMessage {
    pub fn new(version: Version, community: Bytes, pdu: Pdu) -> Self {
        Self {
            version,
            community,
            pdu,
        }
    }

    /// Encode to BER.
    pub fn encode(&self) -> Bytes {
        let mut buf = EncodeBuf::new();
        buf.push_sequence(|buf| {
            self.pdu.encode(buf);
            buf.push_octet_string(&self.community);
            buf.push_integer(self.version.as_i32());
        });
        buf.finish()
    }

    /// Decode what follows the version field.
    pub(crate) fn decode_body(seq: &mut Decoder, version: Version) -> Result<Self> {
        let community = seq.read_octet_string()?;
        let pdu = Pdu::decode(seq)?;
        Ok(Self {
            version,
            community,
            pdu,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;
    use crate::oid;

    #[test]
    fn test_v1_get_wire_layout() {
        let mut pdu = Pdu::get(&[oid!(1, 3, 6, 1)]);
        pdu.request_id = 1;
        let msg = CommunityMessage::new(Version::V1, Bytes::from_static(b"ab"), pdu);
        let expected: &[u8] = &[
            0x30, 0x1D, // message
            0x02, 0x01, 0x00, // version 1
            0x04, 0x02, b'a', b'b', // community
            0xA0, 0x14, // GetRequest
            0x02, 0x01, 0x01, // request-id
            0x02, 0x01, 0x00, // error-status
            0x02, 0x01, 0x00, // error-index
            0x30, 0x09, 0x30, 0x07, 0x06, 0x03, 0x2B, 0x06, 0x01, 0x05, 0x00,
        ];
        assert_eq!(&msg.encode()[..], expected);
    }

    #[test]
    fn test_community_survives_decode() {
        let msg = CommunityMessage::new(
            Version::V2c,
            Bytes::from_static(b"private"),
            Pdu::get_next(&[oid!(1, 3, 6, 1, 2, 1)]),
        );
        let Message::Community(back) = Message::decode(msg.encode()).unwrap() else {
            panic!("expected community message");
        };
        assert_eq!(back.community.as_ref(), b"private");
        assert_eq!(back.pdu, msg.pdu);
    }
}
