//! USM security parameters and report classification (RFC 3414).
//!
//! ```text
//! UsmSecurityParameters ::= SEQUENCE {
//!     msgAuthoritativeEngineID     OCTET STRING,
//!     msgAuthoritativeEngineBoots  INTEGER (0..2147483647),
//!     msgAuthoritativeEngineTime   INTEGER (0..2147483647),
//!     msgUserName                  OCTET STRING (SIZE(0..32)),
//!     msgAuthenticationParameters  OCTET STRING,
//!     msgPrivacyParameters         OCTET STRING
//! }
//! ```

use bytes::Bytes;

use crate::ber::{Decoder, EncodeBuf, tag};
use crate::error::{DecodeErrorKind, Error, Result};
use crate::oid::Oid;
use crate::pdu::Pdu;

/// USM security parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsmSecurityParams {
    pub engine_id: Bytes,
    pub engine_boots: u32,
    pub engine_time: u32,
    pub username: Bytes,
    pub auth_params: Bytes,
    pub priv_params: Bytes,
}

impl UsmSecurityParams {
    pub fn encode(&self) -> Bytes {
        let mut buf = EncodeBuf::with_capacity(128);
        buf.push_sequence(|buf| {
            buf.push_octet_string(&self.priv_params);
            buf.push_octet_string(&self.auth_params);
            buf.push_octet_string(&self.username);
            buf.push_unsigned32(tag::universal::INTEGER, self.engine_time);
            buf.push_unsigned32(tag::universal::INTEGER, self.engine_boots);
            buf.push_octet_string(&self.engine_id);
        });
        buf.finish()
    }

    pub fn decode(data: Bytes) -> Result<Self> {
        let mut dec = Decoder::new(data);
        let mut seq = dec.read_sequence()?;
        let engine_id = seq.read_octet_string()?;
        let at = seq.offset();
        let boots = seq.read_integer()?;
        let time = seq.read_integer()?;
        if boots < 0 || time < 0 {
            tracing::debug!(target: "easy_snmp::usm", { snmp.offset = at, boots, time }, "negative engine clock");
            return Err(Error::decode(at, DecodeErrorKind::InvalidEngineClock));
        }
        Ok(Self {
            engine_id,
            engine_boots: boots as u32,
            engine_time: time as u32,
            username: seq.read_octet_string()?,
            auth_params: seq.read_octet_string()?,
            priv_params: seq.read_octet_string()?,
        })
    }

    /// Locate msgAuthenticationParameters content inside an encoded v3
    /// message. Returns `(offset, length)`.
    pub fn auth_params_location(msg: &Bytes) -> Option<(usize, usize)> {
        let mut dec = Decoder::new(msg.clone());
        let mut outer = dec.read_sequence().ok()?;
        outer.read_integer().ok()?;
        outer.skip_tlv().ok()?;
        let len = outer.expect_tag(tag::universal::OCTET_STRING).ok()?;
        let mut params = outer.sub_decoder(len).ok()?;
        let mut seq = params.read_sequence().ok()?;
        seq.read_octet_string().ok()?;
        seq.skip_tlv().ok()?;
        seq.skip_tlv().ok()?;
        seq.read_octet_string().ok()?;
        let len = seq.expect_tag(tag::universal::OCTET_STRING).ok()?;
        Some((seq.offset(), len))
    }
}

/// usmStats counters agents answer with in REPORT PDUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsmReport {
    UnsupportedSecLevel,
    NotInTimeWindow,
    UnknownUserName,
    UnknownEngineId,
    WrongDigest,
    DecryptionError,
}

impl UsmReport {
    /// usmStats prefix, 1.3.6.1.6.3.15.1.1.
    const STATS: [u32; 9] = [1, 3, 6, 1, 6, 3, 15, 1, 1];

    /// Classify the first binding of a REPORT PDU.
    pub fn from_pdu(pdu: &Pdu) -> Option<Self> {
        let oid = &pdu.varbinds.first()?.oid;
        Self::from_oid(oid)
    }

    pub fn from_oid(oid: &Oid) -> Option<Self> {
        let arcs = oid.arcs();
        if !arcs.starts_with(&Self::STATS) {
            return None;
        }
        match arcs.get(Self::STATS.len())? {
            1 => Some(Self::UnsupportedSecLevel),
            2 => Some(Self::NotInTimeWindow),
            3 => Some(Self::UnknownUserName),
            4 => Some(Self::UnknownEngineId),
            5 => Some(Self::WrongDigest),
            6 => Some(Self::DecryptionError),
            _ => None,
        }
    }

    /// The text net-snmp reports for this condition.
    pub fn message(self) -> &'static str {
        match self {
            Self::UnsupportedSecLevel => "Unsupported security level",
            Self::NotInTimeWindow => "Not in time window",
            Self::UnknownUserName => "Unknown user name",
            Self::UnknownEngineId => "Unknown engine ID",
            Self::WrongDigest => "Authentication failure (incorrect password, community or key)",
            Self::DecryptionError => "Decryption error",
        }
    }
}
