//! SNMPv3 message format (RFC 3412).
//!
//! ```text
//! SEQUENCE {
//!     INTEGER version (3)
//!     SEQUENCE msgGlobalData { msgID, msgMaxSize, msgFlags, msgSecurityModel }
//!     OCTET STRING msgSecurityParameters
//!     msgData: ScopedPDU, or OCTET STRING ciphertext under authPriv
//! }
//! ```

use crate::ber::{Decoder, EncodeBuf};
use crate::error::{DecodeErrorKind, Error, ParseStage, Result};
use crate::pdu::Pdu;
use bytes::Bytes;

/// USM security model number.
const USM: i32 = 3;

/// v3 security level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum SecurityLevel {
    #[default]
    NoAuthNoPriv,
    AuthNoPriv,
    AuthPriv,
}

impl SecurityLevel {
    pub fn requires_auth(self) -> bool {
        self != Self::NoAuthNoPriv
    }

    pub fn requires_priv(self) -> bool {
        self == Self::AuthPriv
    }
}

impl std::str::FromStr for SecurityLevel {
    type Err = Error;

    /// Accepts the `-l` spellings net-snmp tools do.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "noauthnopriv" | "noauth" | "1" => Ok(Self::NoAuthNoPriv),
            "authnopriv" | "auth" | "2" => Ok(Self::AuthNoPriv),
            "authpriv" | "priv" | "3" => Ok(Self::AuthPriv),
            _ => Err(Error::parse(
                ParseStage::Usage,
                format!("Invalid security level specified after -l flag: {}", s),
            )),
        }
    }
}

impl std::fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::NoAuthNoPriv => "noAuthNoPriv",
            Self::AuthNoPriv => "authNoPriv",
            Self::AuthPriv => "authPriv",
        })
    }
}

/// msgFlags (RFC 3412 section 6.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MsgFlags {
    pub security_level: SecurityLevel,
    pub reportable: bool,
}

impl MsgFlags {
    const AUTH: u8 = 0x01;
    const PRIV: u8 = 0x02;
    const REPORTABLE: u8 = 0x04;

    pub fn new(security_level: SecurityLevel, reportable: bool) -> Self {
        Self {
            security_level,
            reportable,
        }
    }

    pub fn to_byte(self) -> u8 {
        let mut b = match self.security_level {
            SecurityLevel::NoAuthNoPriv => 0,
            SecurityLevel::AuthNoPriv => Self::AUTH,
            SecurityLevel::AuthPriv => Self::AUTH | Self::PRIV,
        };
        if self.reportable {
            b |= Self::REPORTABLE;
        }
        b
    }

    /// Decode; privacy without authentication is rejected.
    pub fn from_byte(b: u8) -> Option<Self> {
        let security_level = match (b & Self::AUTH != 0, b & Self::PRIV != 0) {
            (false, false) => SecurityLevel::NoAuthNoPriv,
            (true, false) => SecurityLevel::AuthNoPriv,
            (true, true) => SecurityLevel::AuthPriv,
            (false, true) => return None,
        };
        Some(Self::new(security_level, b & Self::REPORTABLE != 0))
    }
}

/// msgGlobalData header.
#[derive(Debug, Clone)]
pub struct MsgGlobalData {
    pub msg_id: i32,
    pub msg_max_size: i32,
    pub msg_flags: MsgFlags,
}

impl MsgGlobalData {
    pub fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_sequence(|buf| {
            buf.push_integer(USM);
            buf.push_octet_string(&[self.msg_flags.to_byte()]);
            buf.push_integer(self.msg_max_size);
            buf.push_integer(self.msg_id);
        });
    }

    pub fn decode(dec: &mut Decoder) -> Result<Self> {
        let mut seq = dec.read_sequence()?;
        let msg_id = seq.read_integer()?;
        let msg_max_size = seq.read_integer()?;

        let at = seq.offset();
        let flags = seq.read_octet_string()?;
        let msg_flags = match flags.as_ref() {
            [b] => MsgFlags::from_byte(*b),
            _ => None,
        }
        .ok_or_else(|| {
            tracing::debug!(target: "easy_snmp::message", { snmp.offset = at }, "invalid msgFlags");
            Error::decode(at, DecodeErrorKind::InvalidMsgFlags)
        })?;

        let at = seq.offset();
        let model = seq.read_integer()?;
        if model != USM {
            tracing::debug!(target: "easy_snmp::message", { snmp.offset = at, model }, "unknown security model");
            return Err(Error::decode(at, DecodeErrorKind::UnknownSecurityModel(model)));
        }

        Ok(Self {
            msg_id,
            msg_max_size,
            msg_flags,
        })
    }
}

/// contextEngineID, contextName and the PDU.
#[derive(Debug, Clone)]
pub struct ScopedPdu {
    pub context_engine_id: Bytes,
    pub context_name: Bytes,
    pub pdu: Pdu,
}

impl ScopedPdu {
    pub fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_sequence(|buf| {
            self.pdu.encode(buf);
            buf.push_octet_string(&self.context_name);
            buf.push_octet_string(&self.context_engine_id);
        });
    }

    /// Standalone encoding, which is what gets encrypted.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = EncodeBuf::new();
        self.encode(&mut buf);
        buf.finish()
    }

    pub fn decode(dec: &mut Decoder) -> Result<Self> {
        let mut seq = dec.read_sequence()?;
        Ok(Self {
            context_engine_id: seq.read_octet_string()?,
            context_name: seq.read_octet_string()?,
            pdu: Pdu::decode(&mut seq)?,
        })
    }
}

/// msgData: plaintext or still encrypted.
#[derive(Debug, Clone)]
pub enum V3MessageData {
    Plaintext(ScopedPdu),
    Encrypted(Bytes),
}

/// SNMPv3 message.
#[derive(Debug, Clone)]
pub struct V3Message {
    pub global: MsgGlobalData,
    /// BER-encoded USM parameters, carried as an OCTET STRING.
    pub security_params: Bytes,
    pub data: V3MessageData,
}

impl V3Message {
    /// Encode to BER.
    ///
    /// Authenticated messages are encoded with zeroed auth params first and
    /// patched afterwards; see [`crate::v3::auth::authenticate_message`].
    pub fn encode(&self) -> Bytes {
        let mut buf = EncodeBuf::new();
        buf.push_sequence(|buf| {
            match &self.data {
                V3MessageData::Plaintext(scoped) => scoped.encode(buf),
                V3MessageData::Encrypted(ciphertext) => buf.push_octet_string(ciphertext),
            }
            buf.push_octet_string(&self.security_params);
            self.global.encode(buf);
            buf.push_integer(3);
        });
        buf.finish()
    }

    /// Decode what follows the version field.
    pub(crate) fn decode_body(seq: &mut Decoder) -> Result<Self> {
        let global = MsgGlobalData::decode(seq)?;
        let security_params = seq.read_octet_string()?;
        let data = if global.msg_flags.security_level.requires_priv() {
            V3MessageData::Encrypted(seq.read_octet_string()?)
        } else {
            V3MessageData::Plaintext(ScopedPdu::decode(seq)?)
        };
        Ok(Self {
            global,
            security_params,
            data,
        })
    }
}
