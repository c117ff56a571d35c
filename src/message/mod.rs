//! SNMP message wrappers.
//!
//! - [`CommunityMessage`]: v1/v2c, authenticated by community string
//! - [`V3Message`]: v3 with USM security parameters

mod community;
mod v3;

pub use community::CommunityMessage;
pub use v3::{MsgFlags, MsgGlobalData, ScopedPdu, SecurityLevel, V3Message, V3MessageData};

use crate::ber::Decoder;
use crate::error::{DecodeErrorKind, Error, Result};
use crate::version::Version;
use bytes::Bytes;

/// A decoded message of any version.
#[derive(Debug, Clone)]
pub enum Message {
    Community(CommunityMessage),
    V3(V3Message),
}

impl Message {
    /// Decode, dispatching on the version field.
    pub fn decode(data: Bytes) -> Result<Self> {
        let mut dec = Decoder::new(data);
        let mut seq = dec.read_sequence()?;
        let at = seq.offset();
        let raw = seq.read_integer()?;
        match Version::from_i32(raw) {
            Some(Version::V3) => Ok(Message::V3(V3Message::decode_body(&mut seq)?)),
            Some(version) => Ok(Message::Community(CommunityMessage::decode_body(
                &mut seq, version,
            )?)),
            None => {
                tracing::debug!(target: "easy_snmp::message", { snmp.offset = at, version = raw }, "unknown message version");
                Err(Error::decode(at, DecodeErrorKind::UnknownVersion(raw)))
            }
        }
    }

    pub fn version(&self) -> Version {
        match self {
            Message::Community(m) => m.version,
            Message::V3(_) => Version::V3,
        }
    }
}
