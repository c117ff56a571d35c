//! SNMP Protocol Data Units.

use crate::ber::{Decoder, EncodeBuf, tag};
use crate::error::{DecodeErrorKind, Error, ErrorStatus, Result};
use crate::oid::Oid;
use crate::varbind::{VarBind, decode_varbind_list, encode_varbind_list};

/// PDU type, identified by its context tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PduType {
    Get,
    GetNext,
    Response,
    Set,
    GetBulk,
    Report,
}

impl PduType {
    pub fn from_tag(t: u8) -> Option<Self> {
        match t {
            tag::pdu::GET_REQUEST => Some(Self::Get),
            tag::pdu::GET_NEXT_REQUEST => Some(Self::GetNext),
            tag::pdu::RESPONSE => Some(Self::Response),
            tag::pdu::SET_REQUEST => Some(Self::Set),
            tag::pdu::GET_BULK_REQUEST => Some(Self::GetBulk),
            tag::pdu::REPORT => Some(Self::Report),
            _ => None,
        }
    }

    pub fn tag(self) -> u8 {
        match self {
            Self::Get => tag::pdu::GET_REQUEST,
            Self::GetNext => tag::pdu::GET_NEXT_REQUEST,
            Self::Response => tag::pdu::RESPONSE,
            Self::Set => tag::pdu::SET_REQUEST,
            Self::GetBulk => tag::pdu::GET_BULK_REQUEST,
            Self::Report => tag::pdu::REPORT,
        }
    }
}

impl std::fmt::Display for PduType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Get => "GetRequest",
            Self::GetNext => "GetNextRequest",
            Self::Response => "Response",
            Self::Set => "SetRequest",
            Self::GetBulk => "GetBulkRequest",
            Self::Report => "Report",
        };
        f.write_str(name)
    }
}

/// A request, response or report PDU.
///
/// For GETBULK, `error_status` carries non-repeaters and `error_index`
/// carries max-repetitions, as on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Pdu {
    pub pdu_type: PduType,
    pub request_id: i32,
    pub error_status: i32,
    pub error_index: i32,
    pub varbinds: Vec<VarBind>,
}

impl Pdu {
    fn with_nulls(pdu_type: PduType, oids: &[Oid]) -> Self {
        Self {
            pdu_type,
            request_id: 0,
            error_status: 0,
            error_index: 0,
            varbinds: oids.iter().cloned().map(VarBind::null).collect(),
        }
    }

    /// GET request for `oids`. The request id is assigned when sent.
    pub fn get(oids: &[Oid]) -> Self {
        Self::with_nulls(PduType::Get, oids)
    }

    /// GETNEXT request for `oids`.
    pub fn get_next(oids: &[Oid]) -> Self {
        Self::with_nulls(PduType::GetNext, oids)
    }

    /// GETBULK request.
    pub fn get_bulk(oids: &[Oid], non_repeaters: i32, max_repetitions: i32) -> Self {
        let mut pdu = Self::with_nulls(PduType::GetBulk, oids);
        pdu.error_status = non_repeaters;
        pdu.error_index = max_repetitions;
        pdu
    }

    /// SET request.
    pub fn set(varbinds: Vec<VarBind>) -> Self {
        Self {
            pdu_type: PduType::Set,
            request_id: 0,
            error_status: 0,
            error_index: 0,
            varbinds,
        }
    }

    /// A response echoing `request` with the given bindings.
    pub fn response_to(request: &Pdu, varbinds: Vec<VarBind>) -> Self {
        Self {
            pdu_type: PduType::Response,
            request_id: request.request_id,
            error_status: 0,
            error_index: 0,
            varbinds,
        }
    }

    /// A response reporting `status` at 1-based `index`, echoing the request bindings.
    pub fn error_response(request: &Pdu, status: ErrorStatus, index: i32) -> Self {
        Self {
            pdu_type: PduType::Response,
            request_id: request.request_id,
            error_status: status.as_i32(),
            error_index: index,
            varbinds: request.varbinds.clone(),
        }
    }

    pub fn status(&self) -> ErrorStatus {
        ErrorStatus::from_i32(self.error_status)
    }

    /// The binding `error_index` points at, if it is in range.
    pub fn failed_varbind(&self) -> Option<&VarBind> {
        let index = usize::try_from(self.error_index).ok()?;
        self.varbinds.get(index.checked_sub(1)?)
    }

    /// Whether the PDU can only travel in a v2c/v3 message.
    pub fn is_v2_only(&self) -> bool {
        self.pdu_type == PduType::GetBulk || self.varbinds.iter().any(|vb| vb.value.is_v2_only())
    }

    /// Build a retry request from an error response by dropping the binding
    /// the agent blamed.
    ///
    /// Returns `None` when there is nothing to fix: no error, no bindings,
    /// an index out of range, or no bindings left after the removal.
    pub fn fix(&self, pdu_type: PduType) -> Option<Pdu> {
        if self.error_status == 0 || self.varbinds.is_empty() {
            return None;
        }
        let count = self.varbinds.len() as i32;
        if self.error_index <= 0 || self.error_index > count {
            return None;
        }
        let drop_at = (self.error_index - 1) as usize;
        let varbinds: Vec<VarBind> = self
            .varbinds
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != drop_at)
            .map(|(_, vb)| VarBind::null(vb.oid.clone()))
            .collect();
        if varbinds.is_empty() {
            return None;
        }
        Some(Pdu {
            pdu_type,
            request_id: 0,
            error_status: 0,
            error_index: 0,
            varbinds,
        })
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_constructed(self.pdu_type.tag(), |buf| {
            encode_varbind_list(buf, &self.varbinds);
            buf.push_integer(self.error_index);
            buf.push_integer(self.error_status);
            buf.push_integer(self.request_id);
        });
    }

    /// Decode from BER.
    pub fn decode(dec: &mut Decoder) -> Result<Self> {
        let at = dec.offset();
        let t = dec.read_tag()?;
        let pdu_type = PduType::from_tag(t)
            .ok_or_else(|| Error::decode(at, DecodeErrorKind::UnknownPduType(t)))?;
        let len = dec.read_length()?;
        let mut body = dec.sub_decoder(len)?;

        let request_id = body.read_integer()?;
        let error_status = body.read_integer()?;
        let error_index = body.read_integer()?;
        let varbinds = decode_varbind_list(&mut body)?;

        Ok(Pdu {
            pdu_type,
            request_id,
            error_status,
            error_index,
            varbinds,
        })
    }
}
