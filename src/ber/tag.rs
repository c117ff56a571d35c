//! BER tag constants used by SNMP.
//!
//! A tag octet is class (bits 7-6), constructed flag (bit 5) and number.

/// Constructed bit.
pub const CONSTRUCTED: u8 = 0x20;

/// Context-specific class bits.
pub const CONTEXT_SPECIFIC: u8 = 0x80;

/// Universal class.
pub mod universal {
    pub const INTEGER: u8 = 0x02;
    pub const OCTET_STRING: u8 = 0x04;
    pub const NULL: u8 = 0x05;
    pub const OBJECT_IDENTIFIER: u8 = 0x06;
    pub const SEQUENCE: u8 = 0x30;
}

/// Application class: SNMP SMI types.
pub mod application {
    pub const IP_ADDRESS: u8 = 0x40;
    pub const COUNTER32: u8 = 0x41;
    /// Gauge32 and Unsigned32 share this tag.
    pub const GAUGE32: u8 = 0x42;
    pub const TIMETICKS: u8 = 0x43;
    pub const OPAQUE: u8 = 0x44;
    pub const COUNTER64: u8 = 0x46;
}

/// Context class, primitive: exception values in responses.
pub mod context {
    pub const NO_SUCH_OBJECT: u8 = 0x80;
    pub const NO_SUCH_INSTANCE: u8 = 0x81;
    pub const END_OF_MIB_VIEW: u8 = 0x82;
}

/// Context class, constructed: PDU types.
pub mod pdu {
    use super::{CONSTRUCTED, CONTEXT_SPECIFIC};

    pub const GET_REQUEST: u8 = CONTEXT_SPECIFIC | CONSTRUCTED; // 0xA0
    pub const GET_NEXT_REQUEST: u8 = CONTEXT_SPECIFIC | CONSTRUCTED | 0x01;
    pub const RESPONSE: u8 = CONTEXT_SPECIFIC | CONSTRUCTED | 0x02;
    pub const SET_REQUEST: u8 = CONTEXT_SPECIFIC | CONSTRUCTED | 0x03;
    pub const GET_BULK_REQUEST: u8 = CONTEXT_SPECIFIC | CONSTRUCTED | 0x05;
    pub const REPORT: u8 = CONTEXT_SPECIFIC | CONSTRUCTED | 0x08; // 0xA8
}

/// net-snmp opaque special types: the Opaque payload is itself a
/// TLV whose tag is `EXTENSION` followed by one of these numbers.
pub mod opaque {
    /// Leading octet of the two-octet extension tag.
    pub const EXTENSION: u8 = 0x9F;
    pub const COUNTER64: u8 = 0x76;
    pub const FLOAT: u8 = 0x78;
    pub const DOUBLE: u8 = 0x79;
    pub const INT64: u8 = 0x7A;
    pub const UINT64: u8 = 0x7B;
}
