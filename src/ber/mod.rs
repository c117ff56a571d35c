//! BER (Basic Encoding Rules) codec for SNMP messages.
//!
//! A reverse-buffer encoder and a zero-copy decoder, following X.690 with the
//! same leniency net-snmp applies when reading agent responses.

mod decode;
mod encode;
mod length;
pub mod tag;

pub use decode::Decoder;
pub use encode::EncodeBuf;
pub use length::{MAX_LENGTH, decode_length, encode_length};
