//! BER length octets (X.690 8.1.3).
//!
//! Short form covers 0..=127; long form carries up to four length octets.
//! The indefinite form (0x80) is rejected, as net-snmp does.

use crate::error::{DecodeErrorKind, Error, Result};

/// Largest content length the decoder accepts (2 MiB).
pub const MAX_LENGTH: usize = 0x20_0000;

/// Encode `len` for a reverse buffer.
///
/// Returns the octets last-first together with how many are valid, so the
/// caller can push them straight onto an [`EncodeBuf`](super::EncodeBuf).
pub fn encode_length(len: usize) -> ([u8; 5], usize) {
    let mut out = [0u8; 5];
    if len < 0x80 {
        out[0] = len as u8;
        return (out, 1);
    }

    let mut remaining = len;
    let mut count = 0;
    while remaining > 0 && count < 4 {
        out[count] = (remaining & 0xFF) as u8;
        remaining >>= 8;
        count += 1;
    }
    out[count] = 0x80 | count as u8;
    (out, count + 1)
}

/// Decode a length at the start of `data`.
///
/// Returns `(length, octets consumed)`. `base_offset` is only used to report
/// where in the enclosing message a failure happened.
pub fn decode_length(data: &[u8], base_offset: usize) -> Result<(usize, usize)> {
    let Some(&first) = data.first() else {
        return Err(Error::decode(base_offset, DecodeErrorKind::TruncatedData));
    };

    if first & 0x80 == 0 {
        return Ok((first as usize, 1));
    }

    let octets = (first & 0x7F) as usize;
    match octets {
        0 => return Err(Error::decode(base_offset, DecodeErrorKind::IndefiniteLength)),
        1..=4 => {}
        _ => {
            return Err(Error::decode(
                base_offset,
                DecodeErrorKind::LengthTooLong { octets },
            ));
        }
    }

    let Some(body) = data.get(1..=octets) else {
        return Err(Error::decode(base_offset, DecodeErrorKind::TruncatedData));
    };
    let len = body.iter().fold(0usize, |acc, &b| (acc << 8) | b as usize);

    if len > MAX_LENGTH {
        return Err(Error::decode(
            base_offset,
            DecodeErrorKind::LengthExceedsMax {
                length: len,
                max: MAX_LENGTH,
            },
        ));
    }

    Ok((len, octets + 1))
}
