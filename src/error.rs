//! Error types for easy-snmp.
//!
//! Every failure surfaces as [`Error`]. Callers that only care about the
//! broad category match on [`Error::kind`]; the variants carry the details.
//!
//! # Example
//!
//! ```rust
//! use easy_snmp::{Error, ErrorKind};
//!
//! fn should_retry(err: &Error) -> bool {
//!     matches!(err.kind(), ErrorKind::Timeout | ErrorKind::Connection)
//! }
//! ```

pub(crate) mod internal;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad error category.
///
/// Each [`Error`] variant maps to exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed tokens, bad version, bad `-C` flag, ambiguous host/port.
    Parse,
    /// Session could not be opened or the transport failed.
    Connection,
    /// No response within `(retries + 1) * timeout`.
    Timeout,
    /// The agent answered with an error status.
    Packet,
    /// An operand could not be resolved to an OID.
    UnknownObjectId,
    /// Anything else: operand count, ordering violations, bad values.
    Generic,
    /// A value's type could not be determined.
    UndeterminedType,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Parse => "ParseError",
            Self::Connection => "ConnectionError",
            Self::Timeout => "TimeoutError",
            Self::Packet => "PacketError",
            Self::UnknownObjectId => "UnknownObjectIDError",
            Self::Generic => "GenericError",
            Self::UndeterminedType => "UndeterminedTypeError",
        };
        f.write_str(name)
    }
}

/// Which stage of token parsing failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStage {
    /// Tokens were structurally invalid.
    General,
    /// An option or its value was not accepted.
    Usage,
    /// Help was requested (`-h`); nothing was executed.
    Help,
}

impl std::fmt::Display for ParseStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::General => write!(f, "error"),
            Self::Usage => write!(f, "usage"),
            Self::Help => write!(f, "help"),
        }
    }
}

/// BER decode error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Expected different tag.
    UnexpectedTag { expected: u8, actual: u8 },
    /// Data truncated unexpectedly.
    TruncatedData,
    /// Invalid BER length encoding.
    InvalidLength,
    /// Indefinite length not supported.
    IndefiniteLength,
    /// Length field uses more than four octets.
    LengthTooLong { octets: usize },
    /// Length exceeds the decoder limit.
    LengthExceedsMax { length: usize, max: usize },
    /// Zero-length integer.
    ZeroLengthInteger,
    /// 64-bit integer longer than nine octets.
    Integer64TooLong { length: usize },
    /// Invalid OID encoding.
    InvalidOidEncoding,
    /// Unknown SNMP version.
    UnknownVersion(i32),
    /// Unknown PDU type.
    UnknownPduType(u8),
    /// NULL with non-zero length.
    InvalidNull,
    /// IpAddress that is not four octets.
    InvalidIpAddressLength { length: usize },
    /// TLV extends past end of data.
    TlvOverflow,
    /// Invalid msgFlags (priv without auth).
    InvalidMsgFlags,
    /// Unknown security model.
    UnknownSecurityModel(i32),
    /// Negative engine boots or time.
    InvalidEngineClock,
}

impl std::fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedTag { expected, actual } => {
                write!(f, "expected tag 0x{:02X}, got 0x{:02X}", expected, actual)
            }
            Self::TruncatedData => write!(f, "unexpected end of data"),
            Self::InvalidLength => write!(f, "invalid length encoding"),
            Self::IndefiniteLength => write!(f, "indefinite length encoding not supported"),
            Self::LengthTooLong { octets } => {
                write!(f, "length encoding too long ({} octets)", octets)
            }
            Self::LengthExceedsMax { length, max } => {
                write!(f, "length {} exceeds maximum {}", length, max)
            }
            Self::ZeroLengthInteger => write!(f, "zero-length integer"),
            Self::Integer64TooLong { length } => write!(f, "integer64 too long: {} bytes", length),
            Self::InvalidOidEncoding => write!(f, "invalid OID encoding"),
            Self::UnknownVersion(v) => write!(f, "unknown SNMP version: {}", v),
            Self::UnknownPduType(t) => write!(f, "unknown PDU type: 0x{:02X}", t),
            Self::InvalidNull => write!(f, "NULL with non-zero length"),
            Self::InvalidIpAddressLength { length } => {
                write!(f, "IP address must be 4 bytes, got {}", length)
            }
            Self::TlvOverflow => write!(f, "TLV extends past end of data"),
            Self::InvalidMsgFlags => write!(f, "invalid msgFlags: privacy without authentication"),
            Self::UnknownSecurityModel(m) => write!(f, "unknown security model: {}", m),
            Self::InvalidEngineClock => write!(f, "negative engine boots or time"),
        }
    }
}

/// SNMP error status codes (RFC 3416).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorStatus {
    NoError,
    TooBig,
    NoSuchName,
    BadValue,
    ReadOnly,
    GenErr,
    NoAccess,
    WrongType,
    WrongLength,
    WrongEncoding,
    WrongValue,
    NoCreation,
    InconsistentValue,
    ResourceUnavailable,
    CommitFailed,
    UndoFailed,
    AuthorizationError,
    NotWritable,
    InconsistentName,
    /// Unknown/future error status code.
    Unknown(i32),
}

impl ErrorStatus {
    /// Create from raw status code.
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Self::NoError,
            1 => Self::TooBig,
            2 => Self::NoSuchName,
            3 => Self::BadValue,
            4 => Self::ReadOnly,
            5 => Self::GenErr,
            6 => Self::NoAccess,
            7 => Self::WrongType,
            8 => Self::WrongLength,
            9 => Self::WrongEncoding,
            10 => Self::WrongValue,
            11 => Self::NoCreation,
            12 => Self::InconsistentValue,
            13 => Self::ResourceUnavailable,
            14 => Self::CommitFailed,
            15 => Self::UndoFailed,
            16 => Self::AuthorizationError,
            17 => Self::NotWritable,
            18 => Self::InconsistentName,
            other => Self::Unknown(other),
        }
    }

    /// Convert to raw status code.
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::NoError => 0,
            Self::TooBig => 1,
            Self::NoSuchName => 2,
            Self::BadValue => 3,
            Self::ReadOnly => 4,
            Self::GenErr => 5,
            Self::NoAccess => 6,
            Self::WrongType => 7,
            Self::WrongLength => 8,
            Self::WrongEncoding => 9,
            Self::WrongValue => 10,
            Self::NoCreation => 11,
            Self::InconsistentValue => 12,
            Self::ResourceUnavailable => 13,
            Self::CommitFailed => 14,
            Self::UndoFailed => 15,
            Self::AuthorizationError => 16,
            Self::NotWritable => 17,
            Self::InconsistentName => 18,
            Self::Unknown(code) => *code,
        }
    }

    /// Agent-facing reason text, as net-snmp tools print it.
    pub fn description(&self) -> &'static str {
        match self {
            Self::NoError => "(noError) No Error",
            Self::TooBig => "(tooBig) Response message would have been too large.",
            Self::NoSuchName => "(noSuchName) There is no such variable name in this MIB.",
            Self::BadValue => "(badValue) The value given has the wrong type or length.",
            Self::ReadOnly => {
                "(readOnly) The two parties used do not have access to use the specified SNMP PDU."
            }
            Self::GenErr => "(genError) A general failure occured",
            Self::NoAccess => "noAccess",
            Self::WrongType => {
                "wrongType (The set datatype does not match the data type the agent expects)"
            }
            Self::WrongLength => {
                "wrongLength (The set value has an illegal length from what the agent expects)"
            }
            Self::WrongEncoding => "wrongEncoding",
            Self::WrongValue => "wrongValue (The set value is illegal or unsupported in some way)",
            Self::NoCreation => {
                "noCreation (That table does not support row creation or that object can not ever be created)"
            }
            Self::InconsistentValue => {
                "inconsistentValue (The set value is illegal or unsupported in some way)"
            }
            Self::ResourceUnavailable => {
                "resourceUnavailable (This is likely a out-of-memory failure within the agent)"
            }
            Self::CommitFailed => "commitFailed",
            Self::UndoFailed => "undoFailed",
            Self::AuthorizationError => "authorizationError (access denied to that object)",
            Self::NotWritable => "notWritable (That object does not support modification)",
            Self::InconsistentName => {
                "inconsistentName (That object can not currently be created)"
            }
            Self::Unknown(_) => "Unknown Error",
        }
    }
}

impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoError => write!(f, "noError"),
            Self::TooBig => write!(f, "tooBig"),
            Self::NoSuchName => write!(f, "noSuchName"),
            Self::BadValue => write!(f, "badValue"),
            Self::ReadOnly => write!(f, "readOnly"),
            Self::GenErr => write!(f, "genErr"),
            Self::NoAccess => write!(f, "noAccess"),
            Self::WrongType => write!(f, "wrongType"),
            Self::WrongLength => write!(f, "wrongLength"),
            Self::WrongEncoding => write!(f, "wrongEncoding"),
            Self::WrongValue => write!(f, "wrongValue"),
            Self::NoCreation => write!(f, "noCreation"),
            Self::InconsistentValue => write!(f, "inconsistentValue"),
            Self::ResourceUnavailable => write!(f, "resourceUnavailable"),
            Self::CommitFailed => write!(f, "commitFailed"),
            Self::UndoFailed => write!(f, "undoFailed"),
            Self::AuthorizationError => write!(f, "authorizationError"),
            Self::NotWritable => write!(f, "notWritable"),
            Self::InconsistentName => write!(f, "inconsistentName"),
            Self::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}

/// Library error type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Token list could not be parsed.
    #[error("{message}")]
    Parse { stage: ParseStage, message: String },

    /// Session could not be opened, or the transport failed.
    #[error("{operation}: {reason} ({target})")]
    Connection {
        operation: String,
        target: String,
        reason: String,
    },

    /// No response after all retries.
    #[error("Timeout: No Response from {target}.\n")]
    Timeout { target: String },

    /// The agent returned an error status.
    #[error("{message}")]
    Packet {
        message: String,
        status: ErrorStatus,
        failed_oid: Option<String>,
    },

    /// An operand could not be resolved.
    #[error("{name}: Unknown Object Identifier")]
    UnknownObjectId { name: String },

    /// Catch-all with a human-readable message.
    #[error("{message}")]
    Generic { message: String },

    /// No conversion is known for this type name.
    #[error("Could not determine type: {type_name}")]
    UndeterminedType { type_name: String },

    /// Malformed data on the wire.
    #[error("decode error at offset {offset}: {kind}")]
    Decode {
        offset: usize,
        kind: DecodeErrorKind,
    },
}

impl Error {
    /// Create a parse error.
    pub fn parse(stage: ParseStage, message: impl Into<String>) -> Self {
        Self::Parse {
            stage,
            message: message.into(),
        }
    }

    /// Create a generic error.
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Create a decode error.
    pub fn decode(offset: usize, kind: DecodeErrorKind) -> Self {
        Self::Decode { offset, kind }
    }

    /// Create an unknown-object error for the given operand.
    pub fn unknown_oid(name: impl Into<String>) -> Self {
        Self::UnknownObjectId { name: name.into() }
    }

    /// Create a packet error from a response status.
    ///
    /// The message follows the net-snmp tool layout:
    /// `Error in packet\nReason: <reason>\n[Failed object: <oid>\n]`.
    pub fn packet(status: ErrorStatus, failed_oid: Option<String>) -> Self {
        let mut message = format!("Error in packet\nReason: {}\n", status.description());
        if let Some(oid) = &failed_oid {
            message.push_str("Failed object: ");
            message.push_str(oid);
            message.push('\n');
        }
        Self::Packet {
            message,
            status,
            failed_oid,
        }
    }

    /// The transport to `target` failed while sending or receiving.
    pub fn transport(operation: &str, target: &str, reason: &str) -> Self {
        Self::Connection {
            operation: operation.to_string(),
            target: target.to_string(),
            reason: reason.trim_end().to_string(),
        }
    }

    /// Classify a transport or session failure for `operation`.
    ///
    /// Resolution failures become [`Error::Connection`], anything mentioning a
    /// timeout becomes [`Error::Timeout`], a v2-only PDU refused by a v1
    /// session is a packet error, and the rest is generic.
    pub fn session_failure(operation: &str, target: &str, reason: &str) -> Self {
        const CONNECTION_MARKERS: [&str; 5] = [
            "unknown host",
            "name or service not known",
            "temporary failure in name resolution",
            "could not translate host name",
            "no address associated with hostname",
        ];

        let lower = reason.to_ascii_lowercase();
        if CONNECTION_MARKERS.iter().any(|m| lower.contains(m)) {
            Self::Connection {
                operation: operation.to_string(),
                target: target.to_string(),
                reason: reason.trim_end().to_string(),
            }
        } else if lower.contains("timeout") || lower.contains("timed out") {
            Self::Timeout {
                target: target.to_string(),
            }
        } else if lower.contains("cannot send v2 pdu on v1 session") {
            Self::Packet {
                message: format!("{}: {}", operation, reason.trim_end()),
                status: ErrorStatus::NoError,
                failed_oid: None,
            }
        } else {
            Self::generic(format!("{}: {}", operation, reason.trim_end()))
        }
    }

    /// The broad category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Connection { .. } => ErrorKind::Connection,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Packet { .. } => ErrorKind::Packet,
            Self::UnknownObjectId { .. } => ErrorKind::UnknownObjectId,
            Self::Generic { .. } | Self::Decode { .. } => ErrorKind::Generic,
            Self::UndeterminedType { .. } => ErrorKind::UndeterminedType,
        }
    }
}
