//! Diagnostic detail for SNMPv3 failures.
//!
//! These kinds only travel through tracing fields. The caller sees the
//! net-snmp style message carried by [`Error::Generic`](super::Error::Generic).

/// Authentication failure detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AuthErrorKind {
    /// No authentication key derived for this session.
    NoAuthKey,
    /// HMAC verification failed.
    HmacMismatch,
    /// Could not locate auth params in message.
    AuthParamsNotFound,
}

impl AuthErrorKind {
    /// Text reported to the caller.
    pub(crate) fn message(self) -> &'static str {
        "Authentication failure (incorrect password, community or key)"
    }
}

impl std::fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoAuthKey => write!(f, "no authentication key available"),
            Self::HmacMismatch => write!(f, "HMAC verification failed"),
            Self::AuthParamsNotFound => write!(f, "could not locate auth params in message"),
        }
    }
}

/// Encryption or decryption failure detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CryptoErrorKind {
    /// Key shorter than the cipher requires.
    InvalidKeyLength,
    /// privParameters not eight octets.
    InvalidPrivParamsLength { actual: usize },
    /// Ciphertext length not a multiple of the block size.
    InvalidCiphertextLength { length: usize },
    /// Cipher rejected the buffer.
    CipherError,
}

impl CryptoErrorKind {
    /// Text reported to the caller.
    pub(crate) fn message(self) -> &'static str {
        match self {
            Self::InvalidKeyLength | Self::CipherError => "Encryption error",
            Self::InvalidPrivParamsLength { .. } | Self::InvalidCiphertextLength { .. } => {
                "Decryption error"
            }
        }
    }
}

impl std::fmt::Display for CryptoErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKeyLength => write!(f, "invalid key length"),
            Self::InvalidPrivParamsLength { actual } => {
                write!(f, "invalid privParameters length: expected 8, got {}", actual)
            }
            Self::InvalidCiphertextLength { length } => {
                write!(f, "ciphertext length {} not multiple of block size 8", length)
            }
            Self::CipherError => write!(f, "cipher operation failed"),
        }
    }
}

/// Build the caller-facing error for an authentication failure.
pub(crate) fn auth_error(kind: AuthErrorKind) -> super::Error {
    tracing::debug!(target: "easy_snmp::usm", { kind = %kind }, "authentication failure");
    super::Error::generic(kind.message())
}

/// Build the caller-facing error for a privacy failure.
pub(crate) fn crypto_error(kind: CryptoErrorKind) -> super::Error {
    tracing::debug!(target: "easy_snmp::usm", { kind = %kind }, "privacy failure");
    super::Error::generic(kind.message())
}
