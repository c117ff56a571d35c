//! Key derivation and HMAC authentication (RFC 3414 A.2, RFC 7860).

use bytes::{Bytes, BytesMut};
use digest::{Digest, KeyInit, Mac};
use hmac::Hmac;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::AuthProtocol;
use crate::error::Result;
use crate::error::internal::{AuthErrorKind, auth_error};

/// Bytes of repeated password hashed into the master key.
const EXPANSION_SIZE: usize = 1_048_576;

macro_rules! hmac_full {
    ($digest:ty, $key:expr, $data:expr) => {
        // HMAC takes keys of any length, so the error arm is unreachable
        match <Hmac<$digest> as KeyInit>::new_from_slice($key) {
            Ok(mut mac) => {
                Mac::update(&mut mac, $data);
                mac.finalize().into_bytes().to_vec()
            }
            Err(_) => Vec::new(),
        }
    };
}

/// An authentication key bound to one engine ID.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct LocalizedKey {
    key: Vec<u8>,
    #[zeroize(skip)]
    protocol: AuthProtocol,
}

impl LocalizedKey {
    /// Derive from a passphrase: expand to 1 MiB, hash to the master key,
    /// then hash `Ku || engineID || Ku`.
    pub fn from_password(protocol: AuthProtocol, password: &[u8], engine_id: &[u8]) -> Self {
        let master = password_to_key(protocol, password);
        Self::from_master(protocol, &master, engine_id)
    }

    /// Localize an already derived master key.
    pub fn from_master(protocol: AuthProtocol, master: &[u8], engine_id: &[u8]) -> Self {
        let key = match protocol {
            AuthProtocol::Md5 => localize::<md5::Md5>(master, engine_id),
            AuthProtocol::Sha1 => localize::<sha1::Sha1>(master, engine_id),
            AuthProtocol::Sha224 => localize::<sha2::Sha224>(master, engine_id),
            AuthProtocol::Sha256 => localize::<sha2::Sha256>(master, engine_id),
            AuthProtocol::Sha384 => localize::<sha2::Sha384>(master, engine_id),
            AuthProtocol::Sha512 => localize::<sha2::Sha512>(master, engine_id),
        };
        Self { key, protocol }
    }

    /// Use raw key bytes (for instance a localized key given on the command line).
    pub fn from_bytes(protocol: AuthProtocol, key: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            protocol,
        }
    }

    pub fn protocol(&self) -> AuthProtocol {
        self.protocol
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    /// Extend the key to `len` bytes by repeatedly appending the hash of
    /// the key so far, then truncate (Blumenthal, for AES-192/256).
    pub fn extend_to(&self, len: usize) -> Vec<u8> {
        let mut key = self.key.clone();
        while key.len() < len {
            let more = hash(self.protocol, &key);
            key.extend_from_slice(&more);
        }
        key.truncate(len);
        key
    }

    /// Truncated HMAC over `data`.
    pub fn mac(&self, data: &[u8]) -> Vec<u8> {
        let full = match self.protocol {
            AuthProtocol::Md5 => hmac_full!(md5::Md5, &self.key, data),
            AuthProtocol::Sha1 => hmac_full!(sha1::Sha1, &self.key, data),
            AuthProtocol::Sha224 => hmac_full!(sha2::Sha224, &self.key, data),
            AuthProtocol::Sha256 => hmac_full!(sha2::Sha256, &self.key, data),
            AuthProtocol::Sha384 => hmac_full!(sha2::Sha384, &self.key, data),
            AuthProtocol::Sha512 => hmac_full!(sha2::Sha512, &self.key, data),
        };
        let mut out = full;
        out.truncate(self.protocol.mac_len());
        out
    }

    /// Compare in constant time.
    pub fn verify(&self, data: &[u8], expected: &[u8]) -> bool {
        let computed = self.mac(data);
        computed.len() == expected.len() && bool::from(computed.ct_eq(expected))
    }
}

impl std::fmt::Debug for LocalizedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalizedKey")
            .field("protocol", &self.protocol)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Password to master key (RFC 3414 A.2.1). An empty password gives an
/// all-zero key.
pub fn password_to_key(protocol: AuthProtocol, password: &[u8]) -> Vec<u8> {
    match protocol {
        AuthProtocol::Md5 => expand::<md5::Md5>(password),
        AuthProtocol::Sha1 => expand::<sha1::Sha1>(password),
        AuthProtocol::Sha224 => expand::<sha2::Sha224>(password),
        AuthProtocol::Sha256 => expand::<sha2::Sha256>(password),
        AuthProtocol::Sha384 => expand::<sha2::Sha384>(password),
        AuthProtocol::Sha512 => expand::<sha2::Sha512>(password),
    }
}

fn expand<D: Digest>(password: &[u8]) -> Vec<u8> {
    if password.is_empty() {
        return vec![0u8; <D as Digest>::output_size()];
    }
    let mut hasher = D::new();
    let mut chunk = [0u8; 64];
    let mut at = 0;
    for _ in 0..EXPANSION_SIZE / chunk.len() {
        for byte in chunk.iter_mut() {
            *byte = password[at];
            at = (at + 1) % password.len();
        }
        hasher.update(chunk);
    }
    hasher.finalize().to_vec()
}

fn localize<D: Digest>(master: &[u8], engine_id: &[u8]) -> Vec<u8> {
    let mut hasher = D::new();
    hasher.update(master);
    hasher.update(engine_id);
    hasher.update(master);
    hasher.finalize().to_vec()
}

fn hash(protocol: AuthProtocol, data: &[u8]) -> Vec<u8> {
    match protocol {
        AuthProtocol::Md5 => md5::Md5::digest(data).to_vec(),
        AuthProtocol::Sha1 => sha1::Sha1::digest(data).to_vec(),
        AuthProtocol::Sha224 => sha2::Sha224::digest(data).to_vec(),
        AuthProtocol::Sha256 => sha2::Sha256::digest(data).to_vec(),
        AuthProtocol::Sha384 => sha2::Sha384::digest(data).to_vec(),
        AuthProtocol::Sha512 => sha2::Sha512::digest(data).to_vec(),
    }
}

/// Fill the zeroed auth params of an encoded message with its MAC.
///
/// `offset`/`len` locate the auth params content, see
/// [`UsmSecurityParams::auth_params_location`](super::UsmSecurityParams::auth_params_location).
pub fn authenticate_message(key: &LocalizedKey, msg: Bytes, offset: usize, len: usize) -> Result<Bytes> {
    if offset + len > msg.len() || len != key.protocol().mac_len() {
        return Err(auth_error(AuthErrorKind::AuthParamsNotFound));
    }
    let mac = key.mac(&msg);
    let mut out = BytesMut::from(&msg[..]);
    out[offset..offset + len].copy_from_slice(&mac);
    Ok(out.freeze())
}

/// Check the MAC of an incoming message.
pub fn verify_message(key: &LocalizedKey, msg: &[u8], offset: usize, len: usize) -> Result<()> {
    if offset + len > msg.len() {
        return Err(auth_error(AuthErrorKind::AuthParamsNotFound));
    }
    let received = msg[offset..offset + len].to_vec();
    let mut zeroed = msg.to_vec();
    zeroed[offset..offset + len].fill(0);
    if key.verify(&zeroed, &received) {
        Ok(())
    } else {
        Err(auth_error(AuthErrorKind::HmacMismatch))
    }
}
