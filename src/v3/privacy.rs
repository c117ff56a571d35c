//! Privacy: DES-CBC (RFC 3414 8) and AES-CFB (RFC 3826).

use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{AuthProtocol, LocalizedKey, PrivProtocol};
use crate::error::Result;
use crate::error::internal::{CryptoErrorKind, crypto_error};

/// Salt source shared by every encryption under one key. Starts at a
/// random value and never yields zero.
#[derive(Debug)]
pub struct SaltCounter(AtomicU64);

impl SaltCounter {
    pub fn new() -> Self {
        let mut buf = [0u8; 8];
        // fall back to a fixed seed if the OS source is unavailable
        let seed = match getrandom::fill(&mut buf) {
            Ok(()) => u64::from_ne_bytes(buf),
            Err(_) => 0x5EED_5EED_5EED_5EED,
        };
        Self::from_value(seed.max(1))
    }

    pub fn from_value(value: u64) -> Self {
        Self(AtomicU64::new(value))
    }

    pub fn next(&self) -> u64 {
        let value = self.0.fetch_add(1, Ordering::Relaxed);
        if value == 0 {
            self.0.fetch_add(1, Ordering::Relaxed)
        } else {
            value
        }
    }
}

impl Default for SaltCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// A localized privacy key.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivKey {
    key: Vec<u8>,
    #[zeroize(skip)]
    protocol: PrivProtocol,
    #[zeroize(skip)]
    salt: SaltCounter,
}

impl PrivKey {
    /// Derive from a passphrase with the session's authentication hash.
    ///
    /// AES-192/256 keys longer than the digest are extended (Blumenthal).
    pub fn from_password(
        auth: AuthProtocol,
        protocol: PrivProtocol,
        password: &[u8],
        engine_id: &[u8],
    ) -> Self {
        let localized = LocalizedKey::from_password(auth, password, engine_id);
        Self::from_localized(&localized, protocol)
    }

    pub fn from_localized(localized: &LocalizedKey, protocol: PrivProtocol) -> Self {
        Self::from_bytes(protocol, localized.extend_to(protocol.key_len()))
    }

    pub fn from_bytes(protocol: PrivProtocol, key: Vec<u8>) -> Self {
        Self {
            key,
            protocol,
            salt: SaltCounter::new(),
        }
    }

    pub fn protocol(&self) -> PrivProtocol {
        self.protocol
    }

    fn key_material(&self) -> Result<&[u8]> {
        self.key
            .get(..self.protocol.key_len())
            .ok_or_else(|| crypto_error(CryptoErrorKind::InvalidKeyLength))
    }

    /// Encrypt a serialized ScopedPDU. Returns `(ciphertext, privParameters)`.
    pub fn encrypt(&self, plaintext: &[u8], boots: u32, time: u32) -> Result<(Bytes, Bytes)> {
        let salt = self.salt.next();
        match self.protocol {
            PrivProtocol::Des => self.encrypt_des(plaintext, boots, salt as u32),
            _ => self.encrypt_aes(plaintext, boots, time, salt),
        }
    }

    /// Decrypt msgData with the privParameters from the message.
    pub fn decrypt(&self, ciphertext: &[u8], boots: u32, time: u32, params: &[u8]) -> Result<Bytes> {
        let params: [u8; 8] = params.try_into().map_err(|_| {
            crypto_error(CryptoErrorKind::InvalidPrivParamsLength {
                actual: params.len(),
            })
        })?;
        match self.protocol {
            PrivProtocol::Des => self.decrypt_des(ciphertext, params),
            _ => self.decrypt_aes(ciphertext, boots, time, params),
        }
    }

    fn des_iv(&self, salt: &[u8; 8]) -> Result<[u8; 8]> {
        let pre_iv = &self.key_material()?[8..16];
        let mut iv = [0u8; 8];
        for (i, b) in iv.iter_mut().enumerate() {
            *b = pre_iv[i] ^ salt[i];
        }
        Ok(iv)
    }

    fn encrypt_des(&self, plaintext: &[u8], boots: u32, counter: u32) -> Result<(Bytes, Bytes)> {
        use cbc::cipher::{BlockEncryptMut, KeyIvInit, block_padding::NoPadding};

        let mut salt = [0u8; 8];
        salt[..4].copy_from_slice(&boots.to_be_bytes());
        salt[4..].copy_from_slice(&counter.to_be_bytes());
        let iv = self.des_iv(&salt)?;

        let padded = plaintext.len().div_ceil(8).max(1) * 8;
        let mut buf = vec![0u8; padded];
        buf[..plaintext.len()].copy_from_slice(plaintext);

        let cipher = cbc::Encryptor::<des::Des>::new_from_slices(&self.key_material()?[..8], &iv)
            .map_err(|_| crypto_error(CryptoErrorKind::InvalidKeyLength))?;
        let out = cipher
            .encrypt_padded_mut::<NoPadding>(&mut buf, padded)
            .map_err(|_| crypto_error(CryptoErrorKind::CipherError))?;
        Ok((Bytes::copy_from_slice(out), Bytes::copy_from_slice(&salt)))
    }

    fn decrypt_des(&self, ciphertext: &[u8], salt: [u8; 8]) -> Result<Bytes> {
        use cbc::cipher::{BlockDecryptMut, KeyIvInit, block_padding::NoPadding};

        if ciphertext.is_empty() || ciphertext.len() % 8 != 0 {
            return Err(crypto_error(CryptoErrorKind::InvalidCiphertextLength {
                length: ciphertext.len(),
            }));
        }
        let iv = self.des_iv(&salt)?;
        let cipher = cbc::Decryptor::<des::Des>::new_from_slices(&self.key_material()?[..8], &iv)
            .map_err(|_| crypto_error(CryptoErrorKind::InvalidKeyLength))?;
        let mut buf = ciphertext.to_vec();
        let out = cipher
            .decrypt_padded_mut::<NoPadding>(&mut buf)
            .map_err(|_| crypto_error(CryptoErrorKind::CipherError))?;
        Ok(Bytes::copy_from_slice(out))
    }

    fn aes_iv(boots: u32, time: u32, salt: &[u8; 8]) -> [u8; 16] {
        let mut iv = [0u8; 16];
        iv[..4].copy_from_slice(&boots.to_be_bytes());
        iv[4..8].copy_from_slice(&time.to_be_bytes());
        iv[8..].copy_from_slice(salt);
        iv
    }

    fn encrypt_aes(&self, plaintext: &[u8], boots: u32, time: u32, salt: u64) -> Result<(Bytes, Bytes)> {
        let salt = salt.to_be_bytes();
        let iv = Self::aes_iv(boots, time, &salt);
        let mut buf = plaintext.to_vec();
        self.aes_cfb(&mut buf, &iv, true)?;
        Ok((Bytes::from(buf), Bytes::copy_from_slice(&salt)))
    }

    fn decrypt_aes(&self, ciphertext: &[u8], boots: u32, time: u32, salt: [u8; 8]) -> Result<Bytes> {
        let iv = Self::aes_iv(boots, time, &salt);
        let mut buf = ciphertext.to_vec();
        self.aes_cfb(&mut buf, &iv, false)?;
        Ok(Bytes::from(buf))
    }

    fn aes_cfb(&self, buf: &mut [u8], iv: &[u8; 16], encrypt: bool) -> Result<()> {
        use aes::{Aes128, Aes192, Aes256};
        use cfb_mode::cipher::{AsyncStreamCipher, KeyIvInit};

        macro_rules! run {
            ($cipher:ty) => {{
                let key = self.key_material()?;
                if encrypt {
                    cfb_mode::Encryptor::<$cipher>::new_from_slices(key, iv)
                        .map_err(|_| crypto_error(CryptoErrorKind::InvalidKeyLength))?
                        .encrypt(buf);
                } else {
                    cfb_mode::Decryptor::<$cipher>::new_from_slices(key, iv)
                        .map_err(|_| crypto_error(CryptoErrorKind::InvalidKeyLength))?
                        .decrypt(buf);
                }
            }};
        }

        match self.protocol {
            PrivProtocol::Aes128 => run!(Aes128),
            PrivProtocol::Aes192 => run!(Aes192),
            PrivProtocol::Aes256 => run!(Aes256),
            PrivProtocol::Des => return Err(crypto_error(CryptoErrorKind::CipherError)),
        }
        Ok(())
    }
}

impl std::fmt::Debug for PrivKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivKey")
            .field("protocol", &self.protocol)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(protocol: PrivProtocol) -> PrivKey {
        PrivKey::from_password(AuthProtocol::Sha1, protocol, b"privpass123", b"\x80\x00\x1f\x88\x04test")
    }

    #[test]
    fn test_des_pads_and_decrypts() {
        let k = key(PrivProtocol::Des);
        let (ct, params) = k.encrypt(b"hello scoped pdu", 3, 100).unwrap();
        assert_eq!(ct.len(), 16);
        assert_eq!(&params[..4], &3u32.to_be_bytes());
        let pt = k.decrypt(&ct, 3, 100, &params).unwrap();
        assert_eq!(&pt[..16], b"hello scoped pdu");

        let (ct, params) = k.encrypt(b"odd", 3, 100).unwrap();
        assert_eq!(ct.len(), 8);
        assert_eq!(&k.decrypt(&ct, 3, 100, &params).unwrap()[..3], b"odd");
    }

    #[test]
    fn test_aes_variants_roundtrip() {
        for protocol in [PrivProtocol::Aes128, PrivProtocol::Aes192, PrivProtocol::Aes256] {
            let k = key(protocol);
            let (ct, params) = k.encrypt(b"stream cipher keeps length", 1, 42).unwrap();
            assert_eq!(ct.len(), 26);
            assert_eq!(params.len(), 8);
            let pt = k.decrypt(&ct, 1, 42, &params).unwrap();
            assert_eq!(&pt[..], b"stream cipher keeps length");
        }
    }

    #[test]
    fn test_wrong_engine_time_garbles_aes() {
        let k = key(PrivProtocol::Aes128);
        let (ct, params) = k.encrypt(b"0123456789abcdef", 1, 42).unwrap();
        assert_ne!(&k.decrypt(&ct, 1, 43, &params).unwrap()[..], b"0123456789abcdef");
    }

    #[test]
    fn test_bad_params_rejected() {
        let k = key(PrivProtocol::Des);
        assert!(k.decrypt(&[0u8; 8], 0, 0, &[0u8; 4]).is_err());
        assert!(k.decrypt(&[0u8; 7], 0, 0, &[0u8; 8]).is_err());
    }

    #[test]
    fn test_salt_counter_skips_zero() {
        let counter = SaltCounter::from_value(u64::MAX);
        assert_eq!(counter.next(), u64::MAX);
        assert_eq!(counter.next(), 1);
        assert_eq!(counter.next(), 2);
    }
}
