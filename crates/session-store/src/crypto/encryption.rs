//! AES-256-GCM authenticated encryption
//!
//! Token layout: `{iv}{ciphertext}{auth_tag}`
//! - IV: 12 bytes (96 bits) - standard for GCM
//! - Ciphertext: variable length
//! - Auth tag: 16 bytes (128 bits)
//!
//! A token is self-contained: whoever holds the key can decrypt it without
//! any side-channel metadata.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::RngCore;

use super::MasterKey;
use crate::error::{DecodeError, Result, SessionStoreError};

const IV_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Encrypted payload with IV and auth tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Initialization vector (12 bytes for GCM)
    pub iv: [u8; IV_LEN],
    /// Encrypted ciphertext
    pub ciphertext: Vec<u8>,
    /// Authentication tag (16 bytes)
    pub auth_tag: [u8; TAG_LEN],
}

impl Token {
    /// Serialize to `iv || ciphertext || auth_tag`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(IV_LEN + self.ciphertext.len() + TAG_LEN);
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(&self.ciphertext);
        out.extend_from_slice(&self.auth_tag);
        out
    }

    /// Parse `iv || ciphertext || auth_tag`
    ///
    /// A buffer too short to hold an IV and tag cannot have come from
    /// `to_bytes`, so it is reported as a corrupt record.
    pub fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, DecodeError> {
        if bytes.len() < IV_LEN + TAG_LEN {
            return Err(DecodeError::CorruptRecord);
        }

        let tag_start = bytes.len() - TAG_LEN;

        let mut iv = [0u8; IV_LEN];
        iv.copy_from_slice(&bytes[..IV_LEN]);

        let mut auth_tag = [0u8; TAG_LEN];
        auth_tag.copy_from_slice(&bytes[tag_start..]);

        Ok(Self {
            iv,
            ciphertext: bytes[IV_LEN..tag_start].to_vec(),
            auth_tag,
        })
    }
}

/// Encrypt plaintext using AES-256-GCM under a fresh random IV
pub fn encrypt(plaintext: &[u8], key: &MasterKey) -> Result<Token> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| SessionStoreError::EncryptionError(e.to_string()))?;

    let mut iv = [0u8; IV_LEN];
    rand::thread_rng().fill_bytes(&mut iv);
    let nonce = Nonce::from_slice(&iv);

    // aes-gcm appends the auth tag to the ciphertext
    let ciphertext_with_tag = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| SessionStoreError::EncryptionError(e.to_string()))?;

    if ciphertext_with_tag.len() < TAG_LEN {
        return Err(SessionStoreError::EncryptionError(
            "Ciphertext too short".to_string(),
        ));
    }

    let tag_start = ciphertext_with_tag.len() - TAG_LEN;
    let mut auth_tag = [0u8; TAG_LEN];
    auth_tag.copy_from_slice(&ciphertext_with_tag[tag_start..]);

    Ok(Token {
        iv,
        ciphertext: ciphertext_with_tag[..tag_start].to_vec(),
        auth_tag,
    })
}

/// Decrypt and authenticate a token
///
/// Any tampering, or a key other than the one used to encrypt, yields
/// `DecodeError::CorruptRecord`.
pub fn decrypt(token: &Token, key: &MasterKey) -> std::result::Result<Vec<u8>, DecodeError> {
    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| DecodeError::CorruptRecord)?;

    let nonce = Nonce::from_slice(&token.iv);

    let mut ciphertext_with_tag = token.ciphertext.clone();
    ciphertext_with_tag.extend_from_slice(&token.auth_tag);

    cipher
        .decrypt(nonce, ciphertext_with_tag.as_slice())
        .map_err(|_| DecodeError::CorruptRecord)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> MasterKey {
        MasterKey::generate()
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = test_key();
        let plaintext = b"Hello, World!";

        let token = encrypt(plaintext, &key).unwrap();
        let decrypted = decrypt(&token, &key).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_token_bytes_layout() {
        let key = test_key();
        let token = encrypt(b"0123456789", &key).unwrap();
        let bytes = token.to_bytes();

        assert_eq!(bytes.len(), IV_LEN + 10 + TAG_LEN);
        assert_eq!(&bytes[..IV_LEN], &token.iv);
        assert_eq!(Token::from_bytes(&bytes).unwrap(), token);
    }

    #[test]
    fn test_different_ivs_produce_different_ciphertext() {
        let key = test_key();
        let plaintext = b"same plaintext";

        let token1 = encrypt(plaintext, &key).unwrap();
        let token2 = encrypt(plaintext, &key).unwrap();

        assert_ne!(token1.iv, token2.iv);
        assert_ne!(token1.ciphertext, token2.ciphertext);
    }

    #[test]
    fn test_wrong_key_fails_decryption() {
        let token = encrypt(b"secret data", &test_key()).unwrap();
        assert_eq!(decrypt(&token, &test_key()), Err(DecodeError::CorruptRecord));
    }

    #[test]
    fn test_tampered_ciphertext_fails_decryption() {
        let key = test_key();
        let mut token = encrypt(b"secret data", &key).unwrap();
        token.ciphertext[0] ^= 0xFF;

        assert_eq!(decrypt(&token, &key), Err(DecodeError::CorruptRecord));
    }

    #[test]
    fn test_tampered_auth_tag_fails_decryption() {
        let key = test_key();
        let mut token = encrypt(b"secret data", &key).unwrap();
        token.auth_tag[0] ^= 0xFF;

        assert_eq!(decrypt(&token, &key), Err(DecodeError::CorruptRecord));
    }

    #[test]
    fn test_truncated_token_rejected() {
        assert_eq!(Token::from_bytes(&[0u8; 27]), Err(DecodeError::CorruptRecord));
        assert!(Token::from_bytes(&[0u8; 28]).is_ok());
    }
}
