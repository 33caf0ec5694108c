//! Session record codec
//!
//! Stored form of a record:
//!
//! ```text
//! data      = base64(token)
//! token     = AES-256-GCM(master_key, plaintext)   // iv || ciphertext || tag
//! plaintext = record_nonce(16) || utf8(json)
//! ```
//!
//! The record nonce is discarded on decode. The prefix keeps the on-disk
//! format fixed.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use super::types::SessionRecord;
use crate::crypto::{decrypt, encrypt, MasterKey, Token};
use crate::error::{DecodeError, Result};

/// Length of the random prefix inside each plaintext
pub const RECORD_NONCE_LEN: usize = 16;

/// Converts session records to and from their encrypted `data` text
#[derive(Debug, Clone)]
pub struct RecordCodec {
    key: MasterKey,
}

impl RecordCodec {
    pub fn new(key: MasterKey) -> Self {
        Self { key }
    }

    /// Encrypt a record into the text stored in the `data` column
    pub fn encode(&self, record: &SessionRecord) -> Result<String> {
        let json = Zeroizing::new(serde_json::to_vec(record)?);
        self.seal(&json)
    }

    /// Prefix a record nonce to raw JSON bytes, encrypt, and frame
    pub(crate) fn seal(&self, json: &[u8]) -> Result<String> {
        let mut plaintext = Zeroizing::new(Vec::with_capacity(RECORD_NONCE_LEN + json.len()));
        let mut record_nonce = [0u8; RECORD_NONCE_LEN];
        OsRng.fill_bytes(&mut record_nonce);

        plaintext.extend_from_slice(&record_nonce);
        plaintext.extend_from_slice(json);

        let token = encrypt(&plaintext, &self.key)?;
        Ok(STANDARD.encode(token.to_bytes()))
    }

    /// Decrypt the text of a `data` column back into a record
    pub fn decode(&self, data: &str) -> std::result::Result<SessionRecord, DecodeError> {
        let bytes = STANDARD
            .decode(data)
            .map_err(|e| DecodeError::MalformedFrame(e.to_string()))?;

        let token = Token::from_bytes(&bytes)?;
        let plaintext = Zeroizing::new(decrypt(&token, &self.key)?);

        if plaintext.len() < RECORD_NONCE_LEN {
            return Err(DecodeError::InvalidPayload(format!(
                "plaintext shorter than the {}-byte record nonce",
                RECORD_NONCE_LEN
            )));
        }

        serde_json::from_slice(&plaintext[RECORD_NONCE_LEN..])
            .map_err(|e| DecodeError::InvalidPayload(e.to_string()))
    }
}
