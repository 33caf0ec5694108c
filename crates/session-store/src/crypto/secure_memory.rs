//! Master key handling with automatic zeroization

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{Result, SessionStoreError};

/// Length of the master key in bytes (AES-256)
pub const MASTER_KEY_LEN: usize = 32;

/// Installation master key - automatically zeroed when dropped
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MasterKey {
    key: [u8; MASTER_KEY_LEN],
}

impl MasterKey {
    /// Create a new master key from raw bytes
    pub fn new(key: [u8; MASTER_KEY_LEN]) -> Self {
        Self { key }
    }

    /// Generate a fresh key from the OS CSPRNG
    pub fn generate() -> Self {
        let mut key = [0u8; MASTER_KEY_LEN];
        OsRng.fill_bytes(&mut key);
        let master = Self { key };
        key.zeroize();
        master
    }

    /// Get the key bytes (use carefully - avoid copying)
    pub fn as_bytes(&self) -> &[u8; MASTER_KEY_LEN] {
        &self.key
    }

    /// Create from a slice (must be exactly 32 bytes)
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() != MASTER_KEY_LEN {
            return None;
        }
        let mut key = [0u8; MASTER_KEY_LEN];
        key.copy_from_slice(slice);
        Some(Self { key })
    }

    /// Parse the URL-safe base64 form stored in the credential vault
    pub fn from_encoded(encoded: &str) -> Result<Self> {
        let bytes = Zeroizing::new(
            URL_SAFE
                .decode(encoded.trim())
                .map_err(|e| SessionStoreError::MalformedMasterKey(e.to_string()))?,
        );

        Self::from_slice(&bytes).ok_or_else(|| {
            SessionStoreError::MalformedMasterKey(format!(
                "expected {} bytes, got {}",
                MASTER_KEY_LEN,
                bytes.len()
            ))
        })
    }

    /// URL-safe base64 rendering, as written to the credential vault
    pub fn to_encoded(&self) -> Zeroizing<String> {
        Zeroizing::new(URL_SAFE.encode(self.key))
    }
}

impl Clone for MasterKey {
    fn clone(&self) -> Self {
        Self { key: self.key }
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}
