//! Error types for session-store

use thiserror::Error;

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, SessionStoreError>;

/// Session store error types
#[derive(Error, Debug)]
pub enum SessionStoreError {
    #[error("Credential vault unavailable: {0}")]
    VaultUnavailable(String),

    #[error("Master key in the credential vault is malformed: {0}")]
    MalformedMasterKey(String),

    #[error("Session database unavailable: {0}")]
    StoreUnavailable(String),

    #[error("A session with name {0} already exists")]
    DuplicateSession(String),

    #[error("Encryption failed: {0}")]
    EncryptionError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid session: {0}")]
    InvalidRecord(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Reasons a stored `data` string fails to turn back into a session record.
///
/// Every variant is recoverable by the catalog: the row is quarantined and
/// the remaining rows keep loading.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    #[error("authentication failed")]
    CorruptRecord,

    #[error("decrypted payload is not a session record: {0}")]
    InvalidPayload(String),
}
