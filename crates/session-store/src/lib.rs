//! # session-store
//!
//! Encrypted session catalog for the SSH tool:
//! - Per-installation master key held in the OS keychain
//! - AES-256-GCM encryption of each session record
//! - SQLite catalog with quarantine of rows that no longer decrypt
//! - Error reporting through a pluggable notifier

pub mod config;
pub mod crypto;
pub mod error;
pub mod master_key;
pub mod notify;
pub mod session;
pub mod storage;

pub use config::CatalogConfig;
pub use crypto::{MasterKey, Token};
pub use error::{DecodeError, Result, SessionStoreError};
pub use master_key::acquire_master_key;
pub use notify::{LogNotifier, Notifier};
pub use session::{AuthMethod, LoadReport, RecordCodec, SessionCatalog, SessionRecord};
pub use storage::{CredentialVault, KeyringVault, MemoryVault, SessionDb, StoredRow};
