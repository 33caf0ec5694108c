//! Storage backends for the session catalog
//!
//! Two collaborators live here:
//! 1. Credential vaults holding the master key (OS keychain, in-memory)
//! 2. The SQLite database holding encrypted session rows

mod database;
mod keychain;
mod memory;
mod traits;

pub use database::{SessionDb, StoredRow};
pub use keychain::KeyringVault;
pub use memory::MemoryVault;
pub use traits::CredentialVault;
