//! Credential vault trait definitions

use crate::error::Result;

/// Keyed secret store living outside the process (e.g. the OS keychain)
///
/// Entries are addressed by `(service, account)`. Implementations map
/// "no such entry" to `Ok(None)` and every other backend failure to
/// `SessionStoreError::VaultUnavailable`.
pub trait CredentialVault: Send + Sync {
    /// Read the secret stored under `(service, account)`
    fn get(&self, service: &str, account: &str) -> Result<Option<String>>;

    /// Create or overwrite the secret stored under `(service, account)`
    fn set(&self, service: &str, account: &str, secret: &str) -> Result<()>;

    /// Get a human-readable name for this vault backend
    fn backend_name(&self) -> &'static str;
}
