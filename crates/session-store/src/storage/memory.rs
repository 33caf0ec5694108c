//! In-process vault backend
//!
//! Holds secrets in a map for the lifetime of the value. Used by tests and
//! by headless hosts without an OS secret service. Clones share the same
//! entries, so a clone behaves like a second handle on one vault.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::CredentialVault;
use crate::error::{Result, SessionStoreError};

type Entries = HashMap<(String, String), String>;

/// In-memory vault backend
#[derive(Debug, Default, Clone)]
pub struct MemoryVault {
    entries: Arc<Mutex<Entries>>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Entries>> {
        self.entries
            .lock()
            .map_err(|e| SessionStoreError::VaultUnavailable(e.to_string()))
    }

    /// Delete an entry, as a user would from the keychain manager
    pub fn remove(&self, service: &str, account: &str) -> Result<Option<String>> {
        Ok(self
            .lock()?
            .remove(&(service.to_string(), account.to_string())))
    }

    /// Number of stored entries
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl CredentialVault for MemoryVault {
    fn get(&self, service: &str, account: &str) -> Result<Option<String>> {
        Ok(self
            .lock()?
            .get(&(service.to_string(), account.to_string()))
            .cloned())
    }

    fn set(&self, service: &str, account: &str, secret: &str) -> Result<()> {
        self.lock()?.insert(
            (service.to_string(), account.to_string()),
            secret.to_string(),
        );
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "In-Memory Vault"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_entry() {
        let vault = MemoryVault::new();
        assert_eq!(vault.get("svc", "acct").unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let vault = MemoryVault::new();
        vault.set("svc", "acct", "secret").unwrap();

        assert_eq!(vault.get("svc", "acct").unwrap().as_deref(), Some("secret"));
        assert_eq!(vault.get("svc", "other").unwrap(), None);
    }

    #[test]
    fn test_clones_share_entries() {
        let vault = MemoryVault::new();
        let handle = vault.clone();
        handle.set("svc", "acct", "secret").unwrap();

        assert_eq!(vault.len().unwrap(), 1);
        assert_eq!(vault.remove("svc", "acct").unwrap().as_deref(), Some("secret"));
        assert!(handle.is_empty().unwrap());
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let vault = MemoryVault::new();
        let handle = vault.clone();
        let _ = std::thread::spawn(move || {
            let _guard = handle.entries.lock().unwrap();
            panic!("poison the vault lock");
        })
        .join();

        assert!(matches!(vault.len(), Err(SessionStoreError::VaultUnavailable(_))));
        assert!(vault.is_empty().is_err());
        assert!(vault.get("svc", "acct").is_err());
    }
}
