//! Installation master key
//!
//! The key lives in the credential vault under `(app_name, app_name)` as
//! URL-safe base64 of 32 random bytes. It is created on first use and never
//! rotated; deleting the vault entry makes every stored session unreadable.

use tracing::{debug, info};

use crate::config::CatalogConfig;
use crate::crypto::MasterKey;
use crate::error::Result;
use crate::storage::CredentialVault;

/// Return the installation master key, provisioning it on first call
pub fn acquire_master_key(vault: &dyn CredentialVault, config: &CatalogConfig) -> Result<MasterKey> {
    let service = config.vault_service();
    let account = config.vault_account();

    if let Some(encoded) = vault.get(service, account)? {
        debug!("Using existing master key from {}", vault.backend_name());
        return MasterKey::from_encoded(&encoded);
    }

    let key = MasterKey::generate();
    vault.set(service, account, &key.to_encoded())?;

    info!("Provisioned new master key in {}", vault.backend_name());
    Ok(key)
}
