//! Catalog configuration
//!
//! Resolves where the session database lives and which keychain
//! coordinates hold the master key. Both derive from the application name.

use directories::BaseDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, SessionStoreError};

/// File name of the session database inside the config directory
pub const DATABASE_FILE_NAME: &str = "sessions.db";

/// Location and identity of a session catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Application name, also used as keychain service and account
    app_name: String,
    /// Directory holding the database file
    config_dir: PathBuf,
}

impl CatalogConfig {
    /// Resolve `<user-config-dir>/<app_name>` for the current user
    pub fn for_app(app_name: &str) -> Result<Self> {
        Self::validate_name(app_name)?;

        let config_dir = BaseDirs::new()
            .map(|dirs| dirs.config_dir().join(app_name))
            .ok_or_else(|| {
                SessionStoreError::StoreUnavailable(
                    "Could not determine user config directory".to_string(),
                )
            })?;

        debug!("Resolved catalog directory: {:?}", config_dir);

        Ok(Self {
            app_name: app_name.to_string(),
            config_dir,
        })
    }

    /// Use an explicit directory instead of the user config directory
    pub fn with_dir(app_name: &str, config_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::validate_name(app_name)?;

        Ok(Self {
            app_name: app_name.to_string(),
            config_dir: config_dir.into(),
        })
    }

    fn validate_name(app_name: &str) -> Result<()> {
        if app_name.trim().is_empty() {
            return Err(SessionStoreError::InvalidConfig(
                "application name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path of the SQLite file backing the catalog
    pub fn database_path(&self) -> PathBuf {
        self.config_dir.join(DATABASE_FILE_NAME)
    }

    /// Keychain service name for the master key
    pub fn vault_service(&self) -> &str {
        &self.app_name
    }

    /// Keychain account name for the master key
    pub fn vault_account(&self) -> &str {
        &self.app_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_database_path_under_config_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = CatalogConfig::with_dir("toolsuite", temp_dir.path()).unwrap();

        assert_eq!(config.database_path(), temp_dir.path().join("sessions.db"));
    }

    #[test]
    fn test_vault_coordinates_use_app_name() {
        let config = CatalogConfig::with_dir("toolsuite", "/tmp/x").unwrap();

        assert_eq!(config.vault_service(), "toolsuite");
        assert_eq!(config.vault_account(), "toolsuite");
    }

    #[test]
    fn test_empty_app_name_rejected() {
        assert!(matches!(
            CatalogConfig::with_dir("  ", "/tmp/x"),
            Err(SessionStoreError::InvalidConfig(_))
        ));
    }
}
