//! Session catalog
//!
//! The persistent collection of encrypted session records. Every operation
//! opens the database, runs to completion on the calling thread, and closes
//! it again; there is no long-lived handle and no cross-operation
//! transaction.
//!
//! The façade (`save`, `load_all`, `remove`) never returns errors. Failures
//! go to the configured [`Notifier`], one notification per error. The
//! `try_*` twins expose the same operations with `Result` for callers that
//! want to handle failures themselves.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::codec::RecordCodec;
use super::types::SessionRecord;
use crate::config::CatalogConfig;
use crate::error::{DecodeError, Result, SessionStoreError};
use crate::master_key::acquire_master_key;
use crate::notify::{LogNotifier, Notifier};
use crate::storage::{CredentialVault, SessionDb, StoredRow};

/// A row evicted because it no longer decodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuarantinedRow {
    pub id: i64,
    /// Raw `data` text of the row, if it was text at all
    pub data: Option<String>,
    pub reason: DecodeError,
    /// False when the delete itself failed and the row is still on disk
    pub removed: bool,
}

/// Outcome of loading the catalog
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Decoded records, in row order
    pub sessions: Vec<SessionRecord>,
    pub quarantined: Vec<QuarantinedRow>,
}

/// Encrypted session catalog
pub struct SessionCatalog {
    config: CatalogConfig,
    codec: RecordCodec,
    notifier: Arc<dyn Notifier>,
}

impl SessionCatalog {
    /// Prepare the catalog: create the config directory and the sessions
    /// table, then resolve the master key from the vault
    pub fn open(config: CatalogConfig, vault: &dyn CredentialVault) -> Result<Self> {
        std::fs::create_dir_all(config.config_dir()).map_err(|e| {
            SessionStoreError::StoreUnavailable(format!(
                "create {}: {}",
                config.config_dir().display(),
                e
            ))
        })?;

        SessionDb::open(&config.database_path())?;
        let key = acquire_master_key(vault, &config)?;

        debug!("Session catalog ready at {:?}", config.database_path());

        Ok(Self {
            config,
            codec: RecordCodec::new(key),
            notifier: Arc::new(LogNotifier),
        })
    }

    /// Route user-visible errors to the given notifier
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    fn connect(&self) -> Result<SessionDb> {
        SessionDb::open(&self.config.database_path())
    }

    fn decode_row(&self, row: &StoredRow) -> std::result::Result<SessionRecord, DecodeError> {
        match &row.data {
            Some(data) => self.codec.decode(data),
            None => Err(DecodeError::MalformedFrame("data is not text".to_string())),
        }
    }

    /// Store a session as entered in the connection dialog
    ///
    /// The password is kept only when `save_password` is set; the key file
    /// path only when one was given.
    #[allow(clippy::too_many_arguments)]
    pub fn save(
        &self,
        name: &str,
        host: &str,
        port: u16,
        username: &str,
        password: &str,
        save_password: bool,
        key_file_path: Option<&str>,
    ) {
        let mut record = SessionRecord::new(name, host, port, username);
        if save_password {
            record = record.with_password(password);
        }
        if let Some(path) = key_file_path {
            record = record.with_key_file(path);
        }

        if let Err(e) = self.try_save(&record) {
            self.notifier.notify_error("Save Session", &e.to_string());
        }
    }

    /// Encrypt and insert one record, returning the new row id
    ///
    /// No check is made for an existing session with the same name.
    pub fn try_save(&self, record: &SessionRecord) -> Result<i64> {
        record.validate()?;

        let data = self.codec.encode(record)?;
        let db = self.connect()?;

        let id = db.insert(&data).map_err(|e| match e {
            SessionStoreError::Database(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                SessionStoreError::DuplicateSession(record.name.clone())
            }
            other => other,
        })?;

        info!("Saved session {}", record.name);
        Ok(id)
    }

    /// All readable sessions; unreadable rows are reported and quarantined
    pub fn load_all(&self) -> Vec<SessionRecord> {
        match self.try_load_all() {
            Ok(report) => {
                for row in &report.quarantined {
                    let handle = match &row.data {
                        Some(data) => data.clone(),
                        None => format!("row {}", row.id),
                    };
                    self.notifier.notify_error(
                        "Load Sessions",
                        &format!("Failed to load session {}: {}", handle, row.reason),
                    );
                }
                report.sessions
            }
            Err(e) => {
                self.notifier.notify_error("Load Sessions", &e.to_string());
                Vec::new()
            }
        }
    }

    /// Decode every row, quarantining the ones that fail
    pub fn try_load_all(&self) -> Result<LoadReport> {
        let db = self.connect()?;
        let mut report = LoadReport::default();

        for row in db.rows()? {
            match self.decode_row(&row) {
                Ok(record) => report.sessions.push(record),
                Err(reason) => {
                    let removed = Self::quarantine(&db, &row);
                    report.quarantined.push(QuarantinedRow {
                        id: row.id,
                        data: row.data,
                        reason,
                        removed,
                    });
                }
            }
        }

        debug!(
            "Loaded {} session(s), quarantined {}",
            report.sessions.len(),
            report.quarantined.len()
        );
        Ok(report)
    }

    /// Delete a row that cannot be decrypted. Nothing is kept: without the
    /// key that wrote it the row is unrecoverable. Rows with no text handle
    /// are deleted by id.
    fn quarantine(db: &SessionDb, row: &StoredRow) -> bool {
        let result = match &row.data {
            Some(data) => db.delete_by_data(data),
            None => db.delete_by_id(row.id),
        };

        match result {
            Ok(_) => {
                warn!("Quarantined unreadable session row {}", row.id);
                true
            }
            Err(e) => {
                warn!("Could not quarantine session row {}: {}", row.id, e);
                false
            }
        }
    }

    /// Delete the first session with this name, if any
    pub fn remove(&self, name: &str) {
        if let Err(e) = self.try_remove(name) {
            self.notifier.notify_error("Remove Session", &e.to_string());
        }
    }

    /// Delete the first session with this name; returns whether one was found
    ///
    /// Rows that fail to decode are skipped, not deleted. Later rows with
    /// the same name are left in place.
    pub fn try_remove(&self, name: &str) -> Result<bool> {
        let db = self.connect()?;

        for row in db.rows()? {
            match (self.decode_row(&row), &row.data) {
                (Ok(record), Some(data)) if record.name == name => {
                    db.delete_by_data(data)?;
                    info!("Removed session {}", name);
                    return Ok(true);
                }
                (Ok(_), _) => {}
                (Err(reason), _) => debug!("Skipping unreadable row {}: {}", row.id, reason),
            }
        }

        debug!("No session named {}", name);
        Ok(false)
    }

    /// First readable session with this name
    pub fn find(&self, name: &str) -> Result<Option<SessionRecord>> {
        let db = self.connect()?;

        Ok(db
            .rows()?
            .into_iter()
            .filter_map(|row| self.decode_row(&row).ok())
            .find(|record| record.name == name))
    }
}
