//! Session record type definitions

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Result, SessionStoreError};

/// Port used when a stored port is missing or unusable
pub const DEFAULT_PORT: u16 = 22;

/// Username used when a stored record carries none
pub const DEFAULT_USERNAME: &str = "root";

/// One remote-shell target as entered in the connection dialog
///
/// Serialized to a JSON object with only the fields the record holds;
/// absent optional fields are omitted rather than written as null.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Human label; not unique at the storage layer
    pub name: String,

    #[serde(default, deserialize_with = "lenient_host")]
    pub host: String,

    #[serde(default = "default_port", deserialize_with = "lenient_port")]
    pub port: u16,

    #[serde(default = "default_username", deserialize_with = "lenient_username")]
    pub username: String,

    /// Present only when the user opted to save the password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Present only when key-file authentication is in use
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_file_path: Option<String>,
}

/// How a session authenticates when the user connects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    /// Private key file on disk
    KeyFile,
    /// Saved password
    Password,
    /// Nothing saved; ask the user at connect time
    Prompt,
}

impl SessionRecord {
    pub fn new(name: &str, host: &str, port: u16, username: &str) -> Self {
        Self {
            name: name.to_string(),
            host: host.to_string(),
            port,
            username: username.to_string(),
            password: None,
            key_file_path: None,
        }
    }

    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    pub fn with_key_file(mut self, path: &str) -> Self {
        self.key_file_path = Some(path.to_string());
        self
    }

    pub fn auth_method(&self) -> AuthMethod {
        if self.key_file_path.as_deref().is_some_and(|p| !p.is_empty()) {
            AuthMethod::KeyFile
        } else if self.password.as_deref().is_some_and(|p| !p.is_empty()) {
            AuthMethod::Password
        } else {
            AuthMethod::Prompt
        }
    }

    /// Reject records the dialog should never have produced
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SessionStoreError::InvalidRecord(
                "session name must not be empty".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(SessionStoreError::InvalidRecord(format!(
                "port must be between 1 and 65535 for session {}",
                self.name
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for SessionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}@{}:{})", self.name, self.username, self.host, self.port)
    }
}

impl std::fmt::Debug for SessionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRecord")
            .field("name", &self.name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("key_file_path", &self.key_file_path)
            .finish()
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_username() -> String {
    DEFAULT_USERNAME.to_string()
}

/// Read a text field, treating null as absent
fn lenient_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_host<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_username<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(Value::deserialize(deserializer)?).unwrap_or_else(default_username))
}

/// Accept an integer, a numeric string, or anything else as the default port
fn lenient_port<'de, D>(deserializer: D) -> std::result::Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_port(&value))
}

/// Coerce a stored port value, falling back to 22 when it is not a usable port
pub fn coerce_port(value: &Value) -> u16 {
    let candidate = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    candidate
        .filter(|p| (1..=u64::from(u16::MAX)).contains(p))
        .map(|p| p as u16)
        .unwrap_or(DEFAULT_PORT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_optionals_are_omitted() {
        let record = SessionRecord::new("prod", "10.0.0.1", 22, "root");
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(
            value,
            json!({"name": "prod", "host": "10.0.0.1", "port": 22, "username": "root"})
        );
    }

    #[test]
    fn test_present_optionals_are_written() {
        let record = SessionRecord::new("k", "h", 22, "u")
            .with_password("pw")
            .with_key_file("/home/u/.ssh/id_ed25519");
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["password"], "pw");
        assert_eq!(value["key_file_path"], "/home/u/.ssh/id_ed25519");
    }

    #[test]
    fn test_port_coercion() {
        assert_eq!(coerce_port(&json!(2222)), 2222);
        assert_eq!(coerce_port(&json!("22")), 22);
        assert_eq!(coerce_port(&json!(" 8022 ")), 8022);
        assert_eq!(coerce_port(&json!("abc")), 22);
        assert_eq!(coerce_port(&json!(0)), 22);
        assert_eq!(coerce_port(&json!(70000)), 22);
        assert_eq!(coerce_port(&json!(-5)), 22);
        assert_eq!(coerce_port(&json!(null)), 22);
        assert_eq!(coerce_port(&json!(2200.0)), 2200);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let record: SessionRecord = serde_json::from_value(json!({"name": "bare"})).unwrap();

        assert_eq!(record.host, "");
        assert_eq!(record.port, 22);
        assert_eq!(record.username, "root");
        assert_eq!(record.password, None);
        assert_eq!(record.key_file_path, None);
    }

    #[test]
    fn test_null_optionals_read_as_absent() {
        let record: SessionRecord = serde_json::from_value(
            json!({"name": "n", "port": "abc", "password": null, "key_file_path": null}),
        )
        .unwrap();

        assert_eq!(record.port, 22);
        assert_eq!(record.password, None);
        assert_eq!(record.key_file_path, None);
    }

    #[test]
    fn test_null_host_and_username_take_defaults() {
        let record: SessionRecord = serde_json::from_value(
            json!({"name": "n", "host": null, "port": 22, "username": null}),
        )
        .unwrap();

        assert_eq!(record, SessionRecord::new("n", "", 22, "root"));
    }

    #[test]
    fn test_non_string_host_is_kept_as_text() {
        let record: SessionRecord =
            serde_json::from_value(json!({"name": "n", "host": 10, "username": ""})).unwrap();

        assert_eq!(record.host, "10");
        assert_eq!(record.username, "");
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let result: std::result::Result<SessionRecord, _> =
            serde_json::from_value(json!({"host": "h"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_auth_method() {
        let base = SessionRecord::new("n", "h", 22, "u");
        assert_eq!(base.auth_method(), AuthMethod::Prompt);
        assert_eq!(base.clone().with_password("").auth_method(), AuthMethod::Prompt);
        assert_eq!(base.clone().with_password("pw").auth_method(), AuthMethod::Password);
        assert_eq!(
            base.with_password("pw").with_key_file("/k").auth_method(),
            AuthMethod::KeyFile
        );
    }

    #[test]
    fn test_validate() {
        assert!(SessionRecord::new("ok", "h", 22, "u").validate().is_ok());
        assert!(SessionRecord::new(" ", "h", 22, "u").validate().is_err());
        assert!(SessionRecord::new("zero", "h", 0, "u").validate().is_err());
    }

    #[test]
    fn test_debug_and_display_hide_password() {
        let record = SessionRecord::new("prod", "h", 22, "u").with_password("hunter2");

        assert!(!format!("{:?}", record).contains("hunter2"));
        assert_eq!(record.to_string(), "prod (u@h:22)");
    }
}
