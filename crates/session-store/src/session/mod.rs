//! Encrypted SSH session catalog

mod catalog;
mod codec;
mod types;

pub use catalog::{LoadReport, QuarantinedRow, SessionCatalog};
pub use codec::{RecordCodec, RECORD_NONCE_LEN};
pub use types::{coerce_port, AuthMethod, SessionRecord, DEFAULT_PORT, DEFAULT_USERNAME};
