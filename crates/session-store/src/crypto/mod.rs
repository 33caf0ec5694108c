//! Cryptographic primitives for the session catalog
//!
//! This module provides:
//! - AES-256-GCM tokens that carry their own IV and auth tag
//! - The installation master key with zeroize-on-drop

mod encryption;
mod secure_memory;

pub use encryption::{decrypt, encrypt, Token};
pub use secure_memory::MasterKey;
