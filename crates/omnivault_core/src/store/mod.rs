//! Per-identity stores over the durable key-value medium.
//!
//! # Responsibility
//! - Derive storage keys from an identity.
//! - Load/save whole `VaultData` and `UserSettings` documents.
//! - Hold the identity-independent session cache slot.
//!
//! # Invariants
//! - Writes always replace the whole document; there are no field writes.
//! - Loads never fail: absent, unreadable or corrupt records yield defaults.
//! - Loads report `RecordState` so callers can tell a first run from an
//!   unreadable record.
//! - The empty identity never touches the medium.

use crate::kv::KvError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod key_namespace;
mod session_cache;
mod settings_store;
mod vault_store;

pub use key_namespace::{KeyNamespace, StorageKeys, SESSION_KEY};
pub use session_cache::SessionCache;
pub use settings_store::SettingsStore;
pub use vault_store::VaultStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// What a load found under the document's key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    Stored,
    /// Nothing stored yet; defaults were produced.
    Absent,
    /// A value exists but could not be read or decoded; defaults were
    /// produced and the stored value was left as is.
    Unreadable,
}

#[derive(Debug)]
pub enum StoreError {
    /// Document could not be encoded.
    Serialize(serde_json::Error),
    /// The medium rejected the write (quota, unavailable backend).
    Write(KvError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialize(err) => write!(f, "failed to encode document: {err}"),
            Self::Write(err) => write!(f, "storage write failed: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Serialize(err) => Some(err),
            Self::Write(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

impl From<KvError> for StoreError {
    fn from(value: KvError) -> Self {
        Self::Write(value)
    }
}

/// Reads and decodes one document.
///
/// Returns the document, or `None` with the reason it could not be produced.
pub(crate) fn read_document<T: serde::de::DeserializeOwned>(
    kv: &impl crate::kv::KeyValueStore,
    key: &str,
    event: &str,
) -> (Option<T>, RecordState) {
    let raw = match kv.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            log::debug!("event={event} module=store status=ok found=false");
            return (None, RecordState::Absent);
        }
        Err(err) => {
            log::warn!("event={event} module=store status=error error_code=read_failed error={err}");
            return (None, RecordState::Unreadable);
        }
    };

    match serde_json::from_str(&raw) {
        Ok(document) => {
            log::debug!(
                "event={event} module=store status=ok found=true bytes={}",
                raw.len()
            );
            (Some(document), RecordState::Stored)
        }
        Err(err) => {
            log::warn!(
                "event={event} module=store status=error error_code=corrupt_record bytes={} error={err}",
                raw.len()
            );
            (None, RecordState::Unreadable)
        }
    }
}

/// Encodes and writes one document, replacing the previous value.
pub(crate) fn write_document<T: serde::Serialize>(
    kv: &impl crate::kv::KeyValueStore,
    key: &str,
    document: &T,
    event: &str,
) -> StoreResult<()> {
    let encoded = serde_json::to_string(document)?;
    match kv.set(key, &encoded) {
        Ok(()) => {
            log::debug!(
                "event={event} module=store status=ok bytes={}",
                encoded.len()
            );
            Ok(())
        }
        Err(err) => {
            log::error!(
                "event={event} module=store status=error bytes={} error={err}",
                encoded.len()
            );
            Err(err.into())
        }
    }
}
