//! Backup export/import of one identity's vault and settings.
//!
//! # Responsibility
//! - Combine stored `VaultData` and `UserSettings` into one document.
//! - Name export artifacts without leaking the full identity.
//! - Parse a backup document back into its two halves.
//!
//! # Invariants
//! - Export never writes to the stores.
//! - `import(export(u))` yields exactly what the stores held for `u`.

use crate::clock::{Clock, SystemClock};
use crate::kv::KeyValueStore;
use crate::model::settings::UserSettings;
use crate::model::vault::VaultData;
use crate::store::{SettingsStore, VaultStore};
use chrono::NaiveDate;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod sink;

pub use sink::{DirectoryExportSink, ExportSink};

pub const BACKUP_PRODUCT_NAME: &str = "omnivault";
const IDENTITY_FRAGMENT_CHARS: usize = 6;

pub type BackupResult<T> = Result<T, BackupError>;

#[derive(Debug)]
pub enum BackupError {
    Encode(serde_json::Error),
    /// Input is not a `{data, settings}` document.
    Malformed(serde_json::Error),
    Delivery(std::io::Error),
}

impl Display for BackupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode backup: {err}"),
            Self::Malformed(err) => write!(f, "malformed backup document: {err}"),
            Self::Delivery(err) => write!(f, "failed to deliver backup: {err}"),
        }
    }
}

impl Error for BackupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) | Self::Malformed(err) => Some(err),
            Self::Delivery(err) => Some(err),
        }
    }
}

/// Transportable snapshot of one identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupDocument {
    pub data: VaultData,
    pub settings: UserSettings,
}

impl BackupDocument {
    /// Pretty JSON with two-space indentation.
    pub fn to_json(&self) -> BackupResult<String> {
        serde_json::to_string_pretty(self).map_err(BackupError::Encode)
    }

    pub fn from_json(raw: &str) -> BackupResult<Self> {
        serde_json::from_str(raw).map_err(BackupError::Malformed)
    }

    pub fn into_parts(self) -> (VaultData, UserSettings) {
        (self.data, self.settings)
    }
}

/// `omnivault_backup_<first 6 chars of identity>_<YYYY-MM-DD>.json`
///
/// Fragment characters outside `[A-Za-z0-9_-]` become `_`, so base64
/// identities never inject path separators.
pub fn backup_file_name(identity: &str, day: NaiveDate) -> String {
    let fragment: String = identity
        .chars()
        .take(IDENTITY_FRAGMENT_CHARS)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "{BACKUP_PRODUCT_NAME}_backup_{fragment}_{}.json",
        day.format("%Y-%m-%d")
    )
}

/// Builds and restores backup documents over the vault and settings stores.
pub struct BackupCodec<'a, S: KeyValueStore, C: Clock = SystemClock> {
    vault: VaultStore<'a, S, C>,
    settings: SettingsStore<'a, S>,
}

impl<'a, S: KeyValueStore> BackupCodec<'a, S> {
    pub fn new(kv: &'a S) -> Self {
        Self::with_clock(kv, SystemClock)
    }
}

impl<'a, S: KeyValueStore, C: Clock> BackupCodec<'a, S, C> {
    pub fn with_clock(kv: &'a S, clock: C) -> Self {
        Self {
            vault: VaultStore::with_clock(kv, clock),
            settings: SettingsStore::new(kv),
        }
    }

    /// Snapshots what the stores currently hold for `identity`.
    pub fn export(&self, identity: &str) -> BackupDocument {
        BackupDocument {
            data: self.vault.load(identity),
            settings: self.settings.load(identity),
        }
    }

    /// Exports `identity` and hands the encoded file to `sink`.
    ///
    /// Returns the delivered file name.
    pub fn export_to(
        &self,
        identity: &str,
        day: NaiveDate,
        sink: &dyn ExportSink,
    ) -> BackupResult<String> {
        let file_name = backup_file_name(identity, day);
        let contents = self.export(identity).to_json()?;
        match sink.deliver(&file_name, &contents) {
            Ok(()) => {
                info!(
                    "event=backup_export module=backup status=ok bytes={}",
                    contents.len()
                );
                Ok(file_name)
            }
            Err(err) => {
                error!("event=backup_export module=backup status=error error={err}");
                Err(BackupError::Delivery(err))
            }
        }
    }

    /// Parses a backup document; the structural inverse of [`Self::export`].
    ///
    /// Nothing is written; callers decide whether to adopt the result.
    pub fn import(&self, raw: &str) -> BackupResult<(VaultData, UserSettings)> {
        let document = BackupDocument::from_json(raw).inspect_err(|err| {
            error!("event=backup_import module=backup status=error error={err}");
        })?;
        info!(
            "event=backup_import module=backup status=ok bytes={} tasks={} notes={} files={}",
            raw.len(),
            document.data.tasks.len(),
            document.data.notes.len(),
            document.data.files.len()
        );
        Ok(document.into_parts())
    }
}
