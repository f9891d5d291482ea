//! Whole-document persistence of `VaultData`.

use super::{read_document, write_document, KeyNamespace, RecordState, StoreResult};
use crate::clock::{Clock, SystemClock};
use crate::kv::KeyValueStore;
use crate::model::vault::VaultData;
use log::debug;

/// Loads and saves one identity's vault under its data key.
///
/// Every save rewrites the full document, inline file payloads included, so
/// write cost grows with the vault rather than with the edit.
pub struct VaultStore<'a, S: KeyValueStore, C: Clock = SystemClock> {
    kv: &'a S,
    clock: C,
}

impl<'a, S: KeyValueStore> VaultStore<'a, S> {
    pub fn new(kv: &'a S) -> Self {
        Self::with_clock(kv, SystemClock)
    }
}

impl<'a, S: KeyValueStore, C: Clock> VaultStore<'a, S, C> {
    /// Uses `clock` to timestamp the welcome note of a first-run vault.
    pub fn with_clock(kv: &'a S, clock: C) -> Self {
        Self { kv, clock }
    }

    /// Returns the stored vault, or a seeded one when none can be read.
    ///
    /// The empty identity returns a seeded vault without reading.
    pub fn load(&self, identity: &str) -> VaultData {
        self.load_with_state(identity).0
    }

    /// Like [`Self::load`], also reporting what was found in storage.
    pub fn load_with_state(&self, identity: &str) -> (VaultData, RecordState) {
        if identity.is_empty() {
            debug!("event=vault_load module=store status=skipped reason=empty_identity");
            return (VaultData::seeded(self.clock.now_ms()), RecordState::Absent);
        }

        let (vault, state) = read_document(self.kv, &KeyNamespace::data_key(identity), "vault_load");
        let vault = vault.unwrap_or_else(|| VaultData::seeded(self.clock.now_ms()));
        (vault, state)
    }

    /// Replaces the stored vault. No-op for the empty identity.
    ///
    /// # Errors
    /// - `StoreError::Write` when the medium rejects the document.
    pub fn save(&self, identity: &str, data: &VaultData) -> StoreResult<()> {
        if identity.is_empty() {
            debug!("event=vault_save module=store status=skipped reason=empty_identity");
            return Ok(());
        }
        write_document(self.kv, &KeyNamespace::data_key(identity), data, "vault_save")
    }
}
