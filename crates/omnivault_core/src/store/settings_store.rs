//! Whole-document persistence of `UserSettings`.

use super::{read_document, write_document, KeyNamespace, RecordState, StoreResult};
use crate::kv::KeyValueStore;
use crate::model::settings::UserSettings;
use log::debug;

pub struct SettingsStore<'a, S: KeyValueStore> {
    kv: &'a S,
}

impl<'a, S: KeyValueStore> SettingsStore<'a, S> {
    pub fn new(kv: &'a S) -> Self {
        Self { kv }
    }

    /// Returns stored settings or defaults.
    ///
    /// The empty identity gets the anonymous defaults; a known identity
    /// without a readable record gets the new-user defaults.
    pub fn load(&self, identity: &str) -> UserSettings {
        self.load_with_state(identity).0
    }

    pub fn load_with_state(&self, identity: &str) -> (UserSettings, RecordState) {
        if identity.is_empty() {
            debug!("event=settings_load module=store status=skipped reason=empty_identity");
            return (UserSettings::default(), RecordState::Absent);
        }

        let (settings, state) =
            read_document(self.kv, &KeyNamespace::settings_key(identity), "settings_load");
        (settings.unwrap_or_else(UserSettings::for_new_user), state)
    }

    /// Replaces stored settings. No-op for the empty identity.
    pub fn save(&self, identity: &str, settings: &UserSettings) -> StoreResult<()> {
        if identity.is_empty() {
            debug!("event=settings_save module=store status=skipped reason=empty_identity");
            return Ok(());
        }
        write_document(
            self.kv,
            &KeyNamespace::settings_key(identity),
            settings,
            "settings_save",
        )
    }
}
