//! Last-authenticated-session slot for instant resume.
//!
//! A cache, not an authority: the remote auth provider decides whether the
//! session is still valid, and nothing here re-checks it.

use super::{read_document, write_document, StoreResult, SESSION_KEY};
use crate::kv::KeyValueStore;
use crate::model::session::Session;
use log::warn;

pub struct SessionCache<'a, S: KeyValueStore> {
    kv: &'a S,
}

impl<'a, S: KeyValueStore> SessionCache<'a, S> {
    pub fn new(kv: &'a S) -> Self {
        Self { kv }
    }

    pub fn set(&self, session: &Session) -> StoreResult<()> {
        write_document(self.kv, SESSION_KEY, session, "session_cache_set")
    }

    /// Returns the cached session; unreadable slots read as empty.
    pub fn get(&self) -> Option<Session> {
        read_document(self.kv, SESSION_KEY, "session_cache_get").0
    }

    pub fn clear(&self) -> StoreResult<()> {
        self.kv.remove(SESSION_KEY).map_err(|err| {
            warn!("event=session_cache_clear module=store status=error error={err}");
            err.into()
        })
    }
}
