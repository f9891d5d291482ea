//! `AppController`: the single owner of live session state.

use super::{
    ActiveSession, ControllerError, ControllerResult, InsightTicket, LoginOutcome, SessionStatus,
};
use crate::backup::{BackupCodec, BackupDocument, ExportSink};
use crate::clock::{Clock, SystemClock};
use crate::config::CoreConfig;
use crate::kv::KeyValueStore;
use crate::model::payload::encode_data_url;
use crate::model::session::{Identity, Session};
use crate::model::settings::{Language, UserSettings};
use crate::model::vault::{
    EditResult, Goal, GoalKind, Habit, Note, Task, VaultData, VaultFile, VaultSummary, VoiceNote,
};
use crate::service::assistant::{
    AssistantGateway, AssistantProvider, AssistantResult, InsightPrompt,
};
use crate::service::auth::{offline_session, AuthProvider, AuthResult, AuthUser};
use crate::store::{RecordState, SessionCache, SettingsStore, VaultStore};
use chrono::NaiveDate;
use log::{debug, info, warn};
use std::time::Duration;
use uuid::Uuid;

const NEW_NOTE_TITLE_AR: &str = "سجل استخباراتي جديد";
const NEW_NOTE_TITLE: &str = "New Classified Intel";

/// Timestamp and date shared by one edit.
struct EditClock {
    now_ms: i64,
    today: NaiveDate,
}

fn new_item_id() -> String {
    Uuid::new_v4().to_string()
}

/// Orchestrates login state, live vault state and persistence.
///
/// Single-threaded: every method runs to completion before the next event.
pub struct AppController<'a, S: KeyValueStore, C: Clock = SystemClock> {
    kv: &'a S,
    clock: C,
    status: SessionStatus,
    settings: UserSettings,
    insight: String,
    insight_timeout: Duration,
    last_insight_seq: u64,
    /// Newest issued request still awaiting a response: `(seq, issued_at_ms)`.
    awaited_insight: Option<(u64, i64)>,
    undispatched_insight: Option<InsightTicket>,
}

impl<'a, S: KeyValueStore> AppController<'a, S> {
    pub fn new(kv: &'a S, config: &CoreConfig) -> Self {
        Self::with_clock(kv, SystemClock, config)
    }
}

impl<'a, S: KeyValueStore, C: Clock> AppController<'a, S, C> {
    pub fn with_clock(kv: &'a S, clock: C, config: &CoreConfig) -> Self {
        Self {
            kv,
            clock,
            status: SessionStatus::Loading,
            settings: UserSettings::default(),
            insight: String::new(),
            insight_timeout: config.insight_timeout,
            last_insight_seq: 0,
            awaited_insight: None,
            undispatched_insight: None,
        }
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn session(&self) -> Option<&Session> {
        self.active().map(|active| &active.session)
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.session().map(Session::identity)
    }

    pub fn vault(&self) -> Option<&VaultData> {
        self.active().map(|active| &active.vault)
    }

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    /// Latest advisory text; empty until the first insight arrives.
    pub fn insight(&self) -> &str {
        &self.insight
    }

    pub fn dashboard(&self) -> Option<VaultSummary> {
        self.vault().map(VaultData::summary)
    }

    fn active(&self) -> Option<&ActiveSession> {
        match &self.status {
            SessionStatus::Authenticated(active) => Some(active),
            _ => None,
        }
    }

    // Session lifecycle

    /// Resolves the startup session: cached slot first, then the provider.
    ///
    /// A cached session is trusted without contacting the provider.
    pub fn bootstrap<A: AuthProvider>(&mut self, auth: &A) -> &SessionStatus {
        if let Some(session) = SessionCache::new(self.kv).get() {
            info!("event=session_resume module=controller status=ok source=cache");
            self.enter_session(session);
            return &self.status;
        }

        match auth.current_user().and_then(|user| user.map(AuthUser::into_session).transpose()) {
            Ok(Some(session)) => {
                info!("event=session_resume module=controller status=ok source=provider");
                self.enter_session(session);
            }
            Ok(None) => {
                info!("event=session_resume module=controller status=skipped reason=no_session");
                self.status = SessionStatus::Unauthenticated;
            }
            Err(err) => {
                warn!("event=session_resume module=controller status=error error={err}");
                self.status = SessionStatus::Unauthenticated;
            }
        }
        &self.status
    }

    pub fn sign_in<A: AuthProvider>(
        &mut self,
        auth: &A,
        email: &str,
        password: &str,
    ) -> ControllerResult<LoginOutcome> {
        let result = auth.sign_in(email, password);
        self.complete_login(result, email)
    }

    pub fn sign_up<A: AuthProvider>(
        &mut self,
        auth: &A,
        email: &str,
        password: &str,
    ) -> ControllerResult<LoginOutcome> {
        let result = auth.sign_up(email, password);
        self.complete_login(result, email)
    }

    /// Ends the session: provider sign-out, cache cleared, live state dropped.
    ///
    /// Stored vault and settings are kept.
    pub fn logout<A: AuthProvider>(&mut self, auth: &A) -> ControllerResult<()> {
        if let Err(err) = auth.sign_out() {
            warn!("event=logout module=controller status=error stage=provider error={err}");
        }
        let cleared = SessionCache::new(self.kv).clear();

        self.status = SessionStatus::Unauthenticated;
        self.settings = UserSettings::default();
        self.insight.clear();
        self.awaited_insight = None;
        self.undispatched_insight = None;
        info!("event=logout module=controller status=ok");

        cleared.map_err(Into::into)
    }

    fn complete_login(
        &mut self,
        result: AuthResult<AuthUser>,
        email: &str,
    ) -> ControllerResult<LoginOutcome> {
        let session = match result {
            Ok(user) => user.into_session()?,
            Err(err) if err.allows_offline_fallback() => {
                warn!("event=login module=controller status=degraded error={err}");
                offline_session(email)?
            }
            Err(err) => {
                warn!("event=login module=controller status=error error={err}");
                return Err(err.into());
            }
        };

        let outcome = if session.is_degraded() {
            LoginOutcome::Degraded
        } else {
            LoginOutcome::Verified
        };
        self.enter_session(session);
        Ok(outcome)
    }

    fn enter_session(&mut self, session: Session) {
        if let Err(err) = SessionCache::new(self.kv).set(&session) {
            warn!("event=session_enter module=controller status=error stage=cache error={err}");
        }

        let identity = session.identity().as_str();
        let (settings, settings_state) = SettingsStore::new(self.kv).load_with_state(identity);
        let (vault, vault_state) =
            VaultStore::with_clock(self.kv, &self.clock).load_with_state(identity);

        // First-run defaults become durable right away. Unreadable records
        // are left in place until the user edits.
        match settings_state {
            RecordState::Absent => {
                if let Err(err) = SettingsStore::new(self.kv).save(identity, &settings) {
                    warn!("event=session_enter module=controller status=error stage=settings error={err}");
                }
            }
            RecordState::Unreadable => {
                warn!("event=session_enter module=controller status=degraded stage=settings reason=unreadable_record");
            }
            RecordState::Stored => {}
        }
        match vault_state {
            RecordState::Absent => {
                if let Err(err) = VaultStore::with_clock(self.kv, &self.clock).save(identity, &vault) {
                    warn!("event=session_enter module=controller status=error stage=vault error={err}");
                }
            }
            RecordState::Unreadable => {
                warn!("event=session_enter module=controller status=degraded stage=vault reason=unreadable_record");
            }
            RecordState::Stored => {}
        }

        info!(
            "event=session_enter module=controller status=ok mode={:?} tasks={} notes={} habits={}",
            session.mode(),
            vault.tasks.len(),
            vault.notes.len(),
            vault.habits.len()
        );
        self.settings = settings;
        self.status = SessionStatus::Authenticated(ActiveSession { session, vault });
        self.schedule_insight();
    }

    // Settings

    /// Applies `edit` and persists the whole settings document.
    ///
    /// Before login only the in-memory copy changes.
    pub fn update_settings(&mut self, edit: impl FnOnce(&mut UserSettings)) -> ControllerResult<()> {
        edit(&mut self.settings);
        let Some(active) = self.active() else {
            debug!("event=settings_update module=controller status=ok persisted=false");
            return Ok(());
        };
        SettingsStore::new(self.kv).save(active.session.identity().as_str(), &self.settings)?;
        Ok(())
    }

    pub fn set_language(&mut self, language: Language) -> ControllerResult<()> {
        self.update_settings(|settings| settings.language = language)
    }

    pub fn replace_settings(&mut self, settings: UserSettings) -> ControllerResult<()> {
        self.update_settings(|current| *current = settings)
    }

    // Vault edits

    /// Applies `edit` to the live vault and persists the whole document.
    ///
    /// On a write failure the edit stays applied in memory and the error is
    /// returned for display.
    fn edit_vault<T>(
        &mut self,
        edit: impl FnOnce(&mut VaultData, &EditClock) -> EditResult<T>,
    ) -> ControllerResult<T> {
        let stamp = EditClock {
            now_ms: self.clock.now_ms(),
            today: self.clock.today(),
        };
        let SessionStatus::Authenticated(active) = &mut self.status else {
            return Err(ControllerError::NotAuthenticated);
        };

        let before = (active.vault.tasks.len(), active.vault.habits.len());
        let value = edit(&mut active.vault, &stamp)?;
        let after = (active.vault.tasks.len(), active.vault.habits.len());

        let saved = VaultStore::with_clock(self.kv, &self.clock)
            .save(active.session.identity().as_str(), &active.vault);

        if before != after {
            self.schedule_insight();
        }
        saved?;
        Ok(value)
    }

    pub fn add_task(&mut self, text: &str) -> ControllerResult<Task> {
        self.edit_vault(|vault, at| vault.add_task(new_item_id(), text, at.now_ms).cloned())
    }

    pub fn toggle_task(&mut self, id: &str) -> ControllerResult<bool> {
        self.edit_vault(|vault, _| vault.toggle_task(id))
    }

    pub fn delete_task(&mut self, id: &str) -> ControllerResult<()> {
        self.edit_vault(|vault, _| vault.delete_task(id).map(drop))
    }

    /// Creates a note; without a title, a default in the active language.
    pub fn create_note(&mut self, title: Option<&str>) -> ControllerResult<Note> {
        let default_title = match self.settings.language {
            Language::Ar => NEW_NOTE_TITLE_AR,
            Language::En | Language::Fr => NEW_NOTE_TITLE,
        };
        let title = title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(default_title);
        self.edit_vault(|vault, at| vault.create_note(new_item_id(), title, at.now_ms).cloned())
    }

    pub fn update_note_content(&mut self, id: &str, content: &str) -> ControllerResult<()> {
        self.edit_vault(|vault, at| vault.update_note_content(id, content, at.now_ms))
    }

    pub fn rename_note(&mut self, id: &str, title: &str) -> ControllerResult<()> {
        self.edit_vault(|vault, at| vault.rename_note(id, title, at.now_ms))
    }

    pub fn set_note_locked(&mut self, id: &str, locked: bool) -> ControllerResult<()> {
        self.edit_vault(|vault, _| vault.set_note_locked(id, locked))
    }

    pub fn attach_file_to_note(&mut self, note_id: &str, file_id: &str) -> ControllerResult<bool> {
        self.edit_vault(|vault, _| vault.attach_file(note_id, file_id))
    }

    pub fn delete_note(&mut self, id: &str) -> ControllerResult<()> {
        self.edit_vault(|vault, _| vault.delete_note(id).map(drop))
    }

    pub fn add_habit(&mut self, name: &str) -> ControllerResult<Habit> {
        self.edit_vault(|vault, _| vault.add_habit(new_item_id(), name).cloned())
    }

    /// Toggles today's completion (UTC date of the controller clock).
    pub fn toggle_habit_today(&mut self, id: &str) -> ControllerResult<bool> {
        self.edit_vault(|vault, at| vault.toggle_habit_day(id, at.today))
    }

    pub fn delete_habit(&mut self, id: &str) -> ControllerResult<()> {
        self.edit_vault(|vault, _| vault.delete_habit(id).map(drop))
    }

    pub fn add_goal(&mut self, text: &str, kind: GoalKind) -> ControllerResult<Goal> {
        self.edit_vault(|vault, at| vault.add_goal(new_item_id(), text, kind, at.now_ms).cloned())
    }

    pub fn toggle_goal(&mut self, id: &str) -> ControllerResult<bool> {
        self.edit_vault(|vault, _| vault.toggle_goal(id))
    }

    pub fn delete_goal(&mut self, id: &str) -> ControllerResult<()> {
        self.edit_vault(|vault, _| vault.delete_goal(id).map(drop))
    }

    /// Stores an uploaded file inline in the vault document.
    pub fn upload_file(
        &mut self,
        name: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> ControllerResult<VaultFile> {
        self.edit_vault(|vault, at| {
            let file = VaultFile::from_bytes(new_item_id(), name, mime_type, bytes, at.now_ms);
            Ok(vault.add_file(file).clone())
        })
    }

    pub fn delete_file(&mut self, id: &str) -> ControllerResult<()> {
        self.edit_vault(|vault, _| vault.delete_file(id).map(drop))
    }

    pub fn record_voice_note(
        &mut self,
        title: Option<&str>,
        mime_type: &str,
        audio: &[u8],
        duration_secs: f64,
    ) -> ControllerResult<VoiceNote> {
        let audio_data = encode_data_url(mime_type, audio);
        self.edit_vault(|vault, at| {
            Ok(vault
                .add_voice_note(new_item_id(), title, audio_data, duration_secs, at.now_ms)
                .clone())
        })
    }

    pub fn delete_voice_note(&mut self, id: &str) -> ControllerResult<()> {
        self.edit_vault(|vault, _| vault.delete_voice_note(id).map(drop))
    }

    // Backup

    /// Snapshot of the stored documents for the current identity.
    pub fn backup_document(&self) -> ControllerResult<BackupDocument> {
        let identity = self.identity().ok_or(ControllerError::NotAuthenticated)?;
        Ok(BackupCodec::with_clock(self.kv, &self.clock).export(identity.as_str()))
    }

    /// Exports the stored documents to `sink`; returns the file name.
    pub fn export_backup(&self, sink: &dyn ExportSink) -> ControllerResult<String> {
        let identity = self.identity().ok_or(ControllerError::NotAuthenticated)?;
        let file_name = BackupCodec::with_clock(self.kv, &self.clock).export_to(
            identity.as_str(),
            self.clock.today(),
            sink,
        )?;
        Ok(file_name)
    }

    /// Replaces live vault and settings with a backup and persists both.
    pub fn import_backup(&mut self, raw: &str) -> ControllerResult<()> {
        let (vault, settings) = BackupCodec::with_clock(self.kv, &self.clock).import(raw)?;
        let SessionStatus::Authenticated(active) = &mut self.status else {
            return Err(ControllerError::NotAuthenticated);
        };

        active.vault = vault;
        self.settings = settings;
        let identity = active.session.identity().as_str();
        let vault_saved = VaultStore::with_clock(self.kv, &self.clock).save(identity, &active.vault);
        let settings_saved = SettingsStore::new(self.kv).save(identity, &self.settings);

        self.schedule_insight();
        vault_saved?;
        settings_saved?;
        Ok(())
    }

    // Assistant

    fn schedule_insight(&mut self) {
        let Some(active) = self.active() else {
            return;
        };
        let prompt = InsightPrompt {
            pending_tasks: active
                .vault
                .pending_task_texts()
                .into_iter()
                .map(str::to_string)
                .collect(),
            habits: active.vault.habit_summaries(),
        };

        self.last_insight_seq += 1;
        let ticket = InsightTicket {
            seq: self.last_insight_seq,
            prompt,
            issued_at_ms: self.clock.now_ms(),
        };
        self.awaited_insight = Some((ticket.seq, ticket.issued_at_ms));
        // A newer request supersedes one the host has not dispatched yet.
        self.undispatched_insight = Some(ticket);
    }

    /// Hands the pending insight request to the host for dispatch.
    pub fn take_insight_request(&mut self) -> Option<InsightTicket> {
        self.undispatched_insight.take()
    }

    /// Delivers the response to request `seq`.
    ///
    /// Returns `true` when the advisory text changed. Stale, late and failed
    /// responses leave it untouched.
    pub fn complete_insight(&mut self, seq: u64, response: AssistantResult<String>) -> bool {
        let Some((awaited_seq, issued_at_ms)) = self.awaited_insight else {
            debug!("event=insight_complete module=controller status=skipped reason=none_awaited seq={seq}");
            return false;
        };
        if seq != awaited_seq {
            debug!(
                "event=insight_complete module=controller status=skipped reason=stale seq={seq} awaited={awaited_seq}"
            );
            return false;
        }
        self.awaited_insight = None;

        let timeout_ms = i64::try_from(self.insight_timeout.as_millis()).unwrap_or(i64::MAX);
        let elapsed_ms = self.clock.now_ms().saturating_sub(issued_at_ms);
        if elapsed_ms > timeout_ms {
            warn!(
                "event=insight_complete module=controller status=skipped reason=timeout seq={seq} elapsed_ms={elapsed_ms}"
            );
            return false;
        }

        match response {
            Ok(text) => {
                self.insight = text;
                debug!("event=insight_complete module=controller status=ok seq={seq}");
                true
            }
            Err(err) => {
                warn!("event=insight_complete module=controller status=error seq={seq} error={err}");
                false
            }
        }
    }

    /// Runs the pending insight request synchronously through `gateway`.
    pub fn refresh_insight<P: AssistantProvider>(&mut self, gateway: &AssistantGateway<P>) -> bool {
        let Some(ticket) = self.take_insight_request() else {
            return false;
        };
        let response = gateway.try_insight(&ticket.prompt);
        self.complete_insight(ticket.seq, response)
    }

    /// Asks the assistant with the pending-task count as context.
    pub fn chat<P: AssistantProvider>(&self, gateway: &AssistantGateway<P>, query: &str) -> String {
        let pending = self
            .vault()
            .map_or(0, |vault| vault.pending_task_texts().len());
        gateway.chat(query, &format!("Pending tasks: {pending}"))
    }

    pub fn daily_quote<P: AssistantProvider>(&self, gateway: &AssistantGateway<P>) -> String {
        gateway.daily_quote()
    }
}
