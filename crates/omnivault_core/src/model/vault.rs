//! Vault domain model and in-place edits.
//!
//! # Responsibility
//! - Define the persisted shape of one identity's domain data.
//! - Provide the edits the dashboard widgets perform on that data.
//!
//! # Invariants
//! - Every edit validates before mutating; a failed edit leaves the vault
//!   untouched.
//! - `Habit::streak` equals the number of completed days after any toggle.
//! - `points` never goes below zero.
//! - Note attachments are weak references; deleting a file never prunes them.

use crate::model::payload::{decode_data_url, encode_data_url, PayloadError};
use crate::model::preview::derive_plain_preview;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const WELCOME_NOTE_ID: &str = "1";
pub const WELCOME_NOTE_TITLE: &str = "مرحباً بك في الخزنة";
pub const WELCOME_NOTE_BODY: &str =
    "<div>هذه مساحتك الخاصة والآمنة. ابدأ بإضافة مهامك أو ملاحظاتك السرية.</div>";
pub const NEW_NOTE_BODY: &str = "<div>...</div>";

pub const DAILY_GOAL_POINTS: u64 = 10;
pub const WEEKLY_GOAL_POINTS: u64 = 50;

const DAY_FORMAT: &str = "%Y-%m-%d";

pub type EditResult<T> = Result<T, VaultEditError>;

/// Which collection an edit addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Task,
    Note,
    Habit,
    Goal,
    File,
    VoiceNote,
}

impl Display for ItemKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Task => "task",
            Self::Note => "note",
            Self::Habit => "habit",
            Self::Goal => "goal",
            Self::File => "file",
            Self::VoiceNote => "voice note",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultEditError {
    /// Required text field was blank.
    EmptyText(&'static str),
    NotFound { kind: ItemKind, id: String },
}

impl Display for VaultEditError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText(field) => write!(f, "{field} cannot be empty"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
        }
    }
}

impl Error for VaultEditError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    /// Rich-text markup, stored opaquely.
    #[serde(default)]
    pub content: String,
    pub updated_at: i64,
    /// `VaultFile` ids. May dangle after a file is deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_locked: Option<bool>,
}

impl Note {
    pub fn is_locked(&self) -> bool {
        self.is_locked.unwrap_or(false)
    }

    pub fn attachment_ids(&self) -> &[String] {
        self.attachments.as_deref().unwrap_or_default()
    }

    pub fn preview(&self) -> Option<String> {
        derive_plain_preview(&self.content)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    /// ISO calendar dates, one entry per day.
    #[serde(default)]
    pub completed_days: Vec<String>,
    #[serde(default)]
    pub streak: u32,
}

impl Habit {
    pub fn is_done_on(&self, day: NaiveDate) -> bool {
        let stamp = day.format(DAY_FORMAT).to_string();
        self.completed_days.iter().any(|d| *d == stamp)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalKind {
    Daily,
    Weekly,
}

impl GoalKind {
    /// Points granted on completion and revoked on un-completion.
    pub fn reward(self) -> u64 {
        match self {
            Self::Daily => DAILY_GOAL_POINTS,
            Self::Weekly => WEEKLY_GOAL_POINTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub text: String,
    /// Serialized as `type` to match the stored document.
    #[serde(rename = "type")]
    pub kind: GoalKind,
    #[serde(default)]
    pub completed: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultFile {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: u64,
    /// Base64 data URL.
    pub data: String,
    pub created_at: i64,
}

impl VaultFile {
    /// Builds a file record with its payload inlined as a data URL.
    pub fn from_bytes(
        id: impl Into<String>,
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: &[u8],
        now_ms: i64,
    ) -> Self {
        let mime_type = mime_type.into();
        Self {
            id: id.into(),
            name: name.into(),
            data: encode_data_url(&mime_type, bytes),
            mime_type,
            size: bytes.len() as u64,
            created_at: now_ms,
        }
    }

    pub fn decode_payload(&self) -> Result<Vec<u8>, PayloadError> {
        decode_data_url(&self.data)
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    pub fn is_video(&self) -> bool {
        self.mime_type.starts_with("video/")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceNote {
    pub id: String,
    pub title: String,
    /// Base64 data URL of the recording.
    pub audio_data: String,
    /// Seconds; zero when the recorder did not report a usable length.
    #[serde(default, deserialize_with = "duration_or_zero")]
    pub duration: f64,
    pub created_at: i64,
}

/// Recorder lengths that are non-finite or negative become zero.
fn sanitize_duration(duration: f64) -> f64 {
    if duration.is_finite() && duration > 0.0 {
        duration
    } else {
        0.0
    }
}

/// JSON cannot carry NaN or infinity; they are written as `null`.
fn duration_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let duration = Option::<f64>::deserialize(deserializer)?;
    Ok(duration.map_or(0.0, sanitize_duration))
}

impl VoiceNote {
    pub fn decode_audio(&self) -> Result<Vec<u8>, PayloadError> {
        decode_data_url(&self.audio_data)
    }
}

/// Full domain payload for one identity.
///
/// Missing collections in an older stored record load as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VaultData {
    pub tasks: Vec<Task>,
    pub notes: Vec<Note>,
    pub habits: Vec<Habit>,
    pub files: Vec<VaultFile>,
    pub goals: Vec<Goal>,
    pub voice_notes: Vec<VoiceNote>,
    pub points: u64,
}

/// Read-only counters shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultSummary {
    pub points: u64,
    pub task_count: usize,
    pub pending_task_count: usize,
    /// Completed share of all tasks, rounded to a whole percent.
    pub task_completion_percent: u8,
    pub note_count: usize,
    pub habit_count: usize,
    pub max_habit_streak: u32,
    pub goal_count: usize,
    pub completed_goal_count: usize,
    pub file_count: usize,
    pub voice_note_count: usize,
    pub latest_note_preview: Option<String>,
}

impl VaultData {
    /// First-run vault: empty collections plus one welcome note.
    pub fn seeded(now_ms: i64) -> Self {
        Self {
            notes: vec![Note {
                id: WELCOME_NOTE_ID.to_string(),
                title: WELCOME_NOTE_TITLE.to_string(),
                content: WELCOME_NOTE_BODY.to_string(),
                updated_at: now_ms,
                attachments: Some(Vec::new()),
                is_locked: None,
            }],
            ..Self::default()
        }
    }

    // Tasks

    /// Prepends a new open task.
    pub fn add_task(&mut self, id: impl Into<String>, text: &str, now_ms: i64) -> EditResult<&Task> {
        require_text("task text", text)?;
        self.tasks.insert(
            0,
            Task {
                id: id.into(),
                text: text.to_string(),
                completed: false,
                created_at: now_ms,
            },
        );
        Ok(&self.tasks[0])
    }

    /// Flips completion and returns the new state.
    pub fn toggle_task(&mut self, id: &str) -> EditResult<bool> {
        let task = find_mut(&mut self.tasks, ItemKind::Task, id, |t| &t.id)?;
        task.completed = !task.completed;
        Ok(task.completed)
    }

    pub fn delete_task(&mut self, id: &str) -> EditResult<Task> {
        remove_by_id(&mut self.tasks, ItemKind::Task, id, |t| &t.id)
    }

    pub fn pending_task_texts(&self) -> Vec<&str> {
        self.tasks
            .iter()
            .filter(|t| !t.completed)
            .map(|t| t.text.as_str())
            .collect()
    }

    // Notes

    /// Prepends a note with a placeholder body.
    pub fn create_note(
        &mut self,
        id: impl Into<String>,
        title: &str,
        now_ms: i64,
    ) -> EditResult<&Note> {
        require_text("note title", title)?;
        self.notes.insert(
            0,
            Note {
                id: id.into(),
                title: title.to_string(),
                content: NEW_NOTE_BODY.to_string(),
                updated_at: now_ms,
                attachments: Some(Vec::new()),
                is_locked: None,
            },
        );
        Ok(&self.notes[0])
    }

    /// Replaces the body and bumps `updated_at`.
    pub fn update_note_content(
        &mut self,
        id: &str,
        content: impl Into<String>,
        now_ms: i64,
    ) -> EditResult<()> {
        let note = find_mut(&mut self.notes, ItemKind::Note, id, |n| &n.id)?;
        note.content = content.into();
        note.updated_at = now_ms;
        Ok(())
    }

    pub fn rename_note(&mut self, id: &str, title: &str, now_ms: i64) -> EditResult<()> {
        require_text("note title", title)?;
        let note = find_mut(&mut self.notes, ItemKind::Note, id, |n| &n.id)?;
        note.title = title.to_string();
        note.updated_at = now_ms;
        Ok(())
    }

    pub fn set_note_locked(&mut self, id: &str, locked: bool) -> EditResult<()> {
        let note = find_mut(&mut self.notes, ItemKind::Note, id, |n| &n.id)?;
        note.is_locked = Some(locked);
        Ok(())
    }

    /// Links an existing file to a note.
    ///
    /// Returns `false` when the reference was already present.
    pub fn attach_file(&mut self, note_id: &str, file_id: &str) -> EditResult<bool> {
        if !self.files.iter().any(|f| f.id == file_id) {
            return Err(not_found(ItemKind::File, file_id));
        }
        let note = find_mut(&mut self.notes, ItemKind::Note, note_id, |n| &n.id)?;
        let attachments = note.attachments.get_or_insert_with(Vec::new);
        if attachments.iter().any(|id| id == file_id) {
            return Ok(false);
        }
        attachments.push(file_id.to_string());
        Ok(true)
    }

    pub fn delete_note(&mut self, id: &str) -> EditResult<Note> {
        remove_by_id(&mut self.notes, ItemKind::Note, id, |n| &n.id)
    }

    /// Resolves a note's attachments, skipping references to deleted files.
    pub fn resolve_attachments(&self, note: &Note) -> Vec<&VaultFile> {
        note.attachment_ids()
            .iter()
            .filter_map(|id| self.files.iter().find(|f| f.id == *id))
            .collect()
    }

    // Habits

    /// Appends a habit with no completed days.
    pub fn add_habit(&mut self, id: impl Into<String>, name: &str) -> EditResult<&Habit> {
        require_text("habit name", name)?;
        self.habits.push(Habit {
            id: id.into(),
            name: name.to_string(),
            completed_days: Vec::new(),
            streak: 0,
        });
        Ok(&self.habits[self.habits.len() - 1])
    }

    /// Adds or removes `day` and recomputes the streak as the day count.
    ///
    /// Returns whether the habit is done on `day` afterwards.
    pub fn toggle_habit_day(&mut self, id: &str, day: NaiveDate) -> EditResult<bool> {
        let habit = find_mut(&mut self.habits, ItemKind::Habit, id, |h| &h.id)?;
        let stamp = day.format(DAY_FORMAT).to_string();
        let was_done = habit.completed_days.iter().any(|d| *d == stamp);
        if was_done {
            habit.completed_days.retain(|d| *d != stamp);
        } else {
            habit.completed_days.push(stamp);
        }
        // Count of days, not consecutive days; see DESIGN.md.
        habit.streak = u32::try_from(habit.completed_days.len()).unwrap_or(u32::MAX);
        Ok(!was_done)
    }

    pub fn delete_habit(&mut self, id: &str) -> EditResult<Habit> {
        remove_by_id(&mut self.habits, ItemKind::Habit, id, |h| &h.id)
    }

    /// `"<name> (<streak> day streak)"` per habit, for insight prompts.
    pub fn habit_summaries(&self) -> Vec<String> {
        self.habits
            .iter()
            .map(|h| format!("{} ({} day streak)", h.name, h.streak))
            .collect()
    }

    // Goals

    pub fn add_goal(
        &mut self,
        id: impl Into<String>,
        text: &str,
        kind: GoalKind,
        now_ms: i64,
    ) -> EditResult<&Goal> {
        require_text("goal text", text)?;
        self.goals.insert(
            0,
            Goal {
                id: id.into(),
                text: text.to_string(),
                kind,
                completed: false,
                created_at: now_ms,
            },
        );
        Ok(&self.goals[0])
    }

    /// Flips completion and grants or revokes the goal's reward.
    ///
    /// Points saturate at zero when a revoke would go negative.
    pub fn toggle_goal(&mut self, id: &str) -> EditResult<bool> {
        let goal = find_mut(&mut self.goals, ItemKind::Goal, id, |g| &g.id)?;
        goal.completed = !goal.completed;
        let (completed, reward) = (goal.completed, goal.kind.reward());
        self.points = if completed {
            self.points.saturating_add(reward)
        } else {
            self.points.saturating_sub(reward)
        };
        Ok(completed)
    }

    /// Removes a goal without touching points.
    pub fn delete_goal(&mut self, id: &str) -> EditResult<Goal> {
        remove_by_id(&mut self.goals, ItemKind::Goal, id, |g| &g.id)
    }

    // Files

    pub fn add_file(&mut self, file: VaultFile) -> &VaultFile {
        self.files.insert(0, file);
        &self.files[0]
    }

    /// Removes a file. Notes that reference it keep the dangling id.
    pub fn delete_file(&mut self, id: &str) -> EditResult<VaultFile> {
        remove_by_id(&mut self.files, ItemKind::File, id, |f| &f.id)
    }

    // Voice notes

    /// Prepends a recording; a blank title becomes `Log #<n>`.
    pub fn add_voice_note(
        &mut self,
        id: impl Into<String>,
        title: Option<&str>,
        audio_data: impl Into<String>,
        duration: f64,
        now_ms: i64,
    ) -> &VoiceNote {
        let title = match title.map(str::trim).filter(|t| !t.is_empty()) {
            Some(title) => title.to_string(),
            None => format!("Log #{}", self.voice_notes.len() + 1),
        };
        self.voice_notes.insert(
            0,
            VoiceNote {
                id: id.into(),
                title,
                audio_data: audio_data.into(),
                duration: sanitize_duration(duration),
                created_at: now_ms,
            },
        );
        &self.voice_notes[0]
    }

    pub fn delete_voice_note(&mut self, id: &str) -> EditResult<VoiceNote> {
        remove_by_id(&mut self.voice_notes, ItemKind::VoiceNote, id, |v| &v.id)
    }

    fn task_completion_percent(&self) -> u8 {
        if self.tasks.is_empty() {
            return 0;
        }
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        let percent = (completed as f64 / self.tasks.len() as f64 * 100.0).round();
        percent as u8
    }

    pub fn summary(&self) -> VaultSummary {
        VaultSummary {
            points: self.points,
            task_count: self.tasks.len(),
            pending_task_count: self.tasks.iter().filter(|t| !t.completed).count(),
            task_completion_percent: self.task_completion_percent(),
            note_count: self.notes.len(),
            habit_count: self.habits.len(),
            max_habit_streak: self.habits.iter().map(|h| h.streak).max().unwrap_or(0),
            goal_count: self.goals.len(),
            completed_goal_count: self.goals.iter().filter(|g| g.completed).count(),
            file_count: self.files.len(),
            voice_note_count: self.voice_notes.len(),
            latest_note_preview: self
                .notes
                .iter()
                .max_by_key(|n| n.updated_at)
                .and_then(Note::preview),
        }
    }
}

fn require_text(field: &'static str, value: &str) -> EditResult<()> {
    if value.trim().is_empty() {
        return Err(VaultEditError::EmptyText(field));
    }
    Ok(())
}

fn not_found(kind: ItemKind, id: &str) -> VaultEditError {
    VaultEditError::NotFound {
        kind,
        id: id.to_string(),
    }
}

fn find_mut<'a, T>(
    items: &'a mut [T],
    kind: ItemKind,
    id: &str,
    id_of: impl Fn(&T) -> &String,
) -> EditResult<&'a mut T> {
    items
        .iter_mut()
        .find(|item| id_of(item) == id)
        .ok_or_else(|| not_found(kind, id))
}

fn remove_by_id<T>(
    items: &mut Vec<T>,
    kind: ItemKind,
    id: &str,
    id_of: impl Fn(&T) -> &String,
) -> EditResult<T> {
    let index = items
        .iter()
        .position(|item| id_of(item) == id)
        .ok_or_else(|| not_found(kind, id))?;
    Ok(items.remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn seeded_vault_has_only_the_welcome_note() {
        let vault = VaultData::seeded(42);
        assert_eq!(vault.notes.len(), 1);
        assert_eq!(vault.notes[0].id, WELCOME_NOTE_ID);
        assert_eq!(vault.notes[0].updated_at, 42);
        assert!(vault.tasks.is_empty() && vault.habits.is_empty() && vault.goals.is_empty());
        assert!(vault.files.is_empty() && vault.voice_notes.is_empty());
        assert_eq!(vault.points, 0);
    }

    #[test]
    fn blank_task_is_rejected_without_mutation() {
        let mut vault = VaultData::default();
        let err = vault.add_task("t1", "   ", 1).unwrap_err();
        assert_eq!(err, VaultEditError::EmptyText("task text"));
        assert!(vault.tasks.is_empty());
    }

    #[test]
    fn tasks_are_prepended_and_toggled() {
        let mut vault = VaultData::default();
        vault.add_task("a", "first", 1).unwrap();
        vault.add_task("b", "second", 2).unwrap();
        assert_eq!(vault.tasks[0].id, "b");

        assert!(vault.toggle_task("a").unwrap());
        assert_eq!(vault.pending_task_texts(), vec!["second"]);

        let err = vault.toggle_task("zzz").unwrap_err();
        assert!(matches!(err, VaultEditError::NotFound { kind: ItemKind::Task, .. }));
    }

    #[test]
    fn goal_toggle_awards_and_revokes_points() {
        let mut vault = VaultData::default();
        vault.add_goal("d", "stretch", GoalKind::Daily, 1).unwrap();
        vault.add_goal("w", "ship", GoalKind::Weekly, 1).unwrap();

        vault.toggle_goal("d").unwrap();
        assert_eq!(vault.points, 10);
        vault.toggle_goal("w").unwrap();
        assert_eq!(vault.points, 60);
        vault.toggle_goal("d").unwrap();
        assert_eq!(vault.points, 50);
    }

    #[test]
    fn goal_revoke_clamps_at_zero() {
        let mut vault = VaultData::default();
        vault.add_goal("w", "ship", GoalKind::Weekly, 1).unwrap();
        vault.toggle_goal("w").unwrap();
        vault.points = 20;

        assert!(!vault.toggle_goal("w").unwrap());
        assert_eq!(vault.points, 0);
    }

    #[test]
    fn deleting_goal_keeps_points() {
        let mut vault = VaultData::default();
        vault.add_goal("d", "stretch", GoalKind::Daily, 1).unwrap();
        vault.toggle_goal("d").unwrap();
        vault.delete_goal("d").unwrap();
        assert_eq!(vault.points, 10);
    }

    #[test]
    fn habit_toggle_twice_restores_state() {
        let mut vault = VaultData::default();
        vault.add_habit("h", "read").unwrap();
        vault.toggle_habit_day("h", day(2026, 1, 1)).unwrap();
        let before = vault.habits[0].clone();

        assert!(vault.toggle_habit_day("h", day(2026, 1, 5)).unwrap());
        assert_eq!(vault.habits[0].streak, 2);
        assert!(vault.habits[0].is_done_on(day(2026, 1, 5)));

        assert!(!vault.toggle_habit_day("h", day(2026, 1, 5)).unwrap());
        assert_eq!(vault.habits[0], before);
    }

    #[test]
    fn streak_counts_days_not_consecutive_runs() {
        let mut vault = VaultData::default();
        vault.add_habit("h", "run").unwrap();
        vault.toggle_habit_day("h", day(2026, 3, 1)).unwrap();
        vault.toggle_habit_day("h", day(2026, 3, 9)).unwrap();
        assert_eq!(vault.habits[0].streak, 2);
        assert_eq!(vault.habit_summaries(), vec!["run (2 day streak)"]);
    }

    #[test]
    fn deleting_file_leaves_dangling_attachment() {
        let mut vault = VaultData::seeded(1);
        vault.add_file(VaultFile::from_bytes("f1", "map.png", "image/png", b"png", 2));
        assert!(vault.attach_file(WELCOME_NOTE_ID, "f1").unwrap());
        assert!(!vault.attach_file(WELCOME_NOTE_ID, "f1").unwrap());

        vault.delete_file("f1").unwrap();
        assert!(vault.files.is_empty());
        assert_eq!(vault.notes[0].attachment_ids(), ["f1".to_string()]);
        assert!(vault.resolve_attachments(&vault.notes[0]).is_empty());
    }

    #[test]
    fn attaching_unknown_file_fails() {
        let mut vault = VaultData::seeded(1);
        let err = vault.attach_file(WELCOME_NOTE_ID, "ghost").unwrap_err();
        assert!(matches!(err, VaultEditError::NotFound { kind: ItemKind::File, .. }));
        assert_eq!(vault.notes[0].attachment_ids().len(), 0);
    }

    #[test]
    fn voice_note_gets_numbered_default_title() {
        let mut vault = VaultData::default();
        vault.add_voice_note("v1", None, "data:audio/webm;base64,", 0.0, 1);
        vault.add_voice_note("v2", Some("  "), "data:audio/webm;base64,", 0.0, 2);
        vault.add_voice_note("v3", Some("Briefing"), "data:audio/webm;base64,", 3.5, 3);
        let titles: Vec<_> = vault.voice_notes.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(titles, vec!["Briefing", "Log #2", "Log #1"]);
    }

    #[test]
    fn unusable_voice_durations_are_stored_as_zero() {
        let mut vault = VaultData::default();
        for (id, duration) in [("nan", f64::NAN), ("inf", f64::INFINITY), ("neg", -2.0)] {
            let note = vault.add_voice_note(id, None, "data:audio/webm;base64,", duration, 1);
            assert_eq!(note.duration, 0.0);
        }
        assert_eq!(vault.add_voice_note("ok", None, "", 1.25, 1).duration, 1.25);
    }

    #[test]
    fn null_voice_duration_loads_as_zero() {
        let vault: VaultData = serde_json::from_str(
            r#"{"voiceNotes":[{"id":"v","title":"Log #1","audioData":"","duration":null,"createdAt":1}],
                "tasks":[{"id":"t","text":"keep","createdAt":1}]}"#,
        )
        .unwrap();
        assert_eq!(vault.voice_notes[0].duration, 0.0);
        assert_eq!(vault.tasks[0].text, "keep");
    }

    #[test]
    fn persisted_shape_uses_document_field_names() {
        let mut vault = VaultData::default();
        vault.add_goal("g", "focus", GoalKind::Weekly, 7).unwrap();
        vault.add_file(VaultFile::from_bytes("f", "a.txt", "text/plain", b"a", 8));
        let json = serde_json::to_value(&vault).unwrap();

        assert_eq!(json["goals"][0]["type"], "weekly");
        assert_eq!(json["goals"][0]["createdAt"], 7);
        assert_eq!(json["files"][0]["type"], "text/plain");
        assert!(json.get("voiceNotes").is_some());
    }

    #[test]
    fn partial_document_fills_missing_collections() {
        let vault: VaultData =
            serde_json::from_str(r#"{"tasks":[{"id":"1","text":"x","completed":true,"createdAt":5}]}"#)
                .unwrap();
        assert_eq!(vault.tasks.len(), 1);
        assert!(vault.notes.is_empty() && vault.voice_notes.is_empty());
        assert_eq!(vault.points, 0);
    }

    #[test]
    fn summary_reports_counts_and_latest_preview() {
        let mut vault = VaultData::seeded(1);
        vault.create_note("n2", "Intel", 5).unwrap();
        vault.update_note_content("n2", "<p>Meet at <b>dawn</b></p>", 9).unwrap();
        vault.add_task("t", "pack", 2).unwrap();

        let summary = vault.summary();
        assert_eq!(summary.note_count, 2);
        assert_eq!(summary.pending_task_count, 1);
        assert_eq!(summary.latest_note_preview.as_deref(), Some("Meet at dawn"));
    }

    #[test]
    fn summary_reports_completion_rate_and_best_streak() {
        let mut vault = VaultData::default();
        assert_eq!(vault.summary().task_completion_percent, 0);
        assert_eq!(vault.summary().max_habit_streak, 0);

        for id in ["a", "b", "c"] {
            vault.add_task(id, "sweep", 1).unwrap();
        }
        vault.toggle_task("a").unwrap();
        vault.add_habit("h1", "Run").unwrap();
        vault.add_habit("h2", "Read").unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        vault.toggle_habit_day("h2", day).unwrap();
        vault.toggle_habit_day("h2", day.succ_opt().unwrap()).unwrap();

        let summary = vault.summary();
        assert_eq!(summary.task_completion_percent, 33);
        assert_eq!(summary.max_habit_streak, 2);
    }
}
