//! Core domain logic for OmniVault.
//! This crate is the single source of truth for vault invariants.

pub mod backup;
pub mod clock;
pub mod config;
pub mod controller;
pub mod db;
pub mod kv;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use backup::{BackupCodec, BackupDocument, BackupError, DirectoryExportSink, ExportSink};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, CoreConfig, LogSettings};
pub use controller::{
    AppController, ControllerError, ControllerResult, InsightTicket, LoginOutcome, SessionStatus,
};
pub use kv::{KeyValueStore, KvError, MemoryKeyValueStore, SqliteKeyValueStore};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::session::{Identity, Session, SessionMode};
pub use model::settings::{FontSize, FontStyle, Language, Theme, UserSettings};
pub use model::vault::{
    Goal, GoalKind, Habit, Note, Task, VaultData, VaultEditError, VaultFile, VaultSummary,
    VoiceNote,
};
pub use service::assistant::{AssistantError, AssistantGateway, AssistantProvider};
pub use service::auth::{AuthError, AuthProvider, AuthUser};
pub use store::{RecordState, SessionCache, SettingsStore, StoreError, VaultStore};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
