//! Session orchestration over the vault stores.
//!
//! # Responsibility
//! - Own the live `VaultData` and `UserSettings` of the current session.
//! - Persist the whole document after every edit.
//! - Schedule advisory insight refreshes when the task or habit list grows
//!   or shrinks.
//!
//! # Invariants
//! - Live vault state exists only while `Authenticated`.
//! - A failed write never rolls back the in-memory edit.
//! - Insight responses apply only for the newest request and within the
//!   configured timeout.

use crate::backup::BackupError;
use crate::model::session::Session;
use crate::model::vault::{VaultData, VaultEditError};
use crate::service::assistant::InsightPrompt;
use crate::service::auth::AuthError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod app_controller;

pub use app_controller::AppController;

pub type ControllerResult<T> = Result<T, ControllerError>;

#[derive(Debug)]
pub enum ControllerError {
    /// Operation requires an authenticated session.
    NotAuthenticated,
    Edit(VaultEditError),
    Store(StoreError),
    Auth(AuthError),
    Backup(BackupError),
}

impl Display for ControllerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "no authenticated session"),
            Self::Edit(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Auth(err) => write!(f, "{err}"),
            Self::Backup(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ControllerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotAuthenticated => None,
            Self::Edit(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Auth(err) => Some(err),
            Self::Backup(err) => Some(err),
        }
    }
}

impl From<VaultEditError> for ControllerError {
    fn from(value: VaultEditError) -> Self {
        Self::Edit(value)
    }
}

impl From<StoreError> for ControllerError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<AuthError> for ControllerError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<BackupError> for ControllerError {
    fn from(value: BackupError) -> Self {
        Self::Backup(value)
    }
}

/// Live state of an authenticated session.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSession {
    pub session: Session,
    pub vault: VaultData,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatus {
    Loading,
    Unauthenticated,
    Authenticated(ActiveSession),
}

/// How a login completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Remote provider verified the account.
    Verified,
    /// Provider unreachable; running on a locally derived identity.
    Degraded,
}

/// One pending insight request, tagged for staleness checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightTicket {
    pub seq: u64,
    pub prompt: InsightPrompt,
    pub issued_at_ms: i64,
}
