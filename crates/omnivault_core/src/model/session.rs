//! Identity and session records.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Opaque account key scoping every persisted record.
///
/// Never empty; stored records with an empty id fail to decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Returns `None` for the empty string; no other validation is applied.
    pub fn parse(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        (!value.is_empty()).then_some(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identity {
    type Error = &'static str;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value).ok_or("identity must not be empty")
    }
}

impl From<Identity> for String {
    fn from(value: Identity) -> Self {
        value.0
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a session was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Verified by the remote auth provider.
    Remote,
    /// Degraded mode keyed by a locally derived identity.
    Offline,
}

/// Minimal session record; also the payload of the session cache slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Session {
    Remote {
        id: Identity,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
    },
    Offline {
        id: Identity,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
    },
}

impl Session {
    pub fn identity(&self) -> &Identity {
        match self {
            Self::Remote { id, .. } | Self::Offline { id, .. } => id,
        }
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Remote { email, .. } | Self::Offline { email, .. } => email.as_deref(),
        }
    }

    pub fn mode(&self) -> SessionMode {
        match self {
            Self::Remote { .. } => SessionMode::Remote,
            Self::Offline { .. } => SessionMode::Offline,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.mode() == SessionMode::Offline
    }
}
