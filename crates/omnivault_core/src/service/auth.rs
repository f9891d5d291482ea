//! Remote authentication contract and offline fallback policy.

use crate::model::session::{Identity, Session};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AuthResult<T> = Result<T, AuthError>;

/// Account record returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Provider unreachable or misconfigured (network, missing API key).
    Unreachable(String),
    /// Provider answered and refused the credentials.
    Rejected(String),
    /// Provider returned a user without an id.
    InvalidUser,
    /// Offline fallback impossible without an email.
    MissingEmail,
}

impl AuthError {
    /// Whether the offline/demo fallback applies.
    pub fn allows_offline_fallback(&self) -> bool {
        matches!(self, Self::Unreachable(_))
    }
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unreachable(message) => write!(f, "auth provider unreachable: {message}"),
            Self::Rejected(message) => write!(f, "authentication failed: {message}"),
            Self::InvalidUser => write!(f, "auth provider returned a user without id"),
            Self::MissingEmail => write!(f, "email is required"),
        }
    }
}

impl Error for AuthError {}

/// Remote identity provider.
pub trait AuthProvider {
    fn sign_up(&self, email: &str, password: &str) -> AuthResult<AuthUser>;
    fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthUser>;
    fn sign_out(&self) -> AuthResult<()>;
    /// Provider-side session, if one is still live.
    fn current_user(&self) -> AuthResult<Option<AuthUser>>;
}

impl AuthUser {
    /// Converts a verified provider user into a remote session.
    pub fn into_session(self) -> AuthResult<Session> {
        let id = Identity::parse(self.id).ok_or(AuthError::InvalidUser)?;
        Ok(Session::Remote {
            id,
            email: self.email,
        })
    }
}

/// Deterministic offline identity: the base64 of the email.
pub fn derive_offline_identity(email: &str) -> AuthResult<Identity> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AuthError::MissingEmail);
    }
    Identity::parse(STANDARD.encode(email.as_bytes())).ok_or(AuthError::MissingEmail)
}

/// Degraded session for `email` when the provider cannot be reached.
pub fn offline_session(email: &str) -> AuthResult<Session> {
    Ok(Session::Offline {
        id: derive_offline_identity(email)?,
        email: Some(email.trim().to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_identity_is_deterministic_base64() {
        let first = derive_offline_identity("agent@omnivault.com").unwrap();
        let second = derive_offline_identity(" agent@omnivault.com ").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_str(), "YWdlbnRAb21uaXZhdWx0LmNvbQ==");
    }

    #[test]
    fn blank_email_cannot_go_offline() {
        assert_eq!(derive_offline_identity("  "), Err(AuthError::MissingEmail));
    }

    #[test]
    fn user_without_id_is_rejected() {
        let user = AuthUser {
            id: String::new(),
            email: None,
        };
        assert_eq!(user.into_session(), Err(AuthError::InvalidUser));
    }

    #[test]
    fn only_unreachable_allows_fallback() {
        assert!(AuthError::Unreachable("fetch failed".into()).allows_offline_fallback());
        assert!(!AuthError::Rejected("bad password".into()).allows_offline_fallback());
    }
}
