//! Vault domain model.
//!
//! # Responsibility
//! - Define the persisted document shapes (`VaultData`, `UserSettings`).
//! - Define identity and session records shared by stores and controller.
//!
//! # Invariants
//! - Field names serialize exactly as the stored JSON documents expect.
//! - Older documents missing newer fields still deserialize.

pub mod payload;
pub mod preview;
pub mod session;
pub mod settings;
pub mod vault;
