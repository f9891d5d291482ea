//! External collaborator contracts.
//!
//! # Responsibility
//! - Define the seams to the remote auth provider and generative-text API.
//! - Apply the local recovery policies for their failures.
//!
//! # Invariants
//! - Credentials pass through untouched; only the resulting identity is kept.
//! - Assistant failures surface as static fallback text, never as errors.

pub mod assistant;
pub mod auth;
