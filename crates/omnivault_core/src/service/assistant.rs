//! Generative-text assistant contract and fallback policy.

use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const INSIGHT_FALLBACK: &str =
    "The Vault stands ready. Core encryption active. Your directives await.";
pub const CHAT_FALLBACK: &str = "Internal communication protocol failed. Retrying...";
pub const QUOTE_FALLBACK: &str = "Discipline equals freedom. - Jocko Willink";
pub const QUOTE_EMPTY_FALLBACK: &str = "Excellence is not an act, but a habit. - Aristotle";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantError {
    Transport(String),
    Unauthorized(String),
    EmptyResponse,
}

impl Display for AssistantError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "assistant transport failed: {message}"),
            Self::Unauthorized(message) => write!(f, "assistant rejected credentials: {message}"),
            Self::EmptyResponse => write!(f, "assistant returned no text"),
        }
    }
}

impl Error for AssistantError {}

pub type AssistantResult<T> = Result<T, AssistantError>;

/// Inputs of one insight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightPrompt {
    pub pending_tasks: Vec<String>,
    /// `"<name> (<streak> day streak)"` entries.
    pub habits: Vec<String>,
}

impl InsightPrompt {
    /// Briefing prompt text for providers that take free-form input.
    pub fn render(&self) -> String {
        format!(
            "Act as a high-level productivity intelligence officer for a secure \"OmniVault\" dashboard.\n\
             Current pending tasks: [{}]\n\
             Active habits: [{}]\n\n\
             Provide a concise, motivating, and strategic 1-sentence insight or briefing (25 words max).\n\
             Use a tone that is professional, slightly \"high-tech\", and supportive.",
            join_or_none(&self.pending_tasks),
            join_or_none(&self.habits)
        )
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

/// Web source cited by a chat reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSource {
    pub title: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatReply {
    pub text: String,
    pub sources: Vec<ChatSource>,
}

/// Remote generative-text API.
pub trait AssistantProvider {
    fn generate_insight(&self, prompt: &InsightPrompt) -> AssistantResult<String>;
    fn chat(&self, query: &str, context: &str) -> AssistantResult<ChatReply>;
    fn daily_quote(&self) -> AssistantResult<String>;
}

/// Wraps a provider with the fallback texts the dashboard shows on failure.
pub struct AssistantGateway<P: AssistantProvider> {
    provider: P,
}

impl<P: AssistantProvider> AssistantGateway<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Raw insight call; blank text counts as a failure.
    pub fn try_insight(&self, prompt: &InsightPrompt) -> AssistantResult<String> {
        let text = self.provider.generate_insight(prompt)?;
        if text.trim().is_empty() {
            return Err(AssistantError::EmptyResponse);
        }
        Ok(text)
    }

    pub fn insight(&self, prompt: &InsightPrompt) -> String {
        self.try_insight(prompt).unwrap_or_else(|err| {
            warn!("event=assistant_insight module=assistant status=fallback error={err}");
            INSIGHT_FALLBACK.to_string()
        })
    }

    /// Chat reply with cited sources appended as a markdown list.
    pub fn chat(&self, query: &str, context: &str) -> String {
        match self.provider.chat(query, context) {
            Ok(reply) => format_chat_reply(reply),
            Err(err) => {
                warn!("event=assistant_chat module=assistant status=fallback error={err}");
                CHAT_FALLBACK.to_string()
            }
        }
    }

    pub fn daily_quote(&self) -> String {
        match self.provider.daily_quote() {
            Ok(quote) if !quote.trim().is_empty() => quote,
            Ok(_) => QUOTE_EMPTY_FALLBACK.to_string(),
            Err(err) => {
                warn!("event=assistant_quote module=assistant status=fallback error={err}");
                QUOTE_FALLBACK.to_string()
            }
        }
    }
}

fn format_chat_reply(reply: ChatReply) -> String {
    let mut text = reply.text;
    if !reply.sources.is_empty() {
        text.push_str("\n\n**Intelligence Sources:**\n");
        for source in &reply.sources {
            text.push_str(&format!("- [{}]({})\n", source.title, source.uri));
        }
    }
    text
}
