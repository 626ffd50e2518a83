//! Session state - current country selection and the conversation log.
//!
//! One session per user. The presentation layer serializes interactions,
//! so no locking is needed here.

use serde::{Deserialize, Serialize};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message in the conversation. Never mutated after append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Session-scoped selection state plus the append-only conversation log.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    country: Option<String>,
    turns: Vec<Turn>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected country key, if any.
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// Select a country. A changed selection invalidates all prior
    /// conversational context (the prompt preamble must carry only the new
    /// country's facts), so the log is cleared. Reselecting the current
    /// country leaves the log alone.
    pub fn select_country(&mut self, key: &str) {
        if self.country.as_deref() == Some(key) {
            return;
        }
        if !self.turns.is_empty() {
            tracing::debug!(turns = self.turns.len(), country = key, "country changed, clearing conversation");
        }
        self.turns.clear();
        self.country = Some(key.to_string());
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::assistant(content));
    }

    /// All turns in chronological (= display) order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty() {
        let session = ChatSession::new();
        assert!(session.country().is_none());
        assert!(session.turns().is_empty());
    }

    #[test]
    fn test_country_change_clears_turns() {
        let mut session = ChatSession::new();
        session.select_country("China");
        session.push_user("hi");
        session.push_assistant("hello");
        assert_eq!(session.turns().len(), 2);

        session.select_country("Mexico");
        assert_eq!(session.country(), Some("Mexico"));
        assert!(session.turns().is_empty());
    }

    #[test]
    fn test_reselecting_same_country_keeps_turns() {
        let mut session = ChatSession::new();
        session.select_country("China");
        session.push_user("hi");
        session.push_assistant("hello");

        session.select_country("China");
        assert_eq!(session.turns().len(), 2);
    }

    #[test]
    fn test_turns_preserve_order() {
        let mut session = ChatSession::new();
        session.select_country("Japan");
        session.push_user("first");
        session.push_assistant("second");
        session.push_user("third");

        let turns = session.turns();
        assert_eq!(turns[0], Turn::user("first"));
        assert_eq!(turns[1], Turn::assistant("second"));
        assert_eq!(turns[2], Turn::user("third"));
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }
}
