use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConversationError {
    #[error("expected a {expected:?} message next, got {got:?}")]
    OutOfOrder { expected: Role, got: Role },
}

/// A single chat message. Fields are private so a message cannot change
/// after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    role: Role,
    text: String,
    created_at: DateTime<Utc>,
}

impl Message {
    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    #[cfg(test)]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Append-only transcript alternating user, assistant, user, …
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    fn expected_role(&self) -> Role {
        match self.messages.last().map(Message::role) {
            Some(Role::User) => Role::Assistant,
            _ => Role::User,
        }
    }

    pub fn push(&mut self, role: Role, text: impl Into<String>) -> Result<&Message, ConversationError> {
        let expected = self.expected_role();
        if role != expected {
            return Err(ConversationError::OutOfOrder { expected, got: role });
        }
        self.messages.push(Message {
            role,
            text: text.into(),
            created_at: Utc::now(),
        });
        Ok(&self.messages[self.messages.len() - 1])
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> Result<&Message, ConversationError> {
        self.push(Role::User, text)
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) -> Result<&Message, ConversationError> {
        self.push(Role::Assistant, text)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last_user_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.text.as_str())
    }

    /// Ends the session's history.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alternating_pushes() {
        let mut c = Conversation::new();
        c.push_user("q1").unwrap();
        c.push_assistant("a1").unwrap();
        c.push_user("q2").unwrap();

        let roles: Vec<Role> = c.messages().iter().map(Message::role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
        assert_eq!(c.last_user_text(), Some("q2"));
    }

    #[test]
    fn test_must_start_with_user() {
        let mut c = Conversation::new();
        assert_eq!(
            c.push_assistant("hello").unwrap_err(),
            ConversationError::OutOfOrder {
                expected: Role::User,
                got: Role::Assistant
            }
        );
        assert!(c.is_empty());
    }

    #[test]
    fn test_rejects_two_user_messages_in_a_row() {
        let mut c = Conversation::new();
        c.push_user("q1").unwrap();
        assert!(c.push_user("q2").is_err());
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_timestamps_are_monotonic() {
        let mut c = Conversation::new();
        c.push_user("q").unwrap();
        c.push_assistant("a").unwrap();
        assert!(c.messages()[0].created_at() <= c.messages()[1].created_at());
    }

    #[test]
    fn test_clear_resets() {
        let mut c = Conversation::new();
        c.push_user("q").unwrap();
        c.clear();
        assert!(c.is_empty());
        assert!(c.last_user_text().is_none());
        c.push_user("again").unwrap();
    }

    #[test]
    fn test_message_serializes_role_snake_case() {
        let mut c = Conversation::new();
        let message = c.push_user("hi").unwrap().clone();
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["role"], "user");
        assert_eq!(value["text"], "hi");
        assert!(value["created_at"].is_string());
    }
}
