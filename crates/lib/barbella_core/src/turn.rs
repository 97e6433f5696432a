//! Conversation turns.
//!
//! A [`Turn`] is one message in the chat, tagged with who said it. The JSON
//! shape (`{"role": "user", "content": "..."}`) is the wire format of the
//! `/api/chat` endpoint.

use serde::{Deserialize, Serialize};

/// Author of a turn. The set is closed: unknown role strings fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message exchanged in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
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

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_serializes_with_lowercase_role() {
        let json = serde_json::to_string(&Turn::assistant("hi")).expect("serialize");
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }

    #[test]
    fn turn_list_parses_from_wire_format() {
        let turns: Vec<Turn> = serde_json::from_str(
            r#"[{"role":"assistant","content":"Hello"},{"role":"user","content":"Squats?"}]"#,
        )
        .expect("parse");
        assert_eq!(turns, vec![Turn::assistant("Hello"), Turn::user("Squats?")]);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let result = serde_json::from_str::<Turn>(r#"{"role":"system","content":"x"}"#);
        assert!(result.is_err());
    }
}
