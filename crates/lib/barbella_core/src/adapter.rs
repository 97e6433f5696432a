//! Shapes a conversation for the model provider.
//!
//! The provider takes a chat session seeded with prior turns plus one new
//! message. The prompt template always opens the history so its
//! instructions take priority over every user turn that follows.

use serde::Serialize;
use thiserror::Error;

use crate::prompt::PromptTemplate;
use crate::turn::{Role, Turn};

/// Role names understood by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderRole {
    User,
    Model,
}

impl From<Role> for ProviderRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => ProviderRole::User,
            _ => ProviderRole::Model,
        }
    }
}

/// One history entry in provider shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderTurn {
    pub role: ProviderRole,
    pub text: String,
}

impl From<&Turn> for ProviderTurn {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role.into(),
            text: turn.content.clone(),
        }
    }
}

/// Request built fresh for every send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    /// Prompt template followed by every turn except the last.
    pub history: Vec<ProviderTurn>,
    /// Content of the last turn.
    pub new_message: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdapterError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Builds the provider request for `conversation`.
///
/// Fails with [`AdapterError::InvalidRequest`] when the conversation is empty.
pub fn adapt(
    conversation: &[Turn],
    template: &PromptTemplate,
) -> Result<ProviderRequest, AdapterError> {
    let (last, earlier) = conversation
        .split_last()
        .ok_or_else(|| AdapterError::InvalidRequest("conversation has no turns".into()))?;

    let mut history = Vec::with_capacity(conversation.len());
    history.push(ProviderTurn {
        role: ProviderRole::User,
        text: template.as_str().to_string(),
    });
    history.extend(earlier.iter().map(ProviderTurn::from));

    Ok(ProviderRequest {
        history,
        new_message: last.content.clone(),
    })
}
