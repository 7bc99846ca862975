use chrono::{DateTime, Utc};

/// The role of the message author: "user", "assistant", "system"
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum MessageRole {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "system")]
    System,
}

/// A finished message in the conversation log. Immutable once appended.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    role: MessageRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    agent_id: Option<String>,
    content: String,
    ts: DateTime<Utc>,
}

impl ChatMessage {
    /// A message the human typed, stamped now.
    pub fn user(content: &str) -> Self {
        Self {
            role: MessageRole::User,
            agent_id: None,
            content: content.to_string(),
            ts: Utc::now(),
        }
    }

    /// A completed responder message, stamped now.
    pub fn assistant(agent_id: &str, content: String) -> Self {
        Self {
            role: MessageRole::Assistant,
            agent_id: Some(agent_id.to_string()),
            content,
            ts: Utc::now(),
        }
    }

    pub fn role(&self) -> MessageRole {
        self.role.clone()
    }

    pub fn agent_id(&self) -> Option<&str> {
        self.agent_id.as_deref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn ts(&self) -> DateTime<Utc> {
        self.ts
    }
}
