use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Skill lists grouped by category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillSet {
    pub frontend: Vec<String>,
    pub backend: Vec<String>,
    pub devops: Vec<String>,
}

/// A project showcased in the portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct Project {
    /// Display name, also used in "Tell me more about {name}" quick replies.
    #[validate(length(min = 1))]
    pub name: String,
    /// Short description of what the project does.
    #[validate(length(min = 1))]
    pub description: String,
    /// Ordered technology tags.
    pub tech_stack: Vec<String>,
    /// Link to the live demo.
    #[validate(url)]
    pub live_url: String,
    /// Link to the source repository.
    #[validate(url)]
    pub code_url: String,
    /// Free-text note on the challenges the project solved.
    pub challenges_solved: String,
    /// Classifier subtopic that selects this project (e.g. "dashboard").
    #[serde(default)]
    pub intent_key: Option<String>,
}

/// A past or current position.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct Experience {
    #[validate(length(min = 1))]
    pub company: String,
    #[validate(length(min = 1))]
    pub role: String,
    pub period: String,
    #[serde(default)]
    pub achievements: Vec<String>,
}

/// Static information about the portfolio owner. Loaded once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct PortfolioProfile {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub role: String,
    pub location: String,
    #[validate(email)]
    pub email: String,
    pub linkedin: String,
    pub github: String,
    pub website: String,
    pub skills: SkillSet,
    pub projects: Vec<Project>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    pub about: String,
    #[serde(default)]
    pub interests: Vec<String>,
}

/// Author of a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Icon tag rendered next to a quick reply by the display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    Zap,
    Code,
    Mail,
    Briefcase,
    BookOpen,
    Rotate,
}

/// A suggested follow-up. Choosing it is the same as typing `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReply {
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub icon: Option<Icon>,
}

impl QuickReply {
    pub fn new(label: impl Into<String>, value: impl Into<String>, icon: Icon) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            icon: Some(icon),
        }
    }
}

/// Lifecycle of a transcript turn. Only a pending assistant turn may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    Pending,
    Complete,
}

/// A single message in the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// The unique identifier for the turn.
    pub id: Uuid,
    /// Who authored the turn.
    pub role: Role,
    /// Markdown content.
    pub content: String,
    /// When the turn was created.
    pub created_at: DateTime<Utc>,
    /// Suggested follow-ups, if any.
    #[serde(default)]
    pub quick_replies: Vec<QuickReply>,
    pub status: TurnStatus,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::User,
            content: content.into(),
            created_at: Utc::now(),
            quick_replies: vec![],
            status: TurnStatus::Complete,
        }
    }

    pub fn assistant(content: impl Into<String>, quick_replies: Vec<QuickReply>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::Assistant,
            content: content.into(),
            created_at: Utc::now(),
            quick_replies,
            status: TurnStatus::Complete,
        }
    }

    /// Placeholder shown while the reply is being generated.
    pub fn pending_assistant() -> Self {
        Self {
            status: TurnStatus::Pending,
            ..Self::assistant(String::new(), vec![])
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == TurnStatus::Pending
    }
}

/// Role of a message sent to the remote completion service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl From<Role> for MessageRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => MessageRole::User,
            Role::Assistant => MessageRole::Assistant,
        }
    }
}

/// A role-tagged message sent upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_turn_is_empty_assistant() {
        let turn = ConversationTurn::pending_assistant();
        assert_eq!(turn.role, Role::Assistant);
        assert!(turn.content.is_empty());
        assert!(turn.quick_replies.is_empty());
        assert!(turn.is_pending());
    }

    #[test]
    fn test_message_role_serialization() {
        let msg = ChatMessage::new(MessageRole::System, "hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "hi");
    }

    #[test]
    fn test_icon_serializes_snake_case() {
        let reply = QuickReply::new("Experience", "Tell me about your experience", Icon::BookOpen);
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["icon"], "book_open");
    }
}
