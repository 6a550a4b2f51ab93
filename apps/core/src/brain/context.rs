//! Conversation Context - per-session facts used to vary replies.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::intent::{IntentResult, Topic};

/// Session-level state updated once per user turn. `Default` is the initial
/// zero value a session starts with and a reset returns to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationContext {
    /// Topic resolved on the most recent turn
    pub last_topic: Option<Topic>,
    /// Number of user turns since the session started or was reset
    pub questions_asked: u32,
    /// Set the first time the personal topic fires
    pub personal_info_asked: bool,
    /// Set the first time the contact topic fires
    pub contact_requested: bool,
    /// Project names rendered in replies so far
    pub mentioned_projects: BTreeSet<String>,
    /// Skill names rendered in replies so far
    pub mentioned_skills: BTreeSet<String>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one user turn's classification and returns the new context.
    pub fn record(&self, intent: &IntentResult) -> Self {
        if intent.topic == Topic::Reset {
            return Self::default();
        }

        let mut next = self.clone();
        next.questions_asked = next.questions_asked.saturating_add(1);
        next.last_topic = Some(intent.topic);
        match intent.topic {
            Topic::Personal => next.personal_info_asked = true,
            Topic::Contact => next.contact_requested = true,
            _ => {}
        }
        next
    }

    /// True on the first user turn of a session.
    pub fn is_first_question(&self) -> bool {
        self.questions_asked == 1
    }

    /// The last topic, if it was one the visitor could continue with.
    pub fn previous_topic(&self) -> Option<Topic> {
        self.last_topic
            .filter(|t| !matches!(t, Topic::Unknown | Topic::Reset))
    }

    pub fn mention_projects<'a>(&mut self, names: impl IntoIterator<Item = &'a String>) {
        self.mentioned_projects.extend(names.into_iter().cloned());
    }

    pub fn mention_skills<'a>(&mut self, names: impl IntoIterator<Item = &'a String>) {
        self.mentioned_skills.extend(names.into_iter().cloned());
    }
}
