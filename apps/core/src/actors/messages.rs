use serde::Serialize;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::brain::ConversationContext;
use crate::models::{ChatMessage, ConversationTurn, QuickReply};

/// Defines errors that can occur within the actor system.
#[derive(Debug, thiserror::Error, Serialize, Clone)]
pub enum ActorError {
    /// An error originating from the remote completion service.
    #[error("LLM request failed: {0}")]
    LlmError(String),
    /// A generic internal error within an actor, e.g. a closed mailbox.
    #[error("Internal system error: {0}")]
    Internal(String),
}

// Re-export AppError for convenience
pub use crate::error::AppError;

/// Messages that can be sent to the `LlmActor`.
#[derive(Debug)]
pub enum LlmMessage {
    /// A request for a single chat completion over the full message history.
    Complete {
        messages: Vec<ChatMessage>,
        /// Overrides the configured model when set.
        model: Option<String>,
        /// A channel to send the reply text back.
        responder: oneshot::Sender<Result<String, AppError>>,
    },
}

/// Messages that can be sent to the `SupervisorActor`.
#[derive(Debug)]
pub enum SupervisorMessage {
    /// A user turn, typed or chosen from a quick reply.
    UserInput {
        input: String,
        /// A channel to send the completed assistant turn back.
        responder: oneshot::Sender<Result<ConversationTurn, AppError>>,
    },
    /// A request for a snapshot of the transcript.
    GetTranscript {
        responder: oneshot::Sender<Vec<ConversationTurn>>,
    },
    /// A request for a snapshot of the conversation context.
    GetContext {
        responder: oneshot::Sender<ConversationContext>,
    },
    /// Discards the session and starts over with a fresh welcome turn.
    Reset {
        responder: oneshot::Sender<ConversationTurn>,
    },
    /// A command to shut down the supervisor and its child actors.
    Shutdown,
}

/// Progress of a turn, for the display surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnEvent {
    /// The user's turn was appended.
    UserTurn { turn: ConversationTurn },
    /// The placeholder reply was appended; input should stay disabled.
    Pending { turn_id: Uuid },
    /// A cosmetic partial rendering of the reply.
    Token { turn_id: Uuid, partial: String },
    /// The reply is final.
    Completed {
        turn_id: Uuid,
        content: String,
        quick_replies: Vec<QuickReply>,
    },
}
