//! Session state: the append-only transcript plus the conversation context,
//! and the pure scripted turn function over them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::brain::{ComposedReply, ConversationContext, IntentClassifier, ResponseComposer};
use crate::error::AppError;
use crate::models::{ChatMessage, ConversationTurn, MessageRole, QuickReply, TurnStatus};

/// Ordered, append-only list of turns. Newest last.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<ConversationTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    /// True while an assistant reply is being generated.
    pub fn has_pending(&self) -> bool {
        self.turns.last().is_some_and(ConversationTurn::is_pending)
    }

    fn push(&mut self, turn: ConversationTurn) -> Result<(), AppError> {
        if self.has_pending() {
            return Err(AppError::Transcript(
                "cannot append while a reply is pending".to_string(),
            ));
        }
        self.turns.push(turn);
        Ok(())
    }

    /// Appends a completed user turn.
    pub fn push_user(&mut self, content: impl Into<String>) -> Result<&ConversationTurn, AppError> {
        self.push(ConversationTurn::user(content))?;
        Ok(&self.turns[self.turns.len() - 1])
    }

    /// Appends a completed assistant turn.
    pub fn push_assistant(
        &mut self,
        content: impl Into<String>,
        quick_replies: Vec<QuickReply>,
    ) -> Result<&ConversationTurn, AppError> {
        self.push(ConversationTurn::assistant(content, quick_replies))?;
        Ok(&self.turns[self.turns.len() - 1])
    }

    /// Appends the placeholder assistant turn and returns its id.
    pub fn begin_assistant(&mut self) -> Result<Uuid, AppError> {
        let turn = ConversationTurn::pending_assistant();
        let id = turn.id;
        self.push(turn)?;
        Ok(id)
    }

    /// Fills in the pending placeholder. Only the last turn, only once.
    pub fn complete_assistant(
        &mut self,
        id: Uuid,
        content: impl Into<String>,
        quick_replies: Vec<QuickReply>,
    ) -> Result<&ConversationTurn, AppError> {
        let turn = match self.turns.last_mut() {
            Some(turn) if turn.id == id => turn,
            _ => {
                return Err(AppError::Transcript(format!(
                    "turn {} is not the in-flight reply",
                    id
                )))
            }
        };
        if !turn.is_pending() {
            return Err(AppError::Transcript(format!("turn {} is already complete", id)));
        }
        turn.content = content.into();
        turn.quick_replies = quick_replies;
        turn.status = TurnStatus::Complete;
        Ok(turn)
    }

    /// Every completed turn as a role-tagged message, preceded by the system prompt.
    pub fn to_chat_messages(&self, system_prompt: Option<&str>) -> Vec<ChatMessage> {
        system_prompt
            .map(|p| ChatMessage::new(MessageRole::System, p))
            .into_iter()
            .chain(
                self.turns
                    .iter()
                    .filter(|t| !t.is_pending())
                    .map(|t| ChatMessage::new(t.role.into(), t.content.clone())),
            )
            .collect()
    }
}

/// Everything a conversation owns: transcript and context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub transcript: Transcript,
    pub context: ConversationContext,
}

impl SessionState {
    /// A fresh session: exactly one assistant turn carrying the welcome message.
    pub fn new(composer: &ResponseComposer) -> Self {
        let welcome = composer.welcome();
        let mut transcript = Transcript::new();
        transcript.turns.push(ConversationTurn::assistant(
            welcome.content,
            welcome.quick_replies,
        ));
        Self {
            transcript,
            context: welcome.context,
        }
    }

    /// Quick replies offered by the latest assistant turn.
    pub fn current_quick_replies(&self) -> &[QuickReply] {
        self.transcript
            .turns()
            .iter()
            .rev()
            .find(|t| t.role == crate::models::Role::Assistant)
            .map(|t| t.quick_replies.as_slice())
            .unwrap_or(&[])
    }
}

/// Runs one scripted turn: `(transcript, context, input) -> (transcript', context')`.
///
/// Appends the user turn, classifies it, composes the reply against the prior
/// context and appends the assistant turn.
pub fn process_turn(
    mut state: SessionState,
    input: &str,
    classifier: &IntentClassifier,
    composer: &ResponseComposer,
) -> Result<SessionState, AppError> {
    state.transcript.push_user(input)?;
    let ComposedReply {
        content,
        quick_replies,
        context,
    } = compose_local(&state.context, input, classifier, composer);
    state.transcript.push_assistant(content, quick_replies)?;
    state.context = context;
    Ok(state)
}

/// Classifies and composes without touching the transcript.
pub fn compose_local(
    context: &ConversationContext,
    input: &str,
    classifier: &IntentClassifier,
    composer: &ResponseComposer,
) -> ComposedReply {
    let intent = classifier.classify(input);
    tracing::debug!(
        topic = %intent.topic,
        subtopic = ?intent.subtopic,
        score = intent.score,
        "Classified input"
    );
    composer.compose(&intent, context)
}
