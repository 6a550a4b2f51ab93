use crate::actors::llm::LlmActorHandle;
use crate::actors::messages::{ActorError, AppError, SupervisorMessage, TurnEvent};
use crate::actors::traits::CompletionActor;
use crate::brain::{ComposedReply, ConversationContext, IntentClassifier, ResponseComposer};
use crate::config::{AppConfig, ResponseMode};
use crate::models::{ConversationTurn, PortfolioProfile};
use crate::reveal;
use crate::session::{compose_local, SessionState};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Duration};
use tracing::{error, info, instrument, warn};

const QUERY_TIMEOUT: Duration = Duration::from_secs(5);
/// Added to the completion timeout to bound a whole turn, reveal included.
const TURN_SLACK: Duration = Duration::from_secs(120);

/// What the supervisor needs from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct SupervisorSettings {
    pub mode: ResponseMode,
    pub reveal_delay: Duration,
    pub turn_timeout: Duration,
}

impl From<&AppConfig> for SupervisorSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            mode: config.mode,
            reveal_delay: config.reveal_delay,
            turn_timeout: config.completion.timeout() + TURN_SLACK,
        }
    }
}

impl Default for SupervisorSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

/// A handle to the `SupervisorActor`.
///
/// The supervisor owns the session (transcript and conversation context) and
/// processes one message at a time, so turns never overlap.
#[derive(Clone)]
pub struct SupervisorHandle {
    sender: mpsc::Sender<SupervisorMessage>,
    turn_timeout: Duration,
}

impl SupervisorHandle {
    /// Creates the production supervisor.
    ///
    /// In remote mode an [`LlmActorHandle`] is spawned as its child; in
    /// scripted mode no completion actor exists.
    pub fn new(
        config: &AppConfig,
        profile: PortfolioProfile,
        events: Option<mpsc::Sender<TurnEvent>>,
    ) -> Self {
        let completion = match config.mode {
            ResponseMode::Remote => Some(Arc::new(LlmActorHandle::new(config.completion.clone()))),
            ResponseMode::Scripted => None,
        };
        Self::with_completion(config.into(), Arc::new(profile), completion, events)
    }

    /// Creates a supervisor around any [`CompletionActor`].
    pub fn with_completion<C: CompletionActor>(
        settings: SupervisorSettings,
        profile: Arc<PortfolioProfile>,
        completion: Option<Arc<C>>,
        events: Option<mpsc::Sender<TurnEvent>>,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let turn_timeout = settings.turn_timeout;
        let actor = SupervisorRunner::new(receiver, settings, profile, completion, events);
        tokio::spawn(async move { actor.run().await });
        Self {
            sender,
            turn_timeout,
        }
    }

    async fn request<T>(
        &self,
        msg: SupervisorMessage,
        recv: oneshot::Receiver<T>,
        limit: Duration,
    ) -> Result<T, AppError> {
        self.sender
            .send(msg)
            .await
            .map_err(|e| ActorError::Internal(e.to_string()))?;
        Ok(timeout(limit, recv)
            .await?
            .map_err(|e| ActorError::Internal(e.to_string()))?)
    }

    /// Submits one user turn, typed or picked from a quick reply, and returns
    /// the completed assistant turn.
    #[instrument(skip(self))]
    pub async fn send_message(&self, input: String) -> Result<ConversationTurn, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = SupervisorMessage::UserInput {
            input,
            responder: send,
        };
        self.request(msg, recv, self.turn_timeout).await?
    }

    /// Snapshot of the transcript, oldest first.
    pub async fn transcript(&self) -> Result<Vec<ConversationTurn>, AppError> {
        let (send, recv) = oneshot::channel();
        self.request(SupervisorMessage::GetTranscript { responder: send }, recv, QUERY_TIMEOUT)
            .await
    }

    pub async fn context(&self) -> Result<ConversationContext, AppError> {
        let (send, recv) = oneshot::channel();
        self.request(SupervisorMessage::GetContext { responder: send }, recv, QUERY_TIMEOUT)
            .await
    }

    /// Discards the session and returns the new welcome turn.
    #[instrument(skip(self))]
    pub async fn reset(&self) -> Result<ConversationTurn, AppError> {
        let (send, recv) = oneshot::channel();
        self.request(SupervisorMessage::Reset { responder: send }, recv, QUERY_TIMEOUT)
            .await
    }

    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.sender
            .send(SupervisorMessage::Shutdown)
            .await
            .map_err(|e| ActorError::Internal(e.to_string()).into())
    }
}

// --- Actor Runner ---
struct SupervisorRunner<C: CompletionActor> {
    receiver: mpsc::Receiver<SupervisorMessage>,
    settings: SupervisorSettings,
    classifier: IntentClassifier,
    composer: ResponseComposer,
    system_prompt: String,
    completion: Option<Arc<C>>,
    events: Option<mpsc::Sender<TurnEvent>>,
    state: SessionState,
}

impl<C: CompletionActor> SupervisorRunner<C> {
    fn new(
        receiver: mpsc::Receiver<SupervisorMessage>,
        settings: SupervisorSettings,
        profile: Arc<PortfolioProfile>,
        completion: Option<Arc<C>>,
        events: Option<mpsc::Sender<TurnEvent>>,
    ) -> Self {
        let system_prompt = profile.system_prompt();
        let composer = ResponseComposer::new(profile);
        let state = SessionState::new(&composer);
        Self {
            receiver,
            settings,
            classifier: IntentClassifier::new(),
            composer,
            system_prompt,
            completion,
            events,
            state,
        }
    }

    async fn run(mut self) {
        info!(mode = ?self.settings.mode, "Supervisor started");
        while let Some(msg) = self.receiver.recv().await {
            if let SupervisorMessage::Shutdown = msg {
                info!("Supervisor shutting down...");
                break;
            }
            self.handle_message(msg).await;
        }
        info!("Supervisor stopped");
    }

    async fn handle_message(&mut self, msg: SupervisorMessage) {
        match msg {
            SupervisorMessage::UserInput { input, responder } => {
                let result = self.handle_user_input(input).await;
                if let Err(e) = &result {
                    error!("Error processing user message: {:?}", e);
                }
                let _ = responder.send(result);
            }
            SupervisorMessage::GetTranscript { responder } => {
                let _ = responder.send(self.state.transcript.turns().to_vec());
            }
            SupervisorMessage::GetContext { responder } => {
                let _ = responder.send(self.state.context.clone());
            }
            SupervisorMessage::Reset { responder } => {
                info!("Session reset");
                self.state = SessionState::new(&self.composer);
                if let Some(welcome) = self.state.transcript.last() {
                    let _ = responder.send(welcome.clone());
                }
            }
            SupervisorMessage::Shutdown => {}
        }
    }

    #[instrument(skip(self))]
    async fn handle_user_input(&mut self, input: String) -> Result<ConversationTurn, AppError> {
        let user_turn = self.state.transcript.push_user(input.as_str())?.clone();
        self.emit(TurnEvent::UserTurn { turn: user_turn }).await;

        let turn_id = self.state.transcript.begin_assistant()?;
        self.emit(TurnEvent::Pending { turn_id }).await;

        let reply = match self.settings.mode {
            ResponseMode::Scripted => {
                compose_local(&self.state.context, &input, &self.classifier, &self.composer)
            }
            ResponseMode::Remote => self.remote_reply(&input).await,
        };

        if let Some(events) = &self.events {
            if !self.settings.reveal_delay.is_zero() {
                reveal::stream_words(turn_id, &reply.content, self.settings.reveal_delay, events)
                    .await;
            }
        }

        let ComposedReply {
            content,
            quick_replies,
            context,
        } = reply;
        let turn = self
            .state
            .transcript
            .complete_assistant(turn_id, content, quick_replies)?
            .clone();
        self.state.context = context;

        self.emit(TurnEvent::Completed {
            turn_id,
            content: turn.content.clone(),
            quick_replies: turn.quick_replies.clone(),
        })
        .await;
        info!(
            questions_asked = self.state.context.questions_asked,
            options = turn.quick_replies.len(),
            "Turn completed"
        );
        Ok(turn)
    }

    /// Forwards the transcript upstream. The input is still classified so the
    /// context stays current and a local reply is ready if the call fails.
    async fn remote_reply(&self, input: &str) -> ComposedReply {
        let local = compose_local(&self.state.context, input, &self.classifier, &self.composer);

        let Some(completion) = &self.completion else {
            let err = AppError::Config("no completion service is configured".to_string());
            return self.composer.degraded(&err, local);
        };

        let messages = self
            .state
            .transcript
            .to_chat_messages(Some(&self.system_prompt));
        match completion.complete(messages, None).await {
            Ok(text) => {
                // Only the remote text is shown, so mentions stay as they were.
                let mut context = local.context;
                context.mentioned_projects = self.state.context.mentioned_projects.clone();
                context.mentioned_skills = self.state.context.mentioned_skills.clone();
                ComposedReply {
                    quick_replies: self.composer.suggest_from_completion(&text),
                    content: text,
                    context,
                }
            }
            Err(e) => {
                warn!(error = %e, "Remote completion failed, using local reply");
                self.composer.degraded(&e, local)
            }
        }
    }

    async fn emit(&self, event: TurnEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::Topic;
    use crate::models::{ChatMessage, MessageRole, Role, TurnStatus};
    use async_trait::async_trait;
    use std::sync::Mutex;

    // --- Mock Actors ---

    struct MockCompletionActor {
        response: Result<String, AppError>,
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl MockCompletionActor {
        fn new(response: Result<String, AppError>) -> Self {
            Self {
                response,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionActor for MockCompletionActor {
        async fn complete(
            &self,
            messages: Vec<ChatMessage>,
            _model: Option<String>,
        ) -> Result<String, AppError> {
            self.seen.lock().unwrap().push(messages);
            self.response.clone()
        }
    }

    // --- Test Setup ---

    fn settings(mode: ResponseMode) -> SupervisorSettings {
        SupervisorSettings {
            mode,
            reveal_delay: Duration::ZERO,
            turn_timeout: Duration::from_secs(10),
        }
    }

    fn remote_supervisor(
        response: Result<String, AppError>,
    ) -> (SupervisorHandle, Arc<MockCompletionActor>) {
        let mock = Arc::new(MockCompletionActor::new(response));
        let handle = SupervisorHandle::with_completion(
            settings(ResponseMode::Remote),
            Arc::new(PortfolioProfile::default()),
            Some(mock.clone()),
            None,
        );
        (handle, mock)
    }

    // --- Tests ---

    #[tokio::test]
    async fn test_remote_turn_uses_completion_text() {
        // 1. Arrange
        let (handle, mock) = remote_supervisor(Ok("I mostly build React frontends.".to_string()));

        // 2. Act
        let turn = handle.send_message("What do you do?".to_string()).await.unwrap();

        // 3. Assert
        assert_eq!(turn.content, "I mostly build React frontends.");
        assert_eq!(turn.status, TurnStatus::Complete);
        let labels: Vec<&str> = turn.quick_replies.iter().map(|q| q.label.as_str()).collect();
        assert_eq!(labels, vec!["Backend Skills", "Contact"]);

        let seen = mock.seen.lock().unwrap();
        let sent = &seen[0];
        assert_eq!(sent[0].role, MessageRole::System);
        assert_eq!(sent.last().unwrap().role, MessageRole::User);
        assert_eq!(sent.last().unwrap().content, "What do you do?");
        // System prompt, welcome, user input. The pending placeholder is not sent.
        assert_eq!(sent.len(), 3);
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back_locally() {
        let (handle, _) = remote_supervisor(Err(AppError::Actor(ActorError::LlmError(
            "quota exceeded".to_string(),
        ))));

        let turn = handle
            .send_message("What are your skills?".to_string())
            .await
            .unwrap();

        assert!(turn.content.contains("couldn't reach"));
        assert!(turn.content.contains("Frontend"));
        assert_eq!(turn.quick_replies.last().unwrap().label, "Start Over");

        let context = handle.context().await.unwrap();
        assert_eq!(context.last_topic, Some(Topic::Skills));
        assert_eq!(context.questions_asked, 1);
    }

    #[tokio::test]
    async fn test_remote_reply_does_not_record_unrendered_mentions() {
        let (handle, _) = remote_supervisor(Ok("I work across the stack.".to_string()));

        handle
            .send_message("What are your skills?".to_string())
            .await
            .unwrap();
        handle.send_message("frontend".to_string()).await.unwrap();

        let context = handle.context().await.unwrap();
        assert!(context.mentioned_skills.is_empty());
        assert!(context.mentioned_projects.is_empty());
        assert_eq!(context.last_topic, Some(Topic::Skills));
        assert_eq!(context.questions_asked, 2);
    }

    #[tokio::test]
    async fn test_remote_missing_key_is_visible_error() {
        let (handle, _) = remote_supervisor(Err(AppError::Config(
            "TOGETHER_API_KEY is not set".to_string(),
        )));

        let turn = handle.send_message("hello".to_string()).await.unwrap();
        assert!(turn.content.contains("not configured"));
        assert!(turn.quick_replies.iter().any(|q| q.label == "Start Over"));
    }

    #[tokio::test]
    async fn test_remote_mode_without_actor_degrades() {
        let handle = SupervisorHandle::with_completion::<MockCompletionActor>(
            settings(ResponseMode::Remote),
            Arc::new(PortfolioProfile::default()),
            None,
            None,
        );
        let turn = handle.send_message("hi".to_string()).await.unwrap();
        assert!(turn.content.contains("not configured"));
    }

    #[tokio::test]
    async fn test_events_follow_turn_lifecycle() {
        let (tx, mut rx) = mpsc::channel(1024);
        let handle = SupervisorHandle::with_completion::<MockCompletionActor>(
            SupervisorSettings {
                reveal_delay: Duration::from_millis(1),
                ..settings(ResponseMode::Scripted)
            },
            Arc::new(PortfolioProfile::default()),
            None,
            Some(tx),
        );

        let turn = handle
            .send_message("How can I contact you?".to_string())
            .await
            .unwrap();

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }

        assert!(matches!(&events[0], TurnEvent::UserTurn { turn } if turn.role == Role::User));
        assert_eq!(events[1], TurnEvent::Pending { turn_id: turn.id });
        assert!(events[2..events.len() - 1]
            .iter()
            .all(|e| matches!(e, TurnEvent::Token { turn_id, .. } if *turn_id == turn.id)));
        match events.last().unwrap() {
            TurnEvent::Completed {
                turn_id, content, ..
            } => {
                assert_eq!(*turn_id, turn.id);
                assert_eq!(content, &turn.content);
            }
            other => panic!("Expected Completed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_shutdown_closes_mailbox() {
        let handle = SupervisorHandle::with_completion::<MockCompletionActor>(
            settings(ResponseMode::Scripted),
            Arc::new(PortfolioProfile::default()),
            None,
            None,
        );
        handle.shutdown().await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(handle.send_message("hi".to_string()).await.is_err());
    }
}
