use crate::actors::messages::{ActorError, AppError, LlmMessage};
use crate::actors::traits::CompletionActor;
use crate::config::CompletionConfig;
use crate::models::ChatMessage;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{error, info, instrument, warn};

/// Extra time granted to the mailbox round-trip on top of the HTTP timeout.
const REPLY_GRACE: Duration = Duration::from_secs(5);

/// A handle to the `LlmActor`.
///
/// This struct provides a public, cloneable interface for sending messages to the
/// running completion actor. It abstracts away the `mpsc::Sender`.
#[derive(Clone)]
pub struct LlmActorHandle {
    sender: mpsc::Sender<LlmMessage>,
    reply_timeout: Duration,
}

impl LlmActorHandle {
    /// Creates a new `LlmActor` and returns a handle to it.
    ///
    /// This will spawn the `LlmActorRunner` in a new Tokio task. No request is
    /// made until the first completion; a missing API key is reported then.
    pub fn new(config: CompletionConfig) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let reply_timeout = config.timeout() + REPLY_GRACE;
        let actor = LlmActorRunner::new(receiver, config);
        tokio::spawn(async move { actor.run().await });
        Self {
            sender,
            reply_timeout,
        }
    }
}

#[async_trait]
impl CompletionActor for LlmActorHandle {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        model: Option<String>,
    ) -> Result<String, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = LlmMessage::Complete {
            messages,
            model,
            responder: send,
        };

        self.sender
            .send(msg)
            .await
            .map_err(|e| ActorError::Internal(e.to_string()))?;
        timeout(self.reply_timeout, recv)
            .await?
            .map_err(|e| ActorError::Internal(e.to_string()))?
    }
}

// --- Wire types (OpenAI-compatible chat completions) ---

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

// --- Actor Runner (Internal Logic) ---
struct LlmActorRunner {
    receiver: mpsc::Receiver<LlmMessage>,
    config: CompletionConfig,
    client: Client,
}

impl LlmActorRunner {
    fn new(receiver: mpsc::Receiver<LlmMessage>, config: CompletionConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });
        Self {
            receiver,
            config,
            client,
        }
    }

    async fn run(mut self) {
        info!(model = %self.config.model, "LlmActor started");
        while let Some(msg) = self.receiver.recv().await {
            self.handle_message(msg).await;
        }
        info!("LlmActor stopped");
    }

    async fn handle_message(&mut self, msg: LlmMessage) {
        match msg {
            LlmMessage::Complete {
                messages,
                model,
                responder,
            } => {
                let result = self.chat_completion(messages, model).await;
                if let Err(e) = &result {
                    error!("Completion failed: {}", e);
                }
                let _ = responder.send(result);
            }
        }
    }

    #[instrument(skip(self, messages), fields(message_count = messages.len()))]
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        model: Option<String>,
    ) -> Result<String, AppError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            AppError::Config("TOGETHER_API_KEY is not set".to_string())
        })?;
        let endpoint = self.config.endpoint()?;
        let model = model.as_deref().unwrap_or(&self.config.model);

        info!(%endpoint, model, "Requesting chat completion");

        let body = CompletionRequest {
            model,
            messages: &messages,
            stream: false,
        };

        // One deadline for the whole exchange: a body that stalls after the
        // headers must not hold the mailbox.
        let content = timeout(
            self.config.timeout(),
            self.send_request(endpoint, api_key, &body),
        )
        .await??;

        if content.is_empty() {
            warn!("Completion returned no content");
            return Err(ActorError::LlmError("Completion returned no content".to_string()).into());
        }
        Ok(content)
    }

    async fn send_request(
        &self,
        endpoint: url::Url,
        api_key: &str,
        body: &CompletionRequest<'_>,
    ) -> Result<String, AppError> {
        let res = self
            .client
            .post(endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", api_key))
            .json(body)
            .send()
            .await?;
        let status = res.status();

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ActorError::LlmError(format!(
                "Completion request failed with status {}: {}",
                status, body
            ))
            .into());
        }

        let parsed: CompletionResponse = res
            .json()
            .await
            .map_err(|e| ActorError::LlmError(format!("Malformed completion response: {}", e)))?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .unwrap_or_default())
    }
}
