use crate::actors::messages::AppError;
use crate::models::ChatMessage;
use async_trait::async_trait;

/// Defines the public interface for a remote completion actor.
///
/// This trait abstracts the vendor behind the completion call, so the
/// supervisor can be driven by the HTTP-backed actor or by a test double.
#[async_trait]
pub trait CompletionActor: Send + Sync + 'static {
    /// Sends the ordered, role-tagged history and returns the reply text.
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        model: Option<String>,
    ) -> Result<String, AppError>;
}
