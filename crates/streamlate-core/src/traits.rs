use crate::{error::StreamlateError, message::ChatCommand};
use async_trait::async_trait;

/// Completion backend trait — the translator.
///
/// Every text-completion backend implements this to provide a uniform
/// prompt-in/text-out interface. An empty reply is indistinguishable
/// from a failed or safety-rejected translation, by contract.
#[async_trait]
pub trait Completion: Send + Sync {
    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// Send one prompt to the given model and return the raw text reply.
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, StreamlateError>;

    /// Check if the backend is reachable and ready.
    async fn is_available(&self) -> bool;
}

/// Chat channel trait — where commands come from and replies go.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Platform message length ceiling, used by the reply chunker.
    fn max_message_len(&self) -> usize;

    /// Start listening for incoming commands.
    /// Send-only surfaces return a receiver that yields nothing.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<ChatCommand>, StreamlateError>;

    /// Send a single already-chunked message through this channel.
    async fn send(&self, text: &str) -> Result<(), StreamlateError>;

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), StreamlateError> {
        Ok(())
    }
}

/// A user record returned by the platform directory.
#[derive(Debug, Clone)]
pub struct DirectoryUser {
    pub id: String,
    pub display_name: String,
}

/// Platform user-directory lookup — used only when the local profile
/// store has no reverse-index match for a typed username.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn lookup(&self, login: &str) -> Result<Option<DirectoryUser>, StreamlateError>;
}
