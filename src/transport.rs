use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
#[cfg(test)]
use mockall::automock;

use crate::error::Error;

/// The raw byte stream of one turn's response.
pub type ByteStream = BoxStream<'static, Result<Bytes, Error>>;

// Abstracting the wire behind a trait keeps the orchestrator testable with a
// mock transport and leaves room for other carriers of the same framing.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Begin a generation turn. `user_text` carries the human's message;
    /// `None` lets the next participant continue without new human input.
    async fn start_turn(
        &self,
        conversation: &str,
        user_text: Option<String>,
    ) -> Result<ByteStream, Error>;

    /// Ask the server to pause the conversation.
    async fn pause(&self, conversation: &str) -> Result<(), Error>;

    /// Ask the server to resume the conversation.
    async fn resume(&self, conversation: &str) -> Result<(), Error>;
}
