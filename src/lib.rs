//! Streaming client core for multi-participant AI group conversations.
//!
//! Bytes from a turn stream flow through the [`FrameDecoder`] into raw
//! frames, are classified into typed [`types::ServerEvent`]s, folded by the
//! [`MessageAssembler`] into completed messages, and drive the per-
//! conversation [`Conversation`] orchestrator, which decides when the next
//! turn may start: pause/resume, manual-speak requests, and
//! auto-continuation after a turn ends.

mod assembler;
mod client;
mod conversation;
mod error;
mod sse;
mod stats;
mod transport;

pub use group_chat_types as types;

pub use assembler::MessageAssembler;
pub use client::{Config, ConfigBuilder, HttpTransport};
pub use conversation::{
    Conversation, ConversationBuilder, Notification, TurnReport, DEFAULT_CONTINUE_DELAY,
};
pub use error::Error;
pub use sse::{FrameDecoder, Frames};
pub use stats::Stats;
pub use transport::{ByteStream, Transport};

use std::sync::Arc;

/// Open a handle to a group conversation over the HTTP transport, with
/// configuration taken from the environment.
pub fn join(conversation_id: &str) -> Arc<Conversation<HttpTransport>> {
    join_with_config(conversation_id, Config::new())
}

pub fn join_with_config(
    conversation_id: &str,
    config: Config,
) -> Arc<Conversation<HttpTransport>> {
    Conversation::new(conversation_id, HttpTransport::new(config))
}
