use std::collections::HashMap;

use group_chat_types::{ChatMessage, ServerEvent};

struct InProgress {
    agent_id: String,
    text: String,
}

/// Reassembles streamed fragments into complete messages, keyed by the
/// opaque message id. Holds state for exactly one streaming response;
/// entries still open when the stream ends are dropped with it.
///
/// Relies on the producer ordering `created → delta* → completed` per
/// message id; nothing is reordered or buffered beyond the open entries.
pub struct MessageAssembler {
    in_progress: HashMap<String, InProgress>,
}

impl MessageAssembler {
    pub fn new() -> Self {
        Self {
            in_progress: HashMap::new(),
        }
    }

    /// Fold one event into the in-progress table. Returns the finished
    /// message on `agent.message.completed`, `None` otherwise.
    pub fn apply(&mut self, event: &ServerEvent) -> Option<ChatMessage> {
        match event {
            ServerEvent::MessageCreated(created) => {
                // A duplicate id silently replaces the stale entry.
                self.in_progress.insert(
                    created.message_id().to_string(),
                    InProgress {
                        agent_id: created.agent_id().to_string(),
                        text: String::new(),
                    },
                );
                None
            }
            ServerEvent::MessageDelta(delta) => {
                // A delta without a created entry is dropped.
                if let Some(entry) = self.in_progress.get_mut(delta.message_id()) {
                    entry.text.push_str(delta.delta());
                }
                None
            }
            ServerEvent::MessageCompleted(completed) => {
                let content = self
                    .in_progress
                    .remove(completed.message_id())
                    .map(|entry| entry.text)
                    .unwrap_or_default();
                Some(ChatMessage::assistant(completed.agent_id(), content))
            }
            _ => None,
        }
    }

    /// Number of messages that began but have not completed yet.
    pub fn open_messages(&self) -> usize {
        self.in_progress.len()
    }
}

impl Default for MessageAssembler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use group_chat_types::events::{MessageCompletedEvent, MessageCreatedEvent, MessageDeltaEvent};
    use group_chat_types::MessageRole;

    #[test]
    fn accumulates_deltas_in_order() {
        let mut assembler = MessageAssembler::new();

        assert!(assembler
            .apply(&ServerEvent::MessageCreated(MessageCreatedEvent::new("m-1", "agent-1")))
            .is_none());
        assert!(assembler
            .apply(&ServerEvent::MessageDelta(MessageDeltaEvent::new("m-1", "He")))
            .is_none());
        assert!(assembler
            .apply(&ServerEvent::MessageDelta(MessageDeltaEvent::new("m-1", "llo")))
            .is_none());

        let message = assembler
            .apply(&ServerEvent::MessageCompleted(MessageCompletedEvent::new("m-1", "agent-1")))
            .expect("completion should emit a message");
        assert_eq!(message.role(), MessageRole::Assistant);
        assert_eq!(message.agent_id(), Some("agent-1"));
        assert_eq!(message.content(), "Hello");
        assert_eq!(assembler.open_messages(), 0);
    }

    #[test]
    fn dangling_delta_is_dropped() {
        let mut assembler = MessageAssembler::new();
        assert!(assembler
            .apply(&ServerEvent::MessageDelta(MessageDeltaEvent::new("m-9", "lost")))
            .is_none());
        assert_eq!(assembler.open_messages(), 0);
    }

    #[test]
    fn completion_without_created_emits_empty_content() {
        let mut assembler = MessageAssembler::new();
        let message = assembler
            .apply(&ServerEvent::MessageCompleted(MessageCompletedEvent::new("m-2", "agent-2")))
            .expect("completion should still emit");
        assert_eq!(message.agent_id(), Some("agent-2"));
        assert_eq!(message.content(), "");
    }

    #[test]
    fn duplicate_created_resets_the_buffer() {
        let mut assembler = MessageAssembler::new();
        assembler.apply(&ServerEvent::MessageCreated(MessageCreatedEvent::new("m-1", "agent-1")));
        assembler.apply(&ServerEvent::MessageDelta(MessageDeltaEvent::new("m-1", "stale")));
        assembler.apply(&ServerEvent::MessageCreated(MessageCreatedEvent::new("m-1", "agent-1")));

        let message = assembler
            .apply(&ServerEvent::MessageCompleted(MessageCompletedEvent::new("m-1", "agent-1")))
            .expect("completion should emit");
        assert_eq!(message.content(), "");
    }

    #[test]
    fn interleaved_messages_keep_separate_buffers() {
        let mut assembler = MessageAssembler::new();
        assembler.apply(&ServerEvent::MessageCreated(MessageCreatedEvent::new("m-1", "agent-1")));
        assembler.apply(&ServerEvent::MessageCreated(MessageCreatedEvent::new("m-2", "agent-2")));
        assembler.apply(&ServerEvent::MessageDelta(MessageDeltaEvent::new("m-1", "one")));
        assembler.apply(&ServerEvent::MessageDelta(MessageDeltaEvent::new("m-2", "two")));
        assert_eq!(assembler.open_messages(), 2);

        let first = assembler
            .apply(&ServerEvent::MessageCompleted(MessageCompletedEvent::new("m-1", "agent-1")))
            .expect("first completion");
        let second = assembler
            .apply(&ServerEvent::MessageCompleted(MessageCompletedEvent::new("m-2", "agent-2")))
            .expect("second completion");
        assert_eq!(first.content(), "one");
        assert_eq!(second.content(), "two");
    }
}
