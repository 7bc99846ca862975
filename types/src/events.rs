use serde::de::DeserializeOwned;

use crate::conversation::AgentInfo;

/// One delimiter-bounded frame from the wire: an event name plus the raw
/// payload text. Produced by the frame decoder and consumed immediately by
/// [`ServerEvent::decode`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    name: String,
    data: String,
}

impl RawEvent {
    pub fn new(name: &str, data: &str) -> Self {
        Self {
            name: name.to_string(),
            data: data.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &str {
        &self.data
    }
}

/// Everything the server can push down a turn stream.
///
/// Only `StatusPaused` and the three `Message*` events carry state changes;
/// the rest are informational. Names outside the recognized set map to
/// `Ignored`, which consumers must skip without side effects.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    StatusStart(StatusStartEvent),
    StatusPaused(StatusPausedEvent),
    JudgeStart(JudgeStartEvent),
    JudgeFeedback(JudgeFeedbackEvent),
    JudgeDecision(JudgeDecisionEvent),
    MessageCreated(MessageCreatedEvent),
    MessageDelta(MessageDeltaEvent),
    MessageCompleted(MessageCompletedEvent),
    Error(ErrorEvent),
    Done,
    Ignored,
}

impl ServerEvent {
    /// Classify a raw frame. A payload that fails to parse degrades to the
    /// event's default (empty) payload; decoding never fails.
    pub fn decode(raw: &RawEvent) -> Self {
        match raw.name() {
            "status.start" => ServerEvent::StatusStart(payload(raw.data())),
            "status.paused" => ServerEvent::StatusPaused(payload(raw.data())),
            "judge.start" => ServerEvent::JudgeStart(payload(raw.data())),
            "judge.feedback" => ServerEvent::JudgeFeedback(payload(raw.data())),
            "judge.decision" => ServerEvent::JudgeDecision(payload(raw.data())),
            "agent.message.created" => ServerEvent::MessageCreated(payload(raw.data())),
            "agent.message.delta" => ServerEvent::MessageDelta(payload(raw.data())),
            "agent.message.completed" => ServerEvent::MessageCompleted(payload(raw.data())),
            "error" => ServerEvent::Error(payload(raw.data())),
            "done" => ServerEvent::Done,
            _ => ServerEvent::Ignored,
        }
    }
}

fn payload<T: DeserializeOwned + Default>(data: &str) -> T {
    serde_json::from_str(data).unwrap_or_default()
}

/// Opens a turn stream; carries the participant roster for the round.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusStartEvent {
    conversation_id: String,
    agents: Vec<AgentInfo>,
}

impl StatusStartEvent {
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    pub fn agents(&self) -> &[AgentInfo] {
        &self.agents
    }
}

/// The server unilaterally paused the conversation.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusPausedEvent {
    conversation_id: String,
}

impl StatusPausedEvent {
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }
}

/// Speaker selection is starting for this round.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JudgeStartEvent {
    candidates: Vec<String>,
    allow_repeated: bool,
    attempts: u32,
}

impl JudgeStartEvent {
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn allow_repeated(&self) -> bool {
        self.allow_repeated
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JudgeFeedbackEvent {
    text: String,
}

impl JudgeFeedbackEvent {
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// The selected speaker for this round.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JudgeDecisionEvent {
    agent_id: String,
    reason: Option<String>,
}

impl JudgeDecisionEvent {
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

/// A new in-progress message begins.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageCreatedEvent {
    message_id: String,
    agent_id: String,
}

impl MessageCreatedEvent {
    pub fn new(message_id: &str, agent_id: &str) -> Self {
        Self {
            message_id: message_id.to_string(),
            agent_id: agent_id.to_string(),
        }
    }

    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }
}

/// Incremental text to append to an in-progress message.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageDeltaEvent {
    message_id: String,
    agent_id: String,
    delta: String,
}

impl MessageDeltaEvent {
    pub fn new(message_id: &str, delta: &str) -> Self {
        Self {
            message_id: message_id.to_string(),
            agent_id: String::new(),
            delta: delta.to_string(),
        }
    }

    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn delta(&self) -> &str {
        &self.delta
    }
}

/// The message is final; the accumulated text should be flushed.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageCompletedEvent {
    message_id: String,
    agent_id: String,
    usage: Option<Usage>,
    finish_reason: Option<String>,
    turn: Option<u64>,
}

impl MessageCompletedEvent {
    pub fn new(message_id: &str, agent_id: &str) -> Self {
        Self {
            message_id: message_id.to_string(),
            agent_id: agent_id.to_string(),
            usage: None,
            finish_reason: None,
            turn: None,
        }
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn with_finish_reason(mut self, finish_reason: &str) -> Self {
        self.finish_reason = Some(finish_reason.to_string());
        self
    }

    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn usage(&self) -> Option<&Usage> {
        self.usage.as_ref()
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.finish_reason.as_deref()
    }

    pub fn turn(&self) -> Option<u64> {
        self.turn
    }
}

/// Token accounting attached to a completed message.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Usage {
    prompt_tokens: i32,
    completion_tokens: i32,
}

impl Usage {
    pub fn new(prompt_tokens: i32, completion_tokens: i32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
        }
    }

    pub fn prompt_tokens(&self) -> i32 {
        self.prompt_tokens
    }

    pub fn completion_tokens(&self) -> i32 {
        self.completion_tokens
    }
}

/// A failure the server reports inside the stream instead of aborting it.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorEvent {
    code: String,
    message: String,
}

impl ErrorEvent {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_message_events_with_camel_case_fields() {
        let raw = RawEvent::new(
            "agent.message.delta",
            r#"{"messageId":"m-1","agentId":"agent-2","delta":"He"}"#,
        );
        match ServerEvent::decode(&raw) {
            ServerEvent::MessageDelta(event) => {
                assert_eq!(event.message_id(), "m-1");
                assert_eq!(event.agent_id(), "agent-2");
                assert_eq!(event.delta(), "He");
            }
            other => panic!("expected MessageDelta, got {:?}", other),
        }
    }

    #[test]
    fn unknown_names_are_ignored() {
        let raw = RawEvent::new("status.unknown", r#"{"anything":true}"#);
        assert_eq!(ServerEvent::decode(&raw), ServerEvent::Ignored);

        // The framing default name is not a recognized event either.
        let raw = RawEvent::new("message", "{}");
        assert_eq!(ServerEvent::decode(&raw), ServerEvent::Ignored);
    }

    #[test]
    fn malformed_payload_degrades_to_empty_event() {
        let raw = RawEvent::new("agent.message.created", "{not json at all");
        match ServerEvent::decode(&raw) {
            ServerEvent::MessageCreated(event) => {
                assert_eq!(event.message_id(), "");
                assert_eq!(event.agent_id(), "");
            }
            other => panic!("expected MessageCreated, got {:?}", other),
        }
    }

    #[test]
    fn completed_event_carries_usage_and_finish_reason() {
        let raw = RawEvent::new(
            "agent.message.completed",
            r#"{"messageId":"m-1","agentId":"agent-1","usage":{"promptTokens":12,"completionTokens":7},"finishReason":"stop","turn":3}"#,
        );
        match ServerEvent::decode(&raw) {
            ServerEvent::MessageCompleted(event) => {
                let usage = event.usage().expect("usage should be present");
                assert_eq!(usage.prompt_tokens(), 12);
                assert_eq!(usage.completion_tokens(), 7);
                assert_eq!(event.finish_reason(), Some("stop"));
                assert_eq!(event.turn(), Some(3));
            }
            other => panic!("expected MessageCompleted, got {:?}", other),
        }
    }

    #[test]
    fn status_start_lists_participants() {
        let raw = RawEvent::new(
            "status.start",
            r#"{"conversationId":"g-1","agents":[{"agentId":"agent-1","roleCardId":"sage","name":"SAGE"}]}"#,
        );
        match ServerEvent::decode(&raw) {
            ServerEvent::StatusStart(event) => {
                assert_eq!(event.conversation_id(), "g-1");
                assert_eq!(event.agents().len(), 1);
                assert_eq!(event.agents()[0].agent_id(), "agent-1");
            }
            other => panic!("expected StatusStart, got {:?}", other),
        }
    }

    #[test]
    fn terminator_and_pause_decode_without_payloads() {
        assert_eq!(ServerEvent::decode(&RawEvent::new("done", "")), ServerEvent::Done);
        match ServerEvent::decode(&RawEvent::new("status.paused", "")) {
            ServerEvent::StatusPaused(event) => assert_eq!(event.conversation_id(), ""),
            other => panic!("expected StatusPaused, got {:?}", other),
        }
    }
}
