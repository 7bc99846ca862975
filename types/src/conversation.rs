/// Snapshot of the per-conversation turn flags.
///
/// `in_flight` is the turn mutual exclusion: it is true for the whole span
/// between issuing a turn request and that request's stream fully draining.
/// `paused` and `auto_continue` are independent; a paused conversation still
/// finishes its in-flight turn but will not auto-schedule the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnSnapshot {
    pub in_flight: bool,
    pub paused: bool,
    pub auto_continue: bool,
    pub wants_to_speak: bool,
}

impl Default for TurnSnapshot {
    fn default() -> Self {
        Self {
            in_flight: false,
            paused: false,
            // Conversations auto-run until someone turns it off.
            auto_continue: true,
            wants_to_speak: false,
        }
    }
}

/// What caused a turn request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnTrigger {
    /// Scheduled continuation after the previous turn ended.
    AutoContinue,
    /// The human sent a message.
    UserMessage,
    /// The human had flagged that they wanted the next turn.
    WantToSpeak,
}

/// One participant in a group conversation, as announced by the server at
/// the start of a round.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentInfo {
    agent_id: String,
    role_card_id: String,
    name: String,
    model: String,
    provider_alias: String,
}

impl AgentInfo {
    pub fn new(agent_id: &str, role_card_id: &str, name: &str) -> Self {
        Self {
            agent_id: agent_id.to_string(),
            role_card_id: role_card_id.to_string(),
            name: name.to_string(),
            model: String::new(),
            provider_alias: String::new(),
        }
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn role_card_id(&self) -> &str {
        &self.role_card_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_alias(&self) -> &str {
        &self.provider_alias
    }

    /// Best available label for display, falling back to the persona id and
    /// finally the agent id.
    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else if !self.role_card_id.is_empty() {
            &self.role_card_id
        } else {
            &self.agent_id
        }
    }
}
