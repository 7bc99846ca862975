use group_chat_types::events::Usage;

/// Accumulated token usage across a conversation's completed messages.
#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct Stats {
    prompt_tokens: i32,
    completion_tokens: i32,
    completed_messages: u32,
}

impl Stats {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_message(&mut self, usage: Option<&Usage>) {
        if let Some(usage) = usage {
            self.prompt_tokens += usage.prompt_tokens();
            self.completion_tokens += usage.completion_tokens();
        }
        self.completed_messages += 1;
    }

    pub fn prompt_tokens(&self) -> i32 {
        self.prompt_tokens
    }

    pub fn completion_tokens(&self) -> i32 {
        self.completion_tokens
    }

    pub fn total_tokens(&self) -> i32 {
        self.prompt_tokens + self.completion_tokens
    }

    pub fn completed_messages(&self) -> u32 {
        self.completed_messages
    }
}
