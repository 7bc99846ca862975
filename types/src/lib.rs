pub mod conversation;
pub mod events;
mod message;

pub use conversation::{AgentInfo, TurnSnapshot, TurnTrigger};
pub use events::{RawEvent, ServerEvent};
pub use message::{ChatMessage, MessageRole};
