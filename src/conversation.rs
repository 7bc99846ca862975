use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::broadcast;

use group_chat_types::{AgentInfo, ChatMessage, ServerEvent, TurnSnapshot, TurnTrigger};

use crate::assembler::MessageAssembler;
use crate::error::Error;
use crate::sse::FrameDecoder;
use crate::stats::Stats;
use crate::transport::Transport;

/// Debounce between a finished turn and the auto-continued next one.
pub const DEFAULT_CONTINUE_DELAY: Duration = Duration::from_millis(200);

const DEFAULT_NOTIFY_CAPACITY: usize = 256;

/// Out-of-band notifications fanned out to subscribers while turns run.
#[derive(Debug, Clone)]
pub enum Notification {
    /// A completed message was appended to the log.
    Message(ChatMessage),
    /// One of the turn-state flags changed.
    State(TurnSnapshot),
    /// A turn drained successfully.
    TurnCompleted { trigger: TurnTrigger, messages: usize },
    /// A turn failed at the transport level.
    TurnFailed { trigger: TurnTrigger, reason: String },
}

/// Result of one drained turn.
#[derive(Debug, Clone)]
pub struct TurnReport {
    trigger: TurnTrigger,
    messages: Vec<ChatMessage>,
}

impl TurnReport {
    pub fn trigger(&self) -> TurnTrigger {
        self.trigger
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

/// Orchestrator for one multi-participant conversation.
///
/// Owns the turn flags, the completed-message log, the participant roster,
/// and the transport used to start turns. At most one turn is ever in
/// flight; a second request while one is draining is rejected with
/// [`Error::TurnInProgress`]. Snapshot and log reads are cheap clones and
/// may happen concurrently with a running turn. Distinct conversations are
/// independent instances.
pub struct Conversation<T> {
    id: String,
    transport: T,
    continue_delay: Duration,
    state: Mutex<TurnSnapshot>,
    log: Mutex<Vec<ChatMessage>>,
    participants: Mutex<Vec<AgentInfo>>,
    stats: Mutex<Stats>,
    notify: broadcast::Sender<Notification>,
}

pub struct ConversationBuilder<T> {
    id: String,
    transport: T,
    continue_delay: Duration,
    capacity: usize,
    auto_continue: bool,
}

impl<T: Transport> ConversationBuilder<T> {
    pub fn new(id: &str, transport: T) -> Self {
        Self {
            id: id.to_string(),
            transport,
            continue_delay: DEFAULT_CONTINUE_DELAY,
            capacity: DEFAULT_NOTIFY_CAPACITY,
            auto_continue: true,
        }
    }

    /// Debounce before an auto-continued turn; 200ms in the default setup.
    pub fn with_continue_delay(mut self, delay: Duration) -> Self {
        self.continue_delay = delay;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_auto_continue(mut self, auto_continue: bool) -> Self {
        self.auto_continue = auto_continue;
        self
    }

    pub fn build(self) -> Arc<Conversation<T>> {
        let (notify, _) = broadcast::channel(self.capacity);
        Arc::new(Conversation {
            id: self.id,
            transport: self.transport,
            continue_delay: self.continue_delay,
            state: Mutex::new(TurnSnapshot {
                auto_continue: self.auto_continue,
                ..TurnSnapshot::default()
            }),
            log: Mutex::new(Vec::new()),
            participants: Mutex::new(Vec::new()),
            stats: Mutex::new(Stats::new()),
            notify,
        })
    }
}

// A poisoned lock still yields the data; the criticals are flag flips and
// vector pushes that cannot leave the state half-written.
fn lock<U>(mutex: &Mutex<U>) -> MutexGuard<'_, U> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<T> Conversation<T> {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current turn flags, for display and for gating user actions.
    pub fn snapshot(&self) -> TurnSnapshot {
        *lock(&self.state)
    }

    /// The completed-message log so far, in arrival order.
    pub fn messages(&self) -> Vec<ChatMessage> {
        lock(&self.log).clone()
    }

    /// Participant roster from the most recent round.
    pub fn participants(&self) -> Vec<AgentInfo> {
        lock(&self.participants).clone()
    }

    pub fn stats(&self) -> Stats {
        *lock(&self.stats)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notify.subscribe()
    }

    /// Record that the human wants to author the next turn. The flag is
    /// spent when the next turn ends, whatever its outcome.
    pub fn request_to_speak(&self) {
        lock(&self.state).wants_to_speak = true;
        self.notify_state();
    }

    fn notify_state(&self) {
        let _ = self.notify.send(Notification::State(self.snapshot()));
    }

    fn push_message(&self, message: ChatMessage) {
        lock(&self.log).push(message.clone());
        let _ = self.notify.send(Notification::Message(message));
    }
}

impl<T: Transport + 'static> Conversation<T> {
    pub fn new(id: &str, transport: T) -> Arc<Self> {
        ConversationBuilder::new(id, transport).build()
    }

    pub fn builder(id: &str, transport: T) -> ConversationBuilder<T> {
        ConversationBuilder::new(id, transport)
    }

    /// Run one generation turn to completion.
    ///
    /// Rejected with [`Error::TurnInProgress`] while another turn is
    /// draining. Otherwise holds the in-flight flag for the whole stream and
    /// appends the optional user text and every completed responder message
    /// to the log. On exit, success or failure alike, it releases the flag,
    /// spends any manual-speak authorization, and considers scheduling the
    /// next auto-continued turn.
    pub async fn request_turn(
        self: &Arc<Self>,
        trigger: TurnTrigger,
        user_text: Option<String>,
    ) -> Result<TurnReport, Error> {
        {
            let mut state = lock(&self.state);
            if state.in_flight {
                return Err(Error::TurnInProgress);
            }
            state.in_flight = true;
        }
        self.notify_state();

        if let Some(text) = user_text.as_deref() {
            self.push_message(ChatMessage::user(text));
        }

        let result = self.drain_turn(user_text).await;

        // The turn is over either way: release the mutex and spend the
        // manual-speak authorization.
        {
            let mut state = lock(&self.state);
            state.in_flight = false;
            state.wants_to_speak = false;
        }
        self.notify_state();
        self.schedule_continuation();

        match result {
            Ok(messages) => {
                let _ = self.notify.send(Notification::TurnCompleted {
                    trigger,
                    messages: messages.len(),
                });
                Ok(TurnReport { trigger, messages })
            }
            Err(error) => {
                let _ = self.notify.send(Notification::TurnFailed {
                    trigger,
                    reason: error.to_string(),
                });
                Err(error)
            }
        }
    }

    /// Send a message from the human and run the turn it starts. The trigger
    /// reflects a pending want-to-speak request when one was made.
    pub async fn send_message(self: &Arc<Self>, text: &str) -> Result<TurnReport, Error> {
        let trigger = if self.snapshot().wants_to_speak {
            TurnTrigger::WantToSpeak
        } else {
            TurnTrigger::UserMessage
        };
        self.request_turn(trigger, Some(text.to_string())).await
    }

    /// Kick off auto-running rounds, if the flags allow it. Called when the
    /// caller first attaches to a conversation.
    pub fn start(self: &Arc<Self>) {
        self.schedule_continuation();
    }

    /// Operator pause: acknowledge with the server, then stop auto-running.
    /// An in-flight turn is not aborted; it finishes and nothing follows it.
    pub async fn pause(&self) -> Result<(), Error> {
        self.transport.pause(&self.id).await?;
        {
            let mut state = lock(&self.state);
            state.paused = true;
            state.auto_continue = false;
        }
        self.notify_state();
        Ok(())
    }

    /// Operator resume: acknowledge with the server and clear the pause.
    /// When auto-continue is on and nothing is in flight, the next turn
    /// runs immediately.
    pub async fn resume(self: &Arc<Self>) -> Result<(), Error> {
        self.transport.resume(&self.id).await?;
        lock(&self.state).paused = false;
        self.notify_state();

        let state = self.snapshot();
        if state.auto_continue && !state.in_flight {
            self.fire_now();
        }
        Ok(())
    }

    /// Flip the auto-continue preference; returns the new value. Turning it
    /// on while idle and unpaused runs a turn immediately.
    pub fn toggle_auto_continue(self: &Arc<Self>) -> bool {
        let auto_continue = {
            let mut state = lock(&self.state);
            state.auto_continue = !state.auto_continue;
            state.auto_continue
        };
        self.notify_state();

        let state = self.snapshot();
        if auto_continue && !state.paused && !state.in_flight {
            self.fire_now();
        }
        auto_continue
    }

    async fn drain_turn(&self, user_text: Option<String>) -> Result<Vec<ChatMessage>, Error> {
        let mut stream = self.transport.start_turn(&self.id, user_text).await?;
        let mut frames = FrameDecoder::new();
        let mut assembler = MessageAssembler::new();
        let mut completed = Vec::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            for raw in frames.feed(&chunk) {
                let event = ServerEvent::decode(&raw);
                self.observe(&event);
                if let Some(message) = assembler.apply(&event) {
                    self.push_message(message.clone());
                    completed.push(message);
                }
            }
        }

        if assembler.open_messages() > 0 {
            // Stream ended mid-message; the partial content is dropped, not
            // flushed. Worth a look server-side whenever this fires.
            tracing::warn!(
                "stream for {} ended with {} unfinished message(s); partial content dropped",
                self.id,
                assembler.open_messages()
            );
        }
        Ok(completed)
    }

    fn observe(&self, event: &ServerEvent) {
        match event {
            ServerEvent::StatusPaused(_) => {
                // Server-side pause: stop auto-scheduling, but leave the
                // auto-continue preference itself untouched.
                lock(&self.state).paused = true;
                self.notify_state();
            }
            ServerEvent::StatusStart(start) => {
                *lock(&self.participants) = start.agents().to_vec();
            }
            ServerEvent::JudgeDecision(decision) => {
                tracing::debug!(
                    "next speaker for {}: {} ({})",
                    self.id,
                    decision.agent_id(),
                    decision.reason().unwrap_or("no reason")
                );
            }
            ServerEvent::MessageCompleted(completed) => {
                lock(&self.stats).record_message(completed.usage());
            }
            ServerEvent::Error(error) => {
                tracing::warn!(
                    "server reported an error in {}: {} ({})",
                    self.id,
                    error.message(),
                    error.code()
                );
            }
            _ => {}
        }
    }

    /// After a turn ends (or when attaching): if unpaused and auto-continue
    /// is on, run the next turn after the debounce delay. The delayed task
    /// stands down if the conversation was paused or grabbed in the
    /// meantime.
    fn schedule_continuation(self: &Arc<Self>) {
        let state = self.snapshot();
        if !state.auto_continue || state.paused {
            return;
        }
        let conversation = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(conversation.continue_delay).await;
            let state = conversation.snapshot();
            if state.paused || state.in_flight {
                return;
            }
            conversation.auto_turn().await;
        });
    }

    fn fire_now(self: &Arc<Self>) {
        let conversation = Arc::clone(self);
        tokio::spawn(async move {
            conversation.auto_turn().await;
        });
    }

    async fn auto_turn(self: &Arc<Self>) {
        match self.request_turn(TurnTrigger::AutoContinue, None).await {
            Ok(_) => {}
            // Another caller owns the turn; it will reschedule.
            Err(Error::TurnInProgress) => {}
            // A failed round does not stall the conversation; request_turn
            // already considered the next continuation.
            Err(error) => {
                tracing::warn!("auto-continued turn for {} failed: {}", self.id, error);
            }
        }
    }
}
