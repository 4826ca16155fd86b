//! The conversational session engine.
//!
//! Owns the ordered message thread and drives the request/response cycle
//! against the backend chat endpoint. At most one request is outstanding
//! at a time; re-entrant submissions are rejected rather than queued, and
//! a generation counter keeps a response that arrives after `reset()` from
//! landing in the fresh thread.

use crate::backend::NewsBackend;
use crate::parser::parse_response;
use crate::types::{Message, Role};
use std::sync::{Arc, Mutex};
use time::OffsetDateTime;

/// Fixed fallback appended as the assistant turn when the chat request
/// cannot be completed for any reason.
pub const CONNECTION_ERROR: &str = "Connection error. Please ensure the backend is running.";

const GREETING: &str = "Hello! I am your AI News Assistant. Ask me about current events, \
     technology, or any topic you're interested in.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Assistant turn appended from a parsed backend reply.
    Answered,
    /// Assistant turn appended with the connection-error fallback.
    Failed,
    /// Precondition not met (blank input or a request already pending).
    Ignored,
    /// `reset()` ran while the request was in flight; the reply was dropped.
    Discarded,
}

#[derive(Default)]
struct EngineState {
    thread: Vec<Message>,
    draft: String,
    pending: bool,
    generation: u64,
}

pub struct ConversationEngine {
    backend: Arc<dyn NewsBackend>,
    state: Mutex<EngineState>,
}

impl ConversationEngine {
    pub fn new(backend: Arc<dyn NewsBackend>) -> Self {
        Self {
            backend,
            state: Mutex::new(EngineState::default()),
        }
    }

    /// Seeds the thread with the assistant greeting turn.
    pub fn with_greeting(backend: Arc<dyn NewsBackend>) -> Self {
        let engine = Self::new(backend);
        {
            let mut state = engine.state.lock().expect("engine state poisoned");
            // Not a reply to anything, so it carries no originating question.
            state.thread.push(Message {
                role: Role::Assistant,
                content: GREETING.to_string(),
                sources: Vec::new(),
                created_at: OffsetDateTime::now_utc(),
                question: None,
            });
        }
        engine
    }

    /// Snapshot of the thread in conversation order.
    pub fn thread(&self) -> Vec<Message> {
        self.state.lock().expect("engine state poisoned").thread.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.state.lock().expect("engine state poisoned").pending
    }

    pub fn draft(&self) -> String {
        self.state.lock().expect("engine state poisoned").draft.clone()
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        self.state.lock().expect("engine state poisoned").draft = text.into();
    }

    /// Submits one user turn and resolves it to exactly one assistant turn.
    ///
    /// Blank input and submission while a request is pending are no-ops.
    /// The lock is never held across the backend call, so `reset()` and the
    /// state accessors stay live while the request is in flight.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return SubmitOutcome::Ignored;
        }

        let generation = {
            let mut state = self.state.lock().expect("engine state poisoned");
            if state.pending {
                return SubmitOutcome::Ignored;
            }
            state.thread.push(Message::user(trimmed));
            state.draft.clear();
            state.pending = true;
            state.generation
        };

        let (reply, outcome) = match self.backend.chat(trimmed).await {
            Ok(reply) => {
                let parsed = parse_response(&reply.response, reply.articles);
                (
                    Message::assistant(parsed.content, parsed.sources, trimmed),
                    SubmitOutcome::Answered,
                )
            }
            Err(err) => {
                tracing::warn!("chat request failed: {err}");
                (
                    Message::assistant(CONNECTION_ERROR, Vec::new(), trimmed),
                    SubmitOutcome::Failed,
                )
            }
        };

        let mut state = self.state.lock().expect("engine state poisoned");
        if state.generation != generation {
            // The thread was reset while we were waiting; reset() already
            // cleared the pending flag for its generation.
            return SubmitOutcome::Discarded;
        }
        state.thread.push(reply);
        state.pending = false;
        outcome
    }

    /// Clears thread, draft and pending state. Legal at any time; an
    /// in-flight request's eventual reply is discarded, not appended.
    pub fn reset(&self) {
        let mut state = self.state.lock().expect("engine state poisoned");
        state.thread.clear();
        state.draft.clear();
        state.pending = false;
        state.generation += 1;
    }
}
