use chrono::{DateTime, Utc};
use prayaas_core::{ConversationTurn, GREETING};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_MAX_TURNS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    Idle,
    AwaitingResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversationError {
    #[error("a question is already awaiting its answer")]
    Busy,
    #[error("message must not be empty")]
    EmptyMessage,
    #[error("no question is awaiting an answer")]
    NotAwaiting,
    #[error("conversation reached its limit of {0} turns")]
    TurnLimitReached(usize),
}

/// Append-only transcript for one chat view. Opens with the assistant greeting and
/// allows a single question in flight at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    session_id: String,
    state: ConversationState,
    turns: Vec<ConversationTurn>,
    max_turns: usize,
    started_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(max_turns: usize) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), max_turns)
    }

    pub fn with_id(session_id: impl Into<String>, max_turns: usize) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            state: ConversationState::Idle,
            turns: vec![ConversationTurn::assistant(GREETING)],
            max_turns: max_turns.max(3),
            started_at: now,
            last_activity_at: now,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn last_activity_at(&self) -> DateTime<Utc> {
        self.last_activity_at
    }

    /// Records the user's question and moves to `AwaitingResponse`.
    pub fn submit(&mut self, text: &str) -> Result<&ConversationTurn, ConversationError> {
        if self.state == ConversationState::AwaitingResponse {
            return Err(ConversationError::Busy);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(ConversationError::EmptyMessage);
        }
        // Room is needed for the question and its answer.
        if self.turns.len() + 2 > self.max_turns {
            return Err(ConversationError::TurnLimitReached(self.max_turns));
        }

        self.state = ConversationState::AwaitingResponse;
        Ok(self.push(ConversationTurn::user(text)))
    }

    /// Appends the assistant's answer and returns to `Idle`.
    pub fn resolve(&mut self, reply: String) -> Result<&ConversationTurn, ConversationError> {
        if self.state != ConversationState::AwaitingResponse {
            return Err(ConversationError::NotAwaiting);
        }

        self.state = ConversationState::Idle;
        Ok(self.push(ConversationTurn::assistant(reply)))
    }

    pub fn pending_question(&self) -> Option<&str> {
        match self.state {
            ConversationState::AwaitingResponse => self.turns.last().map(|turn| turn.text.as_str()),
            ConversationState::Idle => None,
        }
    }

    fn push(&mut self, turn: ConversationTurn) -> &ConversationTurn {
        let index = self.turns.len();
        self.last_activity_at = turn.at;
        self.turns.push(turn);
        &self.turns[index]
    }
}
