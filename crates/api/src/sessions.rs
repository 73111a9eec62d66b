use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use prayaas_agents::{ChatSession, ConversationState};
use prayaas_core::{ConversationTurn, UserProfile};
use serde::Serialize;

use crate::error::ApiError;

struct SessionEntry {
    session: ChatSession,
    profile: UserProfile,
}

/// Read-only copy of a session returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub state: ConversationState,
    pub profile: UserProfile,
    pub turns: Vec<ConversationTurn>,
    pub last_activity_at: DateTime<Utc>,
}

/// What a caller needs to answer a question accepted by [`SessionStore::submit`].
pub struct PendingTurn {
    pub profile: UserProfile,
    pub history: Vec<ConversationTurn>,
}

/// In-memory chat sessions. Expired sessions are dropped lazily on access.
#[derive(Clone)]
pub struct SessionStore {
    entries: Arc<RwLock<HashMap<String, SessionEntry>>>,
    ttl: chrono::Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn insert(&self, session: ChatSession, profile: UserProfile) -> SessionView {
        self.purge_expired(Utc::now());

        let entry = SessionEntry { session, profile };
        let view = entry.view();
        self.entries
            .write()
            .insert(entry.session.session_id().to_string(), entry);
        view
    }

    pub fn view(&self, session_id: &str) -> Result<SessionView, ApiError> {
        self.with_live(session_id, |entry| Ok(entry.view()))
    }

    /// Accepts `text` as the session's next question. A supplied profile replaces
    /// the stored one before the question is recorded.
    pub fn submit(
        &self,
        session_id: &str,
        text: &str,
        profile: Option<UserProfile>,
    ) -> Result<PendingTurn, ApiError> {
        self.with_live(session_id, |entry| {
            entry.session.submit(text)?;
            if let Some(profile) = profile {
                entry.profile = profile;
            }
            Ok(PendingTurn {
                profile: entry.profile.clone(),
                history: entry.session.turns().to_vec(),
            })
        })
    }

    pub fn with_session<R>(
        &self,
        session_id: &str,
        apply: impl FnOnce(&mut ChatSession) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        self.with_live(session_id, |entry| apply(&mut entry.session))
    }

    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !self.is_expired(entry, now));
        before - entries.len()
    }

    fn with_live<R>(
        &self,
        session_id: &str,
        apply: impl FnOnce(&mut SessionEntry) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let mut entries = self.entries.write();
        let expired = match entries.get(session_id) {
            Some(entry) => self.is_expired(entry, Utc::now()),
            None => return Err(ApiError::SessionNotFound(session_id.to_string())),
        };
        if expired {
            entries.remove(session_id);
            return Err(ApiError::SessionNotFound(session_id.to_string()));
        }

        match entries.get_mut(session_id) {
            Some(entry) => apply(entry),
            None => Err(ApiError::SessionNotFound(session_id.to_string())),
        }
    }

    fn is_expired(&self, entry: &SessionEntry, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.session.last_activity_at()) > self.ttl
    }
}

impl SessionEntry {
    fn view(&self) -> SessionView {
        SessionView {
            session_id: self.session.session_id().to_string(),
            state: self.session.state(),
            profile: self.profile.clone(),
            turns: self.session.turns().to_vec(),
            last_activity_at: self.session.last_activity_at(),
        }
    }
}
