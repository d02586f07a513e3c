//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the in-memory store of user sessions.

use crate::config::Config;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use summarizer_core::{ports::SummarizationService, session::SummarySession};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub summarizer: Arc<dyn SummarizationService>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(config: Arc<Config>, summarizer: Arc<dyn SummarizationService>) -> Self {
        let sessions = Arc::new(SessionStore::new(config.session_idle_timeout));
        Self {
            config,
            summarizer,
            sessions,
        }
    }
}

//=========================================================================================
// SessionStore (One Entry Per Browser Session)
//=========================================================================================

/// A single user's session. The lock serializes that user's requests.
pub type SessionHandle = Arc<Mutex<SummarySession>>;

/// The session a request was authenticated against, placed in request extensions.
#[derive(Clone)]
pub struct ActiveSession {
    pub id: Uuid,
    pub handle: SessionHandle,
}

struct SessionEntry {
    handle: SessionHandle,
    last_accessed_at: Instant,
}

/// Keeps every live session in memory. Nothing is persisted.
///
/// Sessions idle for longer than `idle_timeout` are dropped the next time the store
/// is touched.
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, SessionEntry>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Starts a fresh, idle session.
    pub async fn create(&self) -> ActiveSession {
        let mut sessions = self.sessions.lock().await;
        self.evict_idle(&mut sessions);

        let id = Uuid::new_v4();
        let handle = Arc::new(Mutex::new(SummarySession::new()));
        sessions.insert(
            id,
            SessionEntry {
                handle: handle.clone(),
                last_accessed_at: Instant::now(),
            },
        );
        info!("Created session {} ({} live)", id, sessions.len());

        ActiveSession { id, handle }
    }

    /// Looks up a live session and marks it as used.
    pub async fn get(&self, id: Uuid) -> Option<ActiveSession> {
        let mut sessions = self.sessions.lock().await;
        self.evict_idle(&mut sessions);

        let entry = sessions.get_mut(&id)?;
        entry.last_accessed_at = Instant::now();
        Some(ActiveSession {
            id,
            handle: entry.handle.clone(),
        })
    }

    /// Ends a session. Returns `false` if it did not exist.
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.lock().await.remove(&id).is_some();
        if removed {
            info!("Ended session {}", id);
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    fn evict_idle(&self, sessions: &mut HashMap<Uuid, SessionEntry>) {
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_accessed_at.elapsed() < self.idle_timeout);
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!("Evicted {} idle sessions", evicted);
        }
    }
}
