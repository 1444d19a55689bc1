//! Session store
//!
//! Sessions are keyed by chat user id. Different users never contend: the
//! map is sharded and every operation touches a single key.

use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};

use super::state::Session;

#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    async fn get(&self, user_id: &str) -> Option<Session>;

    /// Insert or replace; refreshes the idle timer
    async fn put(&self, session: Session);

    /// Returns whether a session was removed
    async fn evict(&self, user_id: &str) -> bool;

    /// Drop sessions untouched for at least `max_idle`; returns how many
    async fn evict_idle(&self, max_idle: Duration) -> usize;

    async fn count(&self) -> usize;
}

#[derive(Debug)]
struct Entry {
    session: Session,
    last_seen: Instant,
}

/// Process-local session map
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, Entry>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, user_id: &str) -> Option<Session> {
        self.sessions.get(user_id).map(|entry| entry.session.clone())
    }

    async fn put(&self, session: Session) {
        self.sessions.insert(
            session.user_id.clone(),
            Entry {
                session,
                last_seen: Instant::now(),
            },
        );
    }

    async fn evict(&self, user_id: &str) -> bool {
        self.sessions.remove(user_id).is_some()
    }

    async fn evict_idle(&self, max_idle: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| entry.last_seen.elapsed() < max_idle);
        before.saturating_sub(self.sessions.len())
    }

    async fn count(&self) -> usize {
        self.sessions.len()
    }
}
