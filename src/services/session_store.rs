use std::sync::Arc;

use chrono::{Duration, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::services::selector_service::{SelectorState, SharedSelector};

/// Thread-safe map of live selector views, one per browser session.
/// Idle sessions expire after the TTL; nothing is persisted.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<Uuid, SharedSelector>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Starts a fresh view and sweeps expired ones
    pub fn create(&self) -> (Uuid, SharedSelector) {
        self.cleanup_expired();

        let id = Uuid::new_v4();
        let state: SharedSelector = Arc::new(Mutex::new(SelectorState::default()));
        self.sessions.insert(id, state.clone());
        debug!("Created selector session {}", id);
        (id, state)
    }

    /// Live session by id. A hit counts as activity and restarts the idle
    /// clock; expired sessions are dropped on access.
    pub fn get(&self, id: &Uuid) -> Option<SharedSelector> {
        let state = self.sessions.get(id).map(|entry| entry.value().clone())?;

        let now = Utc::now();
        {
            let mut guard = state.lock();
            if now - guard.touched_at < self.ttl {
                guard.touched_at = now;
                return Some(state.clone());
            }
        }

        self.sessions.remove(id);
        debug!("Selector session {} expired", id);
        None
    }

    /// Existing session when the id is known and live, a new one otherwise
    pub fn get_or_create(&self, id: Option<Uuid>) -> (Uuid, SharedSelector) {
        if let Some(id) = id {
            if let Some(state) = self.get(&id) {
                return (id, state);
            }
        }
        self.create()
    }

    pub fn cleanup_expired(&self) {
        let now = Utc::now();
        let ttl = self.ttl;
        self.sessions
            .retain(|_, state| now - state.lock().touched_at < ttl);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_session_is_retrievable() {
        let store = SessionStore::new(60);
        let (id, _) = store.create();

        assert!(store.get(&id).is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unknown_id_creates_new_session() {
        let store = SessionStore::new(60);
        let missing = Uuid::new_v4();

        let (id, _) = store.get_or_create(Some(missing));
        assert_ne!(id, missing);

        let (again, _) = store.get_or_create(Some(id));
        assert_eq!(again, id);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_idle_sessions_expire() {
        let store = SessionStore::new(30);
        let (stale, state) = store.create();
        state.lock().touched_at = Utc::now() - Duration::minutes(31);

        assert!(store.get(&stale).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_browsing_keeps_session_alive() {
        let store = SessionStore::new(30);
        let (id, state) = store.create();
        state.lock().touched_at = Utc::now() - Duration::minutes(20);

        // Paging a result 20 minutes after the calculation
        let (paged, _) = store.get_or_create(Some(id));
        assert_eq!(paged, id);

        // 15 more minutes pass: 35 since the calculation, 15 since the last view
        let touched_at = state.lock().touched_at;
        state.lock().touched_at = touched_at - Duration::minutes(15);

        let (again, _) = store.get_or_create(Some(id));
        assert_eq!(again, id, "a session viewed 15 minutes ago is not idle");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_create_sweeps_expired_sessions() {
        let store = SessionStore::new(30);
        let (_, state) = store.create();
        state.lock().touched_at = Utc::now() - Duration::hours(2);

        store.create();
        assert_eq!(store.len(), 1);
    }
}
