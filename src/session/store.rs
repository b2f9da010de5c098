//! Concurrent registry of sessions served over HTTP

use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use super::{Session, SessionView};
use crate::config::SessionConfig;
use crate::engine::AnalysisSnapshot;
use crate::error::{CadenceError, Result};

pub struct SessionStore {
    sessions: DashMap<Uuid, Session>,
    config: SessionConfig,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(config: SessionConfig, max_sessions: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            config,
            max_sessions,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn create(&self) -> Result<SessionView> {
        if self.sessions.len() >= self.max_sessions {
            return Err(CadenceError::SessionLimitReached {
                limit: self.max_sessions,
            });
        }
        let session = Session::new(self.config.clone());
        let view = session.view();
        self.sessions.insert(session.id(), session);
        info!(session = %view.id, open = self.sessions.len(), "session created");
        Ok(view)
    }

    pub fn view(&self, id: Uuid) -> Result<SessionView> {
        self.sessions
            .get(&id)
            .map(|s| s.view())
            .ok_or(CadenceError::SessionNotFound(id))
    }

    /// Run `f` with exclusive access to one session
    pub fn with_session<T>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> T) -> Result<T> {
        let mut entry = self
            .sessions
            .get_mut(&id)
            .ok_or(CadenceError::SessionNotFound(id))?;
        Ok(f(entry.value_mut()))
    }

    pub fn append(&self, id: Uuid, raw: &str) -> Result<AnalysisSnapshot> {
        self.with_session(id, |s| s.append_str(raw).cloned())?
    }

    pub fn undo(&self, id: Uuid) -> Result<AnalysisSnapshot> {
        self.with_session(id, |s| {
            s.undo();
            s.snapshot().clone()
        })
    }

    pub fn clear(&self, id: Uuid) -> Result<AnalysisSnapshot> {
        self.with_session(id, |s| {
            s.clear();
            s.snapshot().clone()
        })
    }

    pub fn remove(&self, id: Uuid) -> Result<()> {
        self.sessions
            .remove(&id)
            .map(|_| info!(session = %id, "session closed"))
            .ok_or(CadenceError::SessionNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(max: usize) -> SessionStore {
        SessionStore::new(SessionConfig::default(), max)
    }

    #[test]
    fn sessions_are_independent() {
        let store = store(4);
        let a = store.create().unwrap().id;
        let b = store.create().unwrap().id;
        for raw in ["A", "A", "A"] {
            store.append(a, raw).unwrap();
        }
        assert_eq!(store.view(a).unwrap().history.len(), 3);
        assert!(store.view(b).unwrap().history.is_empty());
    }

    #[test]
    fn limit_is_enforced() {
        let store = store(1);
        store.create().unwrap();
        assert!(matches!(
            store.create(),
            Err(CadenceError::SessionLimitReached { limit: 1 })
        ));
    }

    #[test]
    fn unknown_ids_are_reported() {
        let store = store(2);
        let id = Uuid::new_v4();
        assert!(matches!(store.view(id), Err(CadenceError::SessionNotFound(x)) if x == id));
        assert!(store.undo(id).is_err());
        assert!(store.remove(id).is_err());
    }

    #[test]
    fn invalid_symbol_is_rejected_without_change() {
        let store = store(2);
        let id = store.create().unwrap().id;
        store.append(id, "B").unwrap();
        assert!(matches!(
            store.append(id, "X"),
            Err(CadenceError::InvalidSymbol(_))
        ));
        assert_eq!(store.view(id).unwrap().history.len(), 1);
    }

    #[test]
    fn remove_frees_a_slot() {
        let store = store(1);
        let id = store.create().unwrap().id;
        store.remove(id).unwrap();
        assert!(store.is_empty());
        assert!(store.create().is_ok());
    }
}
