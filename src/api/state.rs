use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::session::SessionStore;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct AppState {
    /// Open sessions
    pub store: Arc<SessionStore>,

    /// Application start time
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: Arc::new(SessionStore::new(
                config.session.clone(),
                config.server.max_sessions,
            )),
            start_time: Utc::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        (Utc::now() - self.start_time).num_seconds().max(0) as u64
    }
}
