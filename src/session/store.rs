use chrono::{DateTime, Duration, Utc};
use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use crate::models::role::Role;
use crate::models::session::Session;
use super::clock::{Clock, SystemClock};
use super::cookie::session_id_from_header;

// 4 hours, absolute from login
pub const SESSION_TTL_SECS: i64 = 4 * 60 * 60;

/// Process-wide table of logged-in users, keyed by session id.
///
/// Every call takes the lock once, so a lookup that finds an expired entry
/// removes it before any other worker can observe it. Nothing is persisted:
/// a restart logs everyone out.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    clock: Arc<dyn Clock>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Starts a session for a user the caller has already authenticated and
    /// returns its id. Expired entries are swept first.
    pub fn create_session(&self, user_id: i64, role: Role, username: &str) -> String {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock();

        let swept = sweep(&mut sessions, now);
        if swept > 0 {
            debug!("Swept {} expired sessions", swept);
        }

        let session_id = loop {
            let candidate = Uuid::new_v4().to_string();
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };

        sessions.insert(
            session_id.clone(),
            Session {
                session_id: session_id.clone(),
                user_id,
                username: username.to_string(),
                role,
                expires_at: now + Duration::seconds(SESSION_TTL_SECS),
            },
        );

        session_id
    }

    /// Copy of the live session for `session_id`. Missing, empty, unknown and
    /// expired ids all come back as `None`; an expired entry is dropped.
    pub fn get_session(&self, session_id: Option<&str>) -> Option<Session> {
        let session_id = session_id.filter(|id| !id.is_empty())?;
        let now = self.clock.now();
        let mut sessions = self.sessions.lock();

        let session = sessions.get(session_id)?.clone();
        if session.is_live_at(now) {
            return Some(session);
        }

        sessions.remove(session_id);
        debug!("Session for user {} expired at {}", session.user_id, session.expires_at);
        None
    }

    pub fn delete_session(&self, session_id: Option<&str>) {
        let Some(session_id) = session_id.filter(|id| !id.is_empty()) else {
            return;
        };
        if let Some(session) = self.sessions.lock().remove(session_id) {
            debug!("Deleted session for user {}", session.user_id);
        }
    }

    /// Resolves the raw `Cookie` header of a request to its live session.
    pub fn get_session_from_request(&self, cookie_header: Option<&str>) -> Option<Session> {
        let session_id = session_id_from_header(cookie_header)?;
        self.get_session(Some(&session_id))
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        sweep(&mut self.sessions.lock(), now)
    }

    /// Drops every session, live or not.
    pub fn clear(&self) -> usize {
        let mut sessions = self.sessions.lock();
        let removed = sessions.len();
        sessions.clear();
        removed
    }

    /// Entries currently held, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn sweep(sessions: &mut HashMap<String, Session>, now: DateTime<Utc>) -> usize {
    let before = sessions.len();
    sessions.retain(|_, session| session.is_live_at(now));
    before - sessions.len()
}

/// Periodically purges expired sessions on the current runtime, on top of the
/// sweep that every login already performs.
pub fn spawn_sweeper(store: Arc<SessionStore>, every: std::time::Duration) {
    actix_web::rt::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // the first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = store.purge_expired();
            if removed > 0 {
                debug!("Background sweep removed {} expired sessions", removed);
            }
        }
    });
}
