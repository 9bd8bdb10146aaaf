//! In-memory session store.
//!
//! Sessions are keyed by uuid in a shared map. Each session sits behind its
//! own mutex so concurrent interactions against the same id are serialized,
//! while distinct sessions proceed in parallel. Process restart loses
//! everything.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::EngineError;
use crate::session::{NegotiationSession, SessionConfig};

pub type SessionHandle = Arc<Mutex<NegotiationSession>>;

pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
    config: SessionConfig,
}

impl SessionStore {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Create a session under a fresh id.
    pub async fn create(&self) -> (Uuid, SessionHandle) {
        let id = Uuid::new_v4();
        let handle: SessionHandle = Arc::new(Mutex::new(NegotiationSession::new(id, &self.config)));
        self.sessions.write().await.insert(id, handle.clone());
        (id, handle)
    }

    /// Look up a live session. Unknown and ended ids are indistinguishable.
    pub async fn get(&self, id: Uuid) -> Result<SessionHandle, EngineError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(EngineError::SessionNotFound)
    }

    /// End and remove a session. Returns whether it existed; ending an
    /// unknown id is not an error.
    pub async fn end(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id);
        match removed {
            Some(handle) => {
                handle.lock().await.end();
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Remove sessions idle past their TTL and return their ids.
    ///
    /// Expiry candidates are collected under the read lock, then re-checked
    /// under the write lock so a session that interacted in between
    /// survives. A session whose mutex is currently held is mid-interaction
    /// and therefore active; `try_lock` skips it rather than stalling the
    /// sweep (and everyone behind the map lock) on an in-flight request.
    pub async fn sweep_expired(&self) -> Vec<Uuid> {
        let candidates: Vec<Uuid> = {
            let sessions = self.sessions.read().await;
            let mut expired = Vec::new();
            for (id, handle) in sessions.iter() {
                if let Ok(session) = handle.try_lock() {
                    if session.is_expired() {
                        expired.push(*id);
                    }
                }
            }
            expired
        };

        if candidates.is_empty() {
            return candidates;
        }

        let mut removed = Vec::new();
        let mut sessions = self.sessions.write().await;
        for id in candidates {
            let still_expired = match sessions.get(&id) {
                Some(handle) => match handle.try_lock() {
                    Ok(mut session) => {
                        if session.is_expired() {
                            session.end();
                            true
                        } else {
                            false
                        }
                    }
                    Err(_) => false,
                },
                None => false,
            };
            if still_expired {
                sessions.remove(&id);
                removed.push(id);
            }
        }
        if !removed.is_empty() {
            tracing::debug!("swept {} expired session(s)", removed.len());
        }
        removed
    }
}
