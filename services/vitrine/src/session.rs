//! Per-user session context and the process-wide session store

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Authenticated identity, as returned by the auth backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    pub role: String,
}

/// Per-user state spanning one browsing session.
///
/// The selection is a single-slot register: the last selected link wins and
/// there is no clear operation.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub identity: Option<Identity>,
    selected_link: Option<String>,
}

impl Session {
    /// Session seeded with an identity, as after a successful login
    pub fn with_identity(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            selected_link: None,
        }
    }

    /// Record a selection, overwriting any prior one
    pub fn select(&mut self, link: &str) {
        self.selected_link = Some(link.to_string());
    }

    /// The most recently selected link, if any
    pub fn current(&self) -> Option<&str> {
        self.selected_link.as_deref()
    }
}

/// Process-wide map from session id to session context.
///
/// Session ids ride a cookie; sessions are created on first contact and are
/// never shared across users.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

/// Shared session store handle
pub type SessionStoreHandle = Arc<SessionStore>;

impl SessionStore {
    pub fn new_handle() -> SessionStoreHandle {
        Arc::new(Self::default())
    }

    /// Look up the session for `id`, creating a fresh one when the id is
    /// unknown (or absent). Returns the effective id alongside the session.
    pub async fn get_or_create(&self, id: Option<Uuid>) -> (Uuid, Session) {
        if let Some(id) = id {
            if let Some(session) = self.sessions.read().await.get(&id) {
                return (id, session.clone());
            }
        }
        let id = Uuid::new_v4();
        let session = Session::default();
        self.sessions.write().await.insert(id, session.clone());
        tracing::debug!("Created session {}", id);
        (id, session)
    }

    /// Persist the (mutated) session context back into the store
    pub async fn put(&self, id: Uuid, session: Session) {
        self.sessions.write().await.insert(id, session);
    }
}
