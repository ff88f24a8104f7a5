//! Session persistence.
//!
//! States are stored as JSON values keyed by session id. Credentials are
//! never part of the stored value.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;

use super::state::SessionState;

/// Backend-agnostic session storage.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, id: Uuid) -> Result<Option<SessionState>, StoreError>;

    async fn save(&self, id: Uuid, state: &SessionState) -> Result<(), StoreError>;

    /// Returns whether a session was removed.
    async fn remove(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Process-local store. Each session is independent; the lock only guards
/// the map itself.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<Uuid, serde_json::Value>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, id: Uuid) -> Result<Option<SessionState>, StoreError> {
        let sessions = self.sessions.read().await;
        match sessions.get(&id) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    async fn save(&self, id: Uuid, state: &SessionState) -> Result<(), StoreError> {
        let value = serde_json::to_value(state)?;
        self.sessions.write().await.insert(id, value);
        tracing::debug!(session = %id, step = state.step, "Session saved");
        Ok(())
    }

    async fn remove(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.sessions.write().await.remove(&id).is_some())
    }
}
