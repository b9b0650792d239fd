//! services/client/src/adapters/session_memory.rs
//!
//! An in-process `SessionStore`, for embedding the views without touching disk.

use async_trait::async_trait;
use myflix_core::domain::Session;
use myflix_core::ports::{PortResult, SessionStore};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemorySessionStore {
    inner: RwLock<Session>,
}

impl MemorySessionStore {
    pub fn with_session(session: Session) -> Self {
        Self {
            inner: RwLock::new(session),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn set(&self, token: &str, username: &str) -> PortResult<()> {
        *self.inner.write().await = Session::new(token, username);
        Ok(())
    }

    async fn get(&self) -> PortResult<Session> {
        Ok(self.inner.read().await.clone())
    }

    async fn clear(&self) -> PortResult<()> {
        *self.inner.write().await = Session::default();
        Ok(())
    }
}
