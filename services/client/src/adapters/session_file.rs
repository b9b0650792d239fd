//! services/client/src/adapters/session_file.rs
//!
//! A `SessionStore` that persists the token and username in a small JSON file,
//! so a login survives between runs of the binary.

use async_trait::async_trait;
use myflix_core::domain::Session;
use myflix_core::ports::{PortError, PortResult, SessionStore};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// On-disk layout: two string keys, `token` and `user`.
#[derive(Serialize, Deserialize, Default)]
struct SessionRecord {
    token: Option<String>,
    user: Option<String>,
}

#[derive(Clone, Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn storage_error(path: &Path, e: impl std::fmt::Display) -> PortError {
    PortError::Storage(format!("{}: {}", path.display(), e))
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn set(&self, token: &str, username: &str) -> PortResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| storage_error(parent, e))?;
        }
        let record = SessionRecord {
            token: Some(token.to_string()),
            user: Some(username.to_string()),
        };
        let json = serde_json::to_vec_pretty(&record).map_err(|e| storage_error(&self.path, e))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| storage_error(&self.path, e))?;
        debug!(user = username, path = %self.path.display(), "Session stored");
        Ok(())
    }

    async fn get(&self) -> PortResult<Session> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Session::default()),
            Err(e) => return Err(storage_error(&self.path, e)),
        };
        let record: SessionRecord =
            serde_json::from_slice(&bytes).map_err(|e| storage_error(&self.path, e))?;
        Ok(Session {
            token: record.token,
            username: record.user,
        })
    }

    async fn clear(&self) -> PortResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "Session cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(&self.path, e)),
        }
    }
}
