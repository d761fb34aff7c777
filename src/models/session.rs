use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AdminError;

/// Storage key of the bearer token. The only key ever read or written.
pub const SESSION_TOKEN_KEY: &str = "adminToken";

/// Authorization context passed explicitly to every product service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    email: Option<String>,
}

impl Session {
    pub fn new(token: impl Into<String>, email: Option<String>) -> Self {
        Self {
            token: token.into(),
            email,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

#[derive(Serialize, Deserialize)]
struct StoredSession {
    #[serde(rename = "adminToken")]
    admin_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

/// File-backed session for the CLI: written at login, read by every
/// authenticated command, deleted at logout.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Option<Session>, AdminError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AdminError::Storage(format!("{}: {}", self.path.display(), e))),
        };
        let stored: StoredSession = serde_json::from_str(&raw)
            .map_err(|e| AdminError::Storage(format!("{}: {}", self.path.display(), e)))?;
        if stored.admin_token.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(Session::new(stored.admin_token, stored.email)))
    }

    /// Like [`SessionStore::load`] but a missing session is an error.
    pub async fn require(&self) -> Result<Session, AdminError> {
        self.load().await?.ok_or(AdminError::NoSession)
    }

    pub async fn save(&self, session: &Session) -> Result<(), AdminError> {
        let stored = StoredSession {
            admin_token: session.token.clone(),
            email: session.email.clone(),
        };
        let json = serde_json::to_string_pretty(&stored)
            .map_err(|e| AdminError::Storage(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| AdminError::Storage(format!("{}: {}", self.path.display(), e)))
    }

    /// Removes the stored token. Returns whether a session existed.
    pub async fn clear(&self) -> Result<bool, AdminError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AdminError::Storage(format!("{}: {}", self.path.display(), e))),
        }
    }
}
