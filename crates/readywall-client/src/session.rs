//! Admin session and token persistence

use crate::error::{GatewayError, GatewayResult};
use async_trait::async_trait;
use readywall_core::AdminUser;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

/// Token and profile of the signed-in administrator
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "adminToken")]
    token: String,
    #[serde(rename = "adminUser", default, skip_serializing_if = "Option::is_none")]
    user: Option<AdminUser>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[redacted]")
            .field("user", &self.user)
            .finish()
    }
}

impl Session {
    /// Session for a token, with the profile the login returned
    pub fn new(token: impl Into<String>, user: Option<AdminUser>) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    /// Session without a token; every authenticated call fails before sending
    pub fn anonymous() -> Self {
        Self::new(String::new(), None)
    }

    /// Raw token
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Profile of the signed-in administrator
    pub const fn user(&self) -> Option<&AdminUser> {
        self.user.as_ref()
    }

    /// Whether a non-empty token is present
    pub fn is_authenticated(&self) -> bool {
        !self.token.trim().is_empty()
    }

    /// Token for the `Authorization: Bearer` header
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MissingToken`] when no token is present.
    pub fn bearer(&self) -> GatewayResult<&str> {
        if self.is_authenticated() {
            Ok(self.token.trim())
        } else {
            Err(GatewayError::MissingToken)
        }
    }
}

/// Administrator credentials
#[derive(Clone, Serialize)]
pub struct Credentials {
    /// Email
    pub email: String,
    /// Password
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl Credentials {
    /// Bundle an email and password
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Storage for the session between runs
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the stored session; `None` when nothing usable is stored
    async fn load(&self) -> readywall_core::Result<Option<Session>>;

    /// Persist a session, replacing any previous one
    async fn save(&self, session: &Session) -> readywall_core::Result<()>;

    /// Remove the stored session
    async fn clear(&self) -> readywall_core::Result<()>;
}

/// Session stored as a JSON file
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> readywall_core::Result<Option<Session>> {
        let contents = match tokio::fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let session: Session = serde_json::from_slice(&contents)?;
        Ok(session.is_authenticated().then_some(session))
    }

    async fn save(&self, session: &Session) -> readywall_core::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let contents = serde_json::to_vec_pretty(session)?;
        tokio::fs::write(&self.path, contents).await?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    async fn clear(&self) -> readywall_core::Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process session storage
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    session: Mutex<Option<Session>>,
}

impl MemoryTokenStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already holds `session`
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> readywall_core::Result<Option<Session>> {
        Ok(self
            .session
            .lock()
            .await
            .clone()
            .filter(Session::is_authenticated))
    }

    async fn save(&self, session: &Session) -> readywall_core::Result<()> {
        *self.session.lock().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> readywall_core::Result<()> {
        *self.session.lock().await = None;
        Ok(())
    }
}
