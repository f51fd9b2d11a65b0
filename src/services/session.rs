// src/services/session.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::{
    errors::{TawsilError as AppError, TawsilResult},
    models::user::{LoginRequest, RegisterRequest, User},
    services::{api_client::ApiClient, auth_service::AuthService},
};

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("token file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("token file is corrupt: {0}")]
    Corrupt(String),
}

/// Persistent home of the bearer token (secure storage on a phone, a file here)
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> Result<Option<String>, TokenStoreError>;
    async fn save(&self, token: &str) -> Result<(), TokenStoreError>;
    async fn clear(&self) -> Result<(), TokenStoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.token.read().await.clone())
    }

    async fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        *self.token.write().await = None;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    saved_at: DateTime<Utc>,
}

/// Keeps the token in a small JSON file readable only by the current user
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("tawsil").join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<String>, TokenStoreError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let stored: StoredToken =
            serde_json::from_slice(&raw).map_err(|e| TokenStoreError::Corrupt(e.to_string()))?;
        Ok(Some(stored.token))
    }

    async fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let stored = StoredToken {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        let json = serde_json::to_vec(&stored).map_err(|e| TokenStoreError::Corrupt(e.to_string()))?;

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);
        let mut file = options.open(&self.path).await?;

        // an older file keeps its mode on open, so tighten it before the token lands
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600)).await?;
        }

        file.write_all(&json).await?;
        file.flush().await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// The signed-in user and their token.
///
/// Created once at app start ([`Session::init`] restores a saved token) and
/// torn down by [`Session::logout`].
pub struct Session {
    api: Arc<ApiClient>,
    auth: Arc<AuthService>,
    store: Arc<dyn TokenStore>,
    user: RwLock<Option<User>>,
}

impl Session {
    pub fn new(api: Arc<ApiClient>, auth: Arc<AuthService>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            auth,
            store,
            user: RwLock::new(None),
        }
    }

    /// Restores a saved token, if any. A corrupt token file is discarded.
    pub async fn init(&self) -> TawsilResult<()> {
        let token = match self.store.load().await {
            Ok(token) => token,
            Err(TokenStoreError::Corrupt(reason)) => {
                tracing::warn!("Discarding unreadable saved session: {}", reason);
                self.store.clear().await?;
                None
            }
            Err(e) => return Err(e.into()),
        };

        if token.is_some() {
            tracing::info!("Restored saved session token");
        }
        self.api.set_token(token).await;
        Ok(())
    }

    pub async fn login(&self, phone: &str, password: &str) -> TawsilResult<User> {
        let request = LoginRequest {
            phone: phone.trim().to_string(),
            password: password.to_string(),
        };
        let response = self.auth.login(&request).await?;
        self.begin(response.access_token, response.user).await
    }

    pub async fn register(&self, request: RegisterRequest) -> TawsilResult<User> {
        let errors = request.validate();
        if !errors.is_empty() {
            return Err(AppError::ValidationFailed(errors));
        }
        let response = self.auth.register(&request).await?;
        self.begin(response.access_token, response.user).await
    }

    async fn begin(&self, token: String, user: User) -> TawsilResult<User> {
        self.store.save(&token).await?;
        self.api.set_token(Some(token)).await;
        *self.user.write().await = Some(user.clone());
        tracing::info!("Signed in as {} ({})", user.id, user.role.as_str());
        Ok(user)
    }

    /// Re-reads the current user from the backend
    pub async fn me(&self) -> TawsilResult<User> {
        if !self.api.has_token().await {
            return Err(AppError::NotAuthenticated);
        }
        let user = self.auth.me().await?;
        *self.user.write().await = Some(user.clone());
        Ok(user)
    }

    /// Validates a restored token; an expired one is dropped instead of surfacing an error
    pub async fn check_auth(&self) -> TawsilResult<Option<User>> {
        if !self.api.has_token().await {
            return Ok(None);
        }
        match self.me().await {
            Ok(user) => Ok(Some(user)),
            Err(AppError::Unauthorized(reason)) => {
                tracing::info!("Saved session rejected by backend: {}", reason);
                self.forget().await?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn current_user(&self) -> Option<User> {
        self.user.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.api.has_token().await
    }

    /// Clears local state first, then tells the backend; the backend call is best effort
    pub async fn logout(&self) -> TawsilResult<()> {
        self.user.write().await.take();
        if self.api.has_token().await {
            if let Err(e) = self.auth.logout().await {
                tracing::warn!("Backend logout failed, clearing local session anyway: {}", e);
            }
        }
        self.forget().await
    }

    async fn forget(&self) -> TawsilResult<()> {
        self.user.write().await.take();
        self.api.set_token(None).await;
        self.store.clear().await?;
        Ok(())
    }
}
