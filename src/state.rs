// src/state.rs
use std::{path::PathBuf, sync::Arc, time::Duration};

use crate::{
    errors::{TawsilError, TawsilResult},
    services::{
        admin_service::AdminService,
        api_client::ApiClient,
        auth_service::AuthService,
        driver_service::DriverService,
        notification_service::NotificationService,
        order_service::OrderService,
        restaurant_panel_service::RestaurantPanelService,
        restaurant_service::RestaurantService,
        session::{FileTokenStore, MemoryTokenStore, Session, TokenStore},
        tracking_service::TrackingService,
    },
};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(8000);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub backend_url: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    /// Where the session token is persisted; `None` keeps it in memory only
    pub token_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: std::env::var("TAWSIL_BACKEND_URL")
                .unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string()),
            poll_interval: env_millis("TAWSIL_POLL_INTERVAL_MS").unwrap_or(DEFAULT_POLL_INTERVAL),
            request_timeout: env_millis("TAWSIL_REQUEST_TIMEOUT_MS").unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            token_path: std::env::var("TAWSIL_TOKEN_PATH")
                .ok()
                .map(PathBuf::from)
                .or_else(FileTokenStore::default_path),
        }
    }
}

fn env_millis(var: &str) -> Option<Duration> {
    let raw = std::env::var(var).ok()?;
    match raw.parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(_) => {
            tracing::warn!("Ignoring {}={:?}: not a number of milliseconds", var, raw);
            None
        }
    }
}

impl ClientConfig {
    pub fn api_base(&self) -> String {
        format!("{}/api", self.backend_url.trim_end_matches('/'))
    }

    pub fn validate(&self) -> TawsilResult<()> {
        if self.backend_url.trim().is_empty() {
            return Err(TawsilError::InvalidConfiguration("backend_url is empty".to_string()));
        }
        if self.poll_interval.is_zero() {
            return Err(TawsilError::InvalidConfiguration("poll_interval must be positive".to_string()));
        }
        if self.request_timeout.is_zero() {
            return Err(TawsilError::InvalidConfiguration("request_timeout must be positive".to_string()));
        }
        Ok(())
    }
}

/// Everything a client app needs, built once at start and torn down at logout
pub struct ClientState {
    pub session: Arc<Session>,
    pub auth_service: Arc<AuthService>,
    pub restaurant_service: Arc<RestaurantService>,
    pub order_service: Arc<OrderService>,
    pub restaurant_panel_service: Arc<RestaurantPanelService>,
    pub driver_service: Arc<DriverService>,
    pub notification_service: Arc<NotificationService>,
    pub admin_service: Arc<AdminService>,
    pub tracking_service: Arc<TrackingService>,
    pub config: ClientConfig,
}

impl ClientState {
    pub async fn new(config: ClientConfig) -> TawsilResult<Self> {
        let token_store: Arc<dyn TokenStore> = match &config.token_path {
            Some(path) => Arc::new(FileTokenStore::new(path.clone())),
            None => {
                tracing::warn!("No token path configured, session will not survive a restart");
                Arc::new(MemoryTokenStore::default())
            }
        };

        Self::with_token_store(config, token_store).await
    }

    pub async fn with_token_store(config: ClientConfig, token_store: Arc<dyn TokenStore>) -> TawsilResult<Self> {
        config.validate()?;

        let api = Arc::new(ApiClient::new(&config)?);
        let auth_service = Arc::new(AuthService::new(api.clone()));
        let session = Arc::new(Session::new(api.clone(), auth_service.clone(), token_store));
        session.init().await?;

        let order_service = Arc::new(OrderService::new(api.clone()));
        let tracking_service = Arc::new(TrackingService::new(order_service.clone(), config.poll_interval));

        Ok(Self {
            session,
            auth_service,
            restaurant_service: Arc::new(RestaurantService::new(api.clone())),
            order_service,
            restaurant_panel_service: Arc::new(RestaurantPanelService::new(api.clone())),
            driver_service: Arc::new(DriverService::new(api.clone())),
            notification_service: Arc::new(NotificationService::new(api.clone())),
            admin_service: Arc::new(AdminService::new(api)),
            tracking_service,
            config,
        })
    }

    /// Stops every live tracking view, then ends the session
    pub async fn shutdown(&self) -> TawsilResult<()> {
        self.tracking_service.close_all();
        self.session.logout().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_trims_slash() {
        let config = ClientConfig {
            backend_url: "https://api.example.sy/".to_string(),
            ..ClientConfig::default()
        };
        assert_eq!(config.api_base(), "https://api.example.sy/api");
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = ClientConfig {
            poll_interval: Duration::ZERO,
            ..ClientConfig::default()
        };
        assert!(matches!(config.validate(), Err(TawsilError::InvalidConfiguration(_))));
    }
}
