// src/services/auth_service.rs
use std::sync::Arc;

use crate::{
    errors::TawsilResult,
    models::{
        order::MessageResponse,
        user::{AuthResponse, LoginRequest, RegisterRequest, User},
    },
    services::api_client::ApiClient,
};

/// Raw `/auth` endpoints; token bookkeeping lives in [`Session`](super::session::Session)
pub struct AuthService {
    api: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn register(&self, request: &RegisterRequest) -> TawsilResult<AuthResponse> {
        tracing::info!("Registering {} account", request.role.as_str());
        self.api.post("/auth/register", request).await
    }

    pub async fn login(&self, request: &LoginRequest) -> TawsilResult<AuthResponse> {
        tracing::info!("Logging in");
        self.api.post("/auth/login", request).await
    }

    pub async fn me(&self) -> TawsilResult<User> {
        self.api.get("/auth/me").await
    }

    pub async fn logout(&self) -> TawsilResult<MessageResponse> {
        self.api.post_empty("/auth/logout").await
    }
}
