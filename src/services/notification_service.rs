// src/services/notification_service.rs
use std::sync::Arc;

use crate::{
    errors::{TawsilError as AppError, TawsilResult},
    models::{
        notification::{Notification, PushPlatform, PushTokenRegistration, UnreadCount},
        order::MessageResponse,
    },
    services::api_client::ApiClient,
};

/// In-app notification inbox and push token registration
pub struct NotificationService {
    api: Arc<ApiClient>,
}

impl NotificationService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> TawsilResult<Vec<Notification>> {
        self.api.get_list("/notifications", "notification").await
    }

    pub async fn unread_count(&self) -> TawsilResult<u32> {
        let unread: UnreadCount = self.api.get("/notifications/unread-count").await?;
        Ok(unread.count)
    }

    pub async fn mark_read(&self, notification_id: &str) -> TawsilResult<MessageResponse> {
        self.api
            .put_empty(&format!("/notifications/{}/read", notification_id))
            .await
    }

    pub async fn mark_all_read(&self) -> TawsilResult<MessageResponse> {
        self.api.put_empty("/notifications/mark-all-read").await
    }

    pub async fn register_push_token(&self, push_token: &str, platform: PushPlatform) -> TawsilResult<MessageResponse> {
        if push_token.trim().is_empty() {
            return Err(AppError::MissingRequiredField("push_token".to_string()));
        }
        tracing::info!("Registering {:?} push token", platform);
        let registration = PushTokenRegistration {
            push_token: push_token.to_string(),
            platform,
        };
        self.api.post("/notifications/register-push-token", &registration).await
    }

    /// Stops push delivery to every device of the current user
    pub async fn unregister_push_tokens(&self) -> TawsilResult<MessageResponse> {
        self.api.delete("/notifications/push-token").await
    }
}
